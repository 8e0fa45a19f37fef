use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::PlatformParseError;

/// Target operating systems known to the toolchain.
///
/// The string form is the toolchain's own spelling (the value passed as `GOOS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
  Darwin,
  Linux,
  Freebsd,
  Netbsd,
  Openbsd,
  Plan9,
  Windows,
}

impl Os {
  pub const ALL: [Os; 7] = [
    Os::Darwin,
    Os::Linux,
    Os::Freebsd,
    Os::Netbsd,
    Os::Openbsd,
    Os::Plan9,
    Os::Windows,
  ];

  /// Detect the host operating system at runtime
  ///
  /// Returns `None` if the host is not one of the known targets.
  pub fn current() -> Option<Self> {
    Self::from_target_os(std::env::consts::OS)
  }

  /// Map a Rust `target_os` name (`std::env::consts::OS`) to a toolchain OS.
  pub fn from_target_os(target_os: &str) -> Option<Self> {
    match target_os {
      "macos" => Some(Self::Darwin),
      "linux" => Some(Self::Linux),
      "freebsd" => Some(Self::Freebsd),
      "netbsd" => Some(Self::Netbsd),
      "openbsd" => Some(Self::Openbsd),
      "windows" => Some(Self::Windows),
      _ => None,
    }
  }

  /// Returns the lowercase string identifier for this OS
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Darwin => "darwin",
      Self::Linux => "linux",
      Self::Freebsd => "freebsd",
      Self::Netbsd => "netbsd",
      Self::Openbsd => "openbsd",
      Self::Plan9 => "plan9",
      Self::Windows => "windows",
    }
  }

  /// Suffix appended to executables built for this OS.
  pub fn exe_suffix(&self) -> &'static str {
    match self {
      Self::Windows => ".exe",
      _ => "",
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Os {
  type Err = PlatformParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|os| os.as_str() == s)
      .ok_or_else(|| PlatformParseError::UnknownOs(s.to_string()))
  }
}

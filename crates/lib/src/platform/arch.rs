use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::PlatformParseError;

/// CPU architectures known to the toolchain (the value passed as `GOARCH`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Arch {
  #[serde(rename = "386")]
  X86,
  #[serde(rename = "amd64")]
  Amd64,
  #[serde(rename = "arm")]
  Arm,
}

impl Arch {
  pub const ALL: [Arch; 3] = [Arch::X86, Arch::Amd64, Arch::Arm];

  /// Detect the host CPU architecture at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::ARCH {
      "x86" => Some(Self::X86),
      "x86_64" => Some(Self::Amd64),
      "arm" => Some(Self::Arm),
      _ => None,
    }
  }

  /// Returns the toolchain's identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86 => "386",
      Self::Amd64 => "amd64",
      Self::Arm => "arm",
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Arch {
  type Err = PlatformParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|arch| arch.as_str() == s)
      .ok_or_else(|| PlatformParseError::UnknownArch(s.to_string()))
  }
}

pub mod arch;
pub mod matrix;
pub mod os;
pub mod paths;

use std::fmt;
use std::str::FromStr;

use arch::Arch;
use os::Os;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use matrix::{PlatformTable, ResolvedMatrix, Selector, resolve};

/// Errors from parsing platform identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformParseError {
  #[error("unknown operating system: {0}")]
  UnknownOs(String),

  #[error("unknown architecture: {0}")]
  UnknownArch(String),

  #[error("invalid platform '{0}', expected OS_ARCH")]
  Malformed(String),
}

/// A build target: operating system plus architecture (e.g. "linux_amd64").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Platform {
  pub os: Os,
  pub arch: Arch,
}

impl Platform {
  pub const fn new(os: Os, arch: Arch) -> Self {
    Self { os, arch }
  }

  /// Detect the host platform at runtime
  ///
  /// Returns `None` if the OS or architecture is not a known target
  pub fn current() -> Option<Self> {
    Some(Self {
      os: Os::current()?,
      arch: Arch::current()?,
    })
  }

  /// Returns the map key / directory name for this platform (e.g. "linux_amd64")
  pub fn key(&self) -> String {
    format!("{}_{}", self.os, self.arch)
  }

  /// Whether the toolchain should build this platform with cgo enabled.
  ///
  /// Fixed reference data: depends on nothing but the pair itself.
  pub fn cgo_enabled(&self) -> bool {
    use crate::platform::arch::Arch::*;
    use crate::platform::os::Os::*;

    matches!(
      (self.os, self.arch),
      (Darwin, X86 | Amd64)
        | (Freebsd, X86 | Amd64)
        | (Linux, X86 | Amd64 | Arm)
        | (Netbsd, X86 | Amd64 | Arm)
        | (Openbsd, X86 | Amd64)
        | (Windows, X86 | Amd64)
    )
  }

  /// `CGO_ENABLED` value for this platform.
  pub fn cgo_flag(&self) -> &'static str {
    if self.cgo_enabled() { "1" } else { "0" }
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.key())
  }
}

impl FromStr for Platform {
  type Err = PlatformParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (os, arch) = s
      .split_once('_')
      .ok_or_else(|| PlatformParseError::Malformed(s.to_string()))?;
    Ok(Self::new(os.parse()?, arch.parse()?))
  }
}

//! Supported-platform table and request resolution.
//!
//! The table fixes the canonical order for every later stage: builds, packaging
//! and the download index all follow it, whatever order the user asked in.

use super::Platform;
use super::arch::Arch;
use super::os::Os;

const STANDARD_PLATFORMS: &[Platform] = &[
  Platform::new(Os::Darwin, Arch::X86),
  Platform::new(Os::Darwin, Arch::Amd64),
  Platform::new(Os::Linux, Arch::X86),
  Platform::new(Os::Linux, Arch::Amd64),
  Platform::new(Os::Linux, Arch::Arm),
  Platform::new(Os::Freebsd, Arch::X86),
  Platform::new(Os::Freebsd, Arch::Amd64),
  Platform::new(Os::Freebsd, Arch::Arm),
  Platform::new(Os::Netbsd, Arch::X86),
  Platform::new(Os::Netbsd, Arch::Amd64),
  Platform::new(Os::Netbsd, Arch::Arm),
  Platform::new(Os::Openbsd, Arch::X86),
  Platform::new(Os::Openbsd, Arch::Amd64),
  Platform::new(Os::Plan9, Arch::X86),
  Platform::new(Os::Windows, Arch::X86),
  Platform::new(Os::Windows, Arch::Amd64),
];

/// Ordered list of every platform the toolchain can target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformTable {
  platforms: Vec<Platform>,
}

impl PlatformTable {
  /// Create a table from an explicit list. Order is preserved.
  pub fn new(platforms: Vec<Platform>) -> Self {
    Self { platforms }
  }

  /// The built-in table of supported targets.
  pub fn standard() -> Self {
    Self::new(STANDARD_PLATFORMS.to_vec())
  }

  pub fn platforms(&self) -> &[Platform] {
    &self.platforms
  }

  pub fn len(&self) -> usize {
    self.platforms.len()
  }

  pub fn is_empty(&self) -> bool {
    self.platforms.is_empty()
  }
}

impl Default for PlatformTable {
  fn default() -> Self {
    Self::standard()
  }
}

/// A comma-separated OS or architecture request.
///
/// An empty element (including the empty string itself) matches anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
  entries: Vec<String>,
}

impl Selector {
  pub fn parse(list: &str) -> Self {
    Self {
      entries: list.split(',').map(|s| s.trim().to_string()).collect(),
    }
  }

  /// A selector that matches everything.
  pub fn any() -> Self {
    Self::parse("")
  }

  pub fn matches(&self, candidate: &str) -> bool {
    self.entries.iter().any(|e| e.is_empty() || e == candidate)
  }
}

/// The platforms selected for one run, in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedMatrix {
  platforms: Vec<Platform>,
}

impl ResolvedMatrix {
  pub fn platforms(&self) -> &[Platform] {
    &self.platforms
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Platform> {
    self.platforms.iter()
  }

  pub fn len(&self) -> usize {
    self.platforms.len()
  }

  pub fn is_empty(&self) -> bool {
    self.platforms.is_empty()
  }
}

impl<'a> IntoIterator for &'a ResolvedMatrix {
  type Item = &'a Platform;
  type IntoIter = std::slice::Iter<'a, Platform>;

  fn into_iter(self) -> Self::IntoIter {
    self.platforms.iter()
  }
}

/// Filter `table` down to the platforms matching both selectors.
///
/// Iterates the table, not the request, so duplicates in the request can
/// never produce duplicate platforms and the output order is always table order.
pub fn resolve(table: &PlatformTable, os: &Selector, arch: &Selector) -> ResolvedMatrix {
  let platforms = table
    .platforms()
    .iter()
    .filter(|p| os.matches(p.os.as_str()) && arch.matches(p.arch.as_str()))
    .copied()
    .collect();
  ResolvedMatrix { platforms }
}

//! Output layout. Every function here is pure.
//!
//! ```text
//! {output_root}/{version}/
//! ├── downloads.md
//! ├── {app}_{os}_{arch}.zip        # when archived
//! └── {os}_{arch}/
//!     └── {app}[.exe]
//! ```

use std::path::{Path, PathBuf};

use crate::consts::DOWNLOADS_FILENAME;
use crate::platform::Platform;

/// Executable file name for `app_name` on the platform's OS.
pub fn binary_name(platform: &Platform, app_name: &str) -> String {
  format!("{}{}", app_name, platform.os.exe_suffix())
}

/// Binary path relative to the output root: `{version}/{os}_{arch}/{app}[.exe]`.
pub fn relative_bin(platform: &Platform, app_name: &str, version: &str) -> PathBuf {
  PathBuf::from(version)
    .join(platform.key())
    .join(binary_name(platform, app_name))
}

/// Per-platform output directory.
pub fn platform_dir(output_root: &Path, version: &str, platform: &Platform) -> PathBuf {
  output_root.join(version).join(platform.key())
}

/// Directory holding everything produced for one version.
pub fn version_dir(output_root: &Path, version: &str) -> PathBuf {
  output_root.join(version)
}

/// Download index location.
pub fn index_path(output_root: &Path, version: &str) -> PathBuf {
  version_dir(output_root, version).join(DOWNLOADS_FILENAME)
}

/// Raw binary link as written in the download index (relative to the version directory).
pub fn binary_link(platform: &Platform, app_name: &str) -> String {
  format!("{}/{}", platform.key(), binary_name(platform, app_name))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::platform::arch::Arch;
  use crate::platform::os::Os;

  #[test]
  fn windows_binaries_get_exe_suffix() {
    let platform = Platform::new(Os::Windows, Arch::Amd64);
    assert_eq!(
      relative_bin(&platform, "demo", "1.2.0"),
      Path::new("1.2.0").join("windows_amd64").join("demo.exe")
    );
    assert_eq!(binary_link(&platform, "demo"), "windows_amd64/demo.exe");
  }

  #[test]
  fn relative_bin_is_deterministic() {
    let platform = Platform::new(Os::Linux, Arch::Arm);
    let first = relative_bin(&platform, "demo", "1.2.0");
    let second = relative_bin(&platform, "demo", "1.2.0");
    assert_eq!(first, second);
    assert_eq!(first, Path::new("1.2.0").join("linux_arm").join("demo"));
  }

  #[test]
  fn binary_sits_in_platform_dir() {
    let platform = Platform::new(Os::Darwin, Arch::Amd64);
    let root = Path::new("/out");
    assert_eq!(
      root.join(relative_bin(&platform, "demo", "0.1")).parent().unwrap(),
      platform_dir(root, "0.1", &platform)
    );
    assert_eq!(index_path(root, "0.1"), Path::new("/out/0.1/downloads.md"));
  }
}

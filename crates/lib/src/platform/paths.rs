use std::path::PathBuf;

use crate::consts::ARTIFACTS_DIR_SUFFIX;

fn non_empty_var(key: &str) -> Option<PathBuf> {
  std::env::var_os(key).filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Returns the user's home directory, falling back to the current directory.
pub fn home_dir() -> PathBuf {
  dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the directory the toolchain installs binaries into.
///
/// Resolution order: `$GOBIN`, the first entry of `$GOPATH` joined with `bin`,
/// then `~/go/bin`.
pub fn toolchain_bin_dir() -> PathBuf {
  if let Some(gobin) = non_empty_var("GOBIN") {
    return gobin;
  }
  if let Some(first) = non_empty_var("GOPATH").and_then(|gopath| std::env::split_paths(&gopath).next()) {
    return first.join("bin");
  }
  home_dir().join("go").join("bin")
}

/// Default output root for an application's cross-compiled artifacts.
pub fn default_artifacts_root(app_name: &str) -> PathBuf {
  toolchain_bin_dir().join(format!("{}{}", app_name, ARTIFACTS_DIR_SUFFIX))
}

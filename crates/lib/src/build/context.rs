use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::build::paths;
use crate::platform::Platform;
use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum ContextError {
  #[error("cannot derive an application name from {}; set app-name", path.display())]
  NoAppName { path: PathBuf },
}

/// Run-wide values every per-platform step shares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
  pub workspace: PathBuf,
  pub app_name: String,
  /// Full version label (package version plus prerelease info).
  pub version: String,
  pub output_root: PathBuf,
  pub toolchain: String,
  pub verbose: bool,
}

impl BuildContext {
  pub fn new(workspace: &Path, settings: &Settings) -> Result<Self, ContextError> {
    let app_name = settings
      .app_name_for(workspace)
      .filter(|name| !name.is_empty())
      .ok_or_else(|| ContextError::NoAppName {
        path: workspace.to_path_buf(),
      })?;

    Ok(Self {
      workspace: workspace.to_path_buf(),
      output_root: settings.artifacts_root(&app_name),
      version: settings.full_version_name(),
      toolchain: settings.toolchain.clone(),
      verbose: settings.verbose,
      app_name,
    })
  }

  pub fn version_dir(&self) -> PathBuf {
    paths::version_dir(&self.output_root, &self.version)
  }

  pub fn platform_dir(&self, platform: &Platform) -> PathBuf {
    paths::platform_dir(&self.output_root, &self.version, platform)
  }

  pub fn relative_bin(&self, platform: &Platform) -> PathBuf {
    paths::relative_bin(platform, &self.app_name, &self.version)
  }

  /// Absolute location of the compiled binary.
  pub fn binary_path(&self, platform: &Platform) -> PathBuf {
    self.output_root.join(self.relative_bin(platform))
  }

  pub fn index_path(&self) -> PathBuf {
    paths::index_path(&self.output_root, &self.version)
  }
}

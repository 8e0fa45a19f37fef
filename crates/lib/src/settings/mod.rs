//! Run settings and the workspace config files they are loaded from.
//!
//! # Config Layout
//!
//! ```text
//! {workspace}/
//! ├── .xforge.json         # committed project settings
//! └── .xforge.local.json   # optional, merged key-by-key over .xforge.json
//! ```
//!
//! Every key is optional; anything missing takes its default.

mod task;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::consts::{CONFIG_FILENAME, DEFAULT_PACKAGE_VERSION, DEFAULT_TOOLCHAIN, LOCAL_CONFIG_FILENAME};
use crate::platform::paths::default_artifacts_root;

pub use task::{PRE_BUILD_ORDER, Task, TaskSet, UnknownTask};

/// Errors from loading or writing config files.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("{} must contain a JSON object", path.display())]
  NotAnObject { path: PathBuf },

  #[error("invalid settings: {0}")]
  Invalid(#[source] serde_json::Error),

  #[error("{} already exists", path.display())]
  AlreadyExists { path: PathBuf },

  #[error("failed to write {}: {source}", path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Everything a run needs to know. Built once, never mutated during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
  /// Comma-separated OS selector; an empty element matches every OS.
  pub os: String,
  /// Comma-separated architecture selector; an empty element matches every arch.
  pub arch: String,
  pub tasks: TaskSet,
  pub package_version: String,
  pub prerelease_info: String,
  /// Defaults to the workspace directory name.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub app_name: Option<String>,
  /// Output root. Defaults to `<toolchain bin dir>/<app>-xc`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub artifacts_dest: Option<PathBuf>,
  /// Glob patterns, relative to the workspace, bundled into archives.
  pub resources_include: Vec<String>,
  /// Code-signing identity. Empty disables signing.
  pub codesign: String,
  /// Compiler program.
  pub toolchain: String,
  /// Toolchain root used by the bootstrap task. Queried from the toolchain when unset.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub goroot: Option<PathBuf>,
  pub verbose: bool,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      os: String::new(),
      arch: String::new(),
      tasks: TaskSet::default(),
      package_version: DEFAULT_PACKAGE_VERSION.to_string(),
      prerelease_info: String::new(),
      app_name: None,
      artifacts_dest: None,
      resources_include: vec!["README*".to_string(), "LICENSE*".to_string()],
      codesign: String::new(),
      toolchain: DEFAULT_TOOLCHAIN.to_string(),
      goroot: None,
      verbose: false,
    }
  }
}

impl Settings {
  /// Load settings for `workspace`, merging the local override over the project file.
  ///
  /// Missing files are not an error; a workspace with neither yields defaults.
  pub fn load(workspace: &Path) -> Result<Self, ConfigError> {
    let mut merged = Map::new();

    for name in [CONFIG_FILENAME, LOCAL_CONFIG_FILENAME] {
      let path = workspace.join(name);
      let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
        Err(source) => return Err(ConfigError::Read { path, source }),
      };

      let value: Value = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
      })?;
      let Value::Object(layer) = value else {
        return Err(ConfigError::NotAnObject { path });
      };
      merged.extend(layer);
    }

    serde_json::from_value(Value::Object(merged)).map_err(ConfigError::Invalid)
  }

  /// Write a default project config into `workspace`. Refuses to overwrite.
  pub fn write_default(workspace: &Path) -> Result<PathBuf, ConfigError> {
    let path = workspace.join(CONFIG_FILENAME);
    if path.exists() {
      return Err(ConfigError::AlreadyExists { path });
    }

    let mut content = serde_json::to_string_pretty(&Settings::default()).map_err(ConfigError::Invalid)?;
    content.push('\n');
    fs::write(&path, content).map_err(|source| ConfigError::Write {
      path: path.clone(),
      source,
    })?;
    Ok(path)
  }

  /// Version label used for directory names, the link-time flag and the index header.
  pub fn full_version_name(&self) -> String {
    if self.prerelease_info.is_empty() {
      self.package_version.clone()
    } else {
      format!("{}-{}", self.package_version, self.prerelease_info)
    }
  }

  pub fn is_task(&self, task: Task) -> bool {
    self.tasks.contains(task)
  }

  /// Application name: the configured one, else the workspace directory name.
  pub fn app_name_for(&self, workspace: &Path) -> Option<String> {
    match &self.app_name {
      Some(name) if !name.is_empty() => Some(name.clone()),
      _ => workspace.file_name().map(|n| n.to_string_lossy().into_owned()),
    }
  }

  /// Output root for `app_name`.
  pub fn artifacts_root(&self, app_name: &str) -> PathBuf {
    match &self.artifacts_dest {
      Some(dest) => dest.clone(),
      None => default_artifacts_root(app_name),
    }
  }
}

//! Resolution of resource include patterns against the workspace.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glob::Pattern;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum ResourceError {
  #[error("invalid resource pattern '{pattern}': {source}")]
  Pattern {
    pattern: String,
    #[source]
    source: glob::PatternError,
  },

  #[error("failed to read resource match: {0}")]
  Glob(#[from] glob::GlobError),

  #[error("failed to walk {}: {source}", path.display())]
  Walk {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },
}

/// A file to bundle, with its name inside the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
  pub source: PathBuf,
  /// Workspace-relative, `/`-separated.
  pub name: String,
}

fn archive_name(workspace: &Path, path: &Path) -> Option<String> {
  let relative = path.strip_prefix(workspace).ok()?;
  let parts: Vec<String> = relative
    .components()
    .map(|c| c.as_os_str().to_string_lossy().into_owned())
    .collect();
  (!parts.is_empty()).then(|| parts.join("/"))
}

/// Expand `patterns` relative to `workspace` into a sorted, de-duplicated file list.
///
/// A matched directory contributes every file beneath it.
pub fn resolve(workspace: &Path, patterns: &[String]) -> Result<Vec<Resource>, ResourceError> {
  let base = Pattern::escape(&workspace.to_string_lossy());
  let mut found: BTreeMap<String, PathBuf> = BTreeMap::new();

  for pattern in patterns.iter().filter(|p| !p.trim().is_empty()) {
    let full = format!("{}/{}", base, pattern.trim());
    let matches = glob::glob(&full).map_err(|source| ResourceError::Pattern {
      pattern: pattern.clone(),
      source,
    })?;

    for entry in matches {
      let path = entry?;
      if path.is_dir() {
        for item in WalkDir::new(&path).sort_by_file_name() {
          let item = item.map_err(|source| ResourceError::Walk {
            path: path.clone(),
            source,
          })?;
          if item.file_type().is_file() {
            if let Some(name) = archive_name(workspace, item.path()) {
              found.entry(name).or_insert_with(|| item.path().to_path_buf());
            }
          }
        }
      } else if path.is_file() {
        if let Some(name) = archive_name(workspace, &path) {
          found.entry(name).or_insert(path);
        }
      }
    }
  }

  Ok(
    found
      .into_iter()
      .map(|(name, source)| Resource { source, name })
      .collect(),
  )
}

//! Markdown download index.
//!
//! ```text
//! demo downloads (1.2.0)
//! ------------
//!
//!  * [darwin amd64](demo_darwin_amd64.zip)
//!  * [linux amd64](demo_linux_amd64.tar.gz)
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::artifact::ArtifactMap;
use crate::platform::{Platform, ResolvedMatrix};

const SEPARATOR: &str = "------------";

#[derive(Debug, Error)]
#[error("could not write download index {}: {source}", path.display())]
pub struct IndexError {
  pub path: PathBuf,
  #[source]
  pub source: io::Error,
}

/// Writes `downloads.md` for one version directory.
#[derive(Debug, Clone)]
pub struct DownloadIndex {
  path: PathBuf,
  app_name: String,
  version: String,
}

impl DownloadIndex {
  pub fn new(path: impl Into<PathBuf>, app_name: impl Into<String>, version: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      app_name: app_name.into(),
      version: version.into(),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn open(&self, is_first: bool) -> io::Result<File> {
    if is_first {
      info!(path = %self.path.display(), "creating download index");
      OpenOptions::new().write(true).create(true).truncate(true).open(&self.path)
    } else {
      OpenOptions::new().append(true).open(&self.path)
    }
  }

  /// Write one platform's line. The first entry truncates the file and writes the header.
  pub fn write_entry(&self, platform: &Platform, link: &str, is_first: bool) -> Result<(), IndexError> {
    let write = || -> io::Result<()> {
      let mut file = self.open(is_first)?;
      if is_first {
        write!(file, "{} downloads ({})\n{}\n\n", self.app_name, self.version, SEPARATOR)?;
      }
      writeln!(file, " * [{} {}]({})", platform.os, platform.arch, link)
    };
    write().map_err(|source| IndexError {
      path: self.path.clone(),
      source,
    })
  }

  /// Write every platform of `matrix`, in matrix order, looking each up in `artifacts`.
  ///
  /// Stops at the first write failure. Platforms without a record are skipped.
  pub fn write_all(&self, matrix: &ResolvedMatrix, artifacts: &ArtifactMap) -> Result<usize, IndexError> {
    let mut written = 0;
    for platform in matrix {
      let Some(record) = artifacts.get(platform) else {
        warn!(platform = %platform, "no artifact recorded, leaving it out of the index");
        continue;
      };
      self.write_entry(platform, &record.path, written == 0)?;
      written += 1;
    }
    Ok(written)
  }
}

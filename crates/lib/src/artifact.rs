//! Per-platform results accumulated during a run.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::package::archive::ArchiveError;
use crate::platform::Platform;
use crate::process::ProcessError;

/// The per-platform step a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
  OutputDir,
  Compile,
  Codesign,
  Archive,
}

impl Stage {
  pub fn as_str(&self) -> &'static str {
    match self {
      Stage::OutputDir => "output-dir",
      Stage::Compile => "compile",
      Stage::Codesign => "codesign",
      Stage::Archive => "archive",
    }
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Why a per-platform step failed.
#[derive(Debug, Error)]
pub enum StageError {
  #[error(transparent)]
  Process(#[from] ProcessError),

  #[error(transparent)]
  Archive(#[from] ArchiveError),

  #[error("failed to create {}: {source}", path.display())]
  CreateDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// A non-fatal failure recorded against one platform.
#[derive(Debug)]
pub struct StageFailure {
  pub stage: Stage,
  pub error: StageError,
}

impl StageFailure {
  pub fn new(stage: Stage, error: impl Into<StageError>) -> Self {
    Self {
      stage,
      error: error.into(),
    }
  }
}

impl fmt::Display for StageFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.stage, self.error)
  }
}

/// The reportable outcome for one platform.
#[derive(Debug)]
pub struct ArtifactRecord {
  pub platform: Platform,
  /// Link target relative to the version directory, `/`-separated.
  /// Either the archive name or `OS_Arch/<binary>`.
  pub path: String,
  /// Whether `path` names an archive rather than the raw binary.
  pub archived: bool,
  pub failures: Vec<StageFailure>,
}

impl ArtifactRecord {
  pub fn is_ok(&self) -> bool {
    self.failures.is_empty()
  }

  pub fn failed(&self, stage: Stage) -> bool {
    self.failures.iter().any(|f| f.stage == stage)
  }
}

/// Artifact records keyed by platform key ("OS_Arch").
///
/// Lookup only: report order always comes from the resolved matrix.
#[derive(Debug, Default)]
pub struct ArtifactMap {
  records: HashMap<String, ArtifactRecord>,
}

impl ArtifactMap {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record the outcome for a platform, replacing any earlier record.
  pub fn insert(&mut self, record: ArtifactRecord) -> Option<ArtifactRecord> {
    self.records.insert(record.platform.key(), record)
  }

  pub fn get(&self, platform: &Platform) -> Option<&ArtifactRecord> {
    self.records.get(&platform.key())
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }
}

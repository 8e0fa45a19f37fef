//! The full cross-compile run.
//!
//! Pre-build tasks, matrix resolution, optional toolchain bootstrap, then one
//! build-and-package pass per platform in matrix order, and finally a single
//! download index written from the fully populated artifact map.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::artifact::ArtifactMap;
use crate::build::{BuildContext, ContextError, PlatformBuilder};
use crate::package::{ArtifactPackager, PackageOptions};
use crate::platform::os::Os;
use crate::platform::{Platform, PlatformTable, ResolvedMatrix, Selector, resolve};
use crate::prebuild::{PreBuildError, run_pre_tasks};
use crate::process::{CommandRunner, ProcessError};
use crate::report::{DownloadIndex, IndexError};
use crate::settings::{Settings, Task};
use crate::toolchain;

/// Errors that abort a run before any platform is touched.
#[derive(Debug, Error)]
pub enum RunError {
  #[error(transparent)]
  Context(#[from] ContextError),

  #[error(transparent)]
  PreBuild(#[from] PreBuildError),
}

/// Everything a completed run produced.
#[derive(Debug, Default)]
pub struct RunReport {
  pub matrix: ResolvedMatrix,
  /// Pre-build tasks that ran, in order.
  pub pre_tasks: Vec<Task>,
  pub artifacts: ArtifactMap,
  /// Path of the written index, if any entry was written.
  pub index: Option<PathBuf>,
  pub index_error: Option<IndexError>,
  pub bootstrap_failures: Vec<(Platform, ProcessError)>,
}

impl RunReport {
  /// True when no platform, bootstrap or index step recorded a failure.
  pub fn is_clean(&self) -> bool {
    self.index_error.is_none()
      && self.bootstrap_failures.is_empty()
      && self
        .matrix
        .iter()
        .all(|p| self.artifacts.get(p).is_some_and(|record| record.is_ok()))
  }
}

pub struct Orchestrator<'a, R> {
  runner: &'a R,
  table: &'a PlatformTable,
  settings: &'a Settings,
  workspace: PathBuf,
  host: Option<Os>,
}

impl<'a, R: CommandRunner> Orchestrator<'a, R> {
  pub fn new(
    runner: &'a R,
    table: &'a PlatformTable,
    settings: &'a Settings,
    workspace: impl Into<PathBuf>,
    host: Option<Os>,
  ) -> Self {
    Self {
      runner,
      table,
      settings,
      workspace: workspace.into(),
      host,
    }
  }

  pub async fn run(&self) -> Result<RunReport, RunError> {
    let ctx = BuildContext::new(&self.workspace, self.settings)?;
    info!(
      app = %ctx.app_name,
      version = %ctx.version,
      output = %ctx.output_root.display(),
      "starting run"
    );

    let pre_tasks = run_pre_tasks(self.runner, &self.workspace, self.settings).await?;

    let matrix = resolve(
      self.table,
      &Selector::parse(&self.settings.os),
      &Selector::parse(&self.settings.arch),
    );
    info!(platforms = matrix.len(), "resolved platform matrix");

    let mut report = RunReport {
      matrix,
      pre_tasks,
      ..Default::default()
    };

    if self.settings.is_task(Task::Toolchain) && !report.matrix.is_empty() {
      report.bootstrap_failures = self.bootstrap(&report.matrix).await;
    }

    if !self.settings.is_task(Task::Build) {
      info!("build task disabled, nothing to compile");
      return Ok(report);
    }

    let builder = PlatformBuilder::new(self.runner, &ctx);
    let packager = ArtifactPackager::new(self.runner, &ctx, PackageOptions::from_settings(self.settings), self.host);
    for platform in &report.matrix {
      let outcome = builder.build(platform).await;
      let record = packager.package(outcome).await;
      report.artifacts.insert(record);
    }

    if !report.artifacts.is_empty() {
      let index = DownloadIndex::new(ctx.index_path(), &ctx.app_name, &ctx.version);
      match index.write_all(&report.matrix, &report.artifacts) {
        Ok(0) => {}
        Ok(_) => {
          info!(path = %index.path().display(), "download index written");
          report.index = Some(index.path().to_path_buf());
        }
        Err(e) => {
          warn!(error = %e, "download index incomplete");
          report.index_error = Some(e);
        }
      }
    }

    Ok(report)
  }

  async fn bootstrap(&self, matrix: &ResolvedMatrix) -> Vec<(Platform, ProcessError)> {
    match toolchain::locate_goroot(self.runner, self.settings).await {
      Ok(goroot) if !goroot.as_os_str().is_empty() => {
        toolchain::bootstrap_all(self.runner, &goroot, matrix, self.host).await
      }
      Ok(_) => {
        warn!("toolchain reported an empty GOROOT, skipping bootstrap");
        Vec::new()
      }
      Err(e) => {
        warn!(error = %e, "could not determine GOROOT, skipping bootstrap");
        Vec::new()
      }
    }
  }
}

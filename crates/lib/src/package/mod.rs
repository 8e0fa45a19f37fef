//! Per-platform post-processing: code-signing and archiving.
//!
//! Both sub-steps are individually non-fatal. Whatever happens, the packager
//! hands back the single best reportable path for the platform: the archive
//! when one was written, otherwise the raw binary.
//!
//! # Submodules
//!
//! - [`archive`] - Zip / tar.gz writer
//! - [`codesign`] - Signing eligibility and invocation
//! - [`resources`] - Include-pattern resolution

pub mod archive;
pub mod codesign;
pub mod resources;

use tracing::{info, warn};

use crate::artifact::{ArtifactRecord, Stage, StageFailure};
use crate::build::BuildContext;
use crate::build::BuildOutcome;
use crate::build::paths::binary_link;
use crate::platform::os::Os;
use crate::process::CommandRunner;
use crate::settings::{Settings, Task};

use archive::{ArchiveError, ArchiveRequest, write_archive};

/// Packaging switches taken from settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOptions {
  /// Signing identity. Empty disables signing.
  pub identity: String,
  pub archive: bool,
  pub remove_binary: bool,
  pub resource_patterns: Vec<String>,
}

impl PackageOptions {
  pub fn from_settings(settings: &Settings) -> Self {
    Self {
      identity: settings.codesign.clone(),
      archive: settings.is_task(Task::Archive),
      remove_binary: settings.is_task(Task::RemoveBinary),
      resource_patterns: settings.resources_include.clone(),
    }
  }
}

pub struct ArtifactPackager<'a, R> {
  runner: &'a R,
  ctx: &'a BuildContext,
  options: PackageOptions,
  /// OS of the machine running the build; decides signing eligibility.
  host: Option<Os>,
}

impl<'a, R: CommandRunner> ArtifactPackager<'a, R> {
  pub fn new(runner: &'a R, ctx: &'a BuildContext, options: PackageOptions, host: Option<Os>) -> Self {
    Self {
      runner,
      ctx,
      options,
      host,
    }
  }

  /// Sign and archive one platform's binary, producing its artifact record.
  pub async fn package(&self, mut outcome: BuildOutcome) -> ArtifactRecord {
    let platform = outcome.platform;
    let mut failures = std::mem::take(&mut outcome.failures);

    if codesign::should_sign(&self.options.identity, self.host, platform.os) {
      match codesign::sign(self.runner, &self.options.identity, &outcome.binary).await {
        Ok(()) => info!(platform = %platform, identity = %self.options.identity, "signed"),
        Err(e) => {
          warn!(platform = %platform, error = %e, "codesign failed, binary left unsigned");
          failures.push(StageFailure::new(Stage::Codesign, e));
        }
      }
    }

    let mut record = ArtifactRecord {
      platform,
      path: binary_link(&platform, &self.ctx.app_name),
      archived: false,
      failures,
    };

    if self.options.archive {
      match self.archive(&outcome) {
        Ok(name) => {
          info!(platform = %platform, archive = %name, "artifact archived");
          record.path = name;
          record.archived = true;
        }
        Err(e) => {
          warn!(platform = %platform, error = %e, "archive failed, reporting raw binary");
          record.failures.push(StageFailure::new(Stage::Archive, e));
        }
      }
    }

    record
  }

  /// Returns the archive's file name (its link relative to the version directory).
  fn archive(&self, outcome: &BuildOutcome) -> Result<String, ArchiveError> {
    let resources = resources::resolve(&self.ctx.workspace, &self.options.resource_patterns)?;
    let dest_dir = self.ctx.version_dir();
    let path = write_archive(&ArchiveRequest {
      dest_dir: &dest_dir,
      binary: &outcome.binary,
      app_name: &self.ctx.app_name,
      platform: &outcome.platform,
      resources: &resources,
      remove_binary: self.options.remove_binary,
    })?;
    Ok(
      path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| archive::archive_name(&self.ctx.app_name, &outcome.platform)),
    )
  }
}

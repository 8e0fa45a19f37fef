//! Compiler invocation for a single platform.

use std::path::PathBuf;

use tokio::fs;
use tracing::{debug, info, warn};

use crate::artifact::{Stage, StageError, StageFailure};
use crate::build::context::BuildContext;
use crate::consts::VERSION_SYMBOL;
use crate::platform::Platform;
use crate::process::{CommandRunner, ExternalCommand};

/// What compiling one platform produced.
///
/// The binary path is always set, even when compilation failed, so later
/// stages and the index can still refer to where the artifact should be.
#[derive(Debug)]
pub struct BuildOutcome {
  pub platform: Platform,
  /// Path relative to the output root.
  pub relative_bin: PathBuf,
  /// Absolute binary path.
  pub binary: PathBuf,
  pub failures: Vec<StageFailure>,
}

impl BuildOutcome {
  /// Whether the compiler reported success.
  pub fn compiled(&self) -> bool {
    !self.failures.iter().any(|f| f.stage == Stage::Compile)
  }
}

/// Target environment for the toolchain: GOOS, GOARCH and CGO_ENABLED.
pub fn target_env(platform: &Platform) -> [(&'static str, &'static str); 3] {
  [
    ("GOOS", platform.os.as_str()),
    ("GOARCH", platform.arch.as_str()),
    ("CGO_ENABLED", platform.cgo_flag()),
  ]
}

/// Compiler invocation: `build [-ldflags "-X main.VERSION=<v>"] -o <binary> <workspace>`.
pub fn compile_command(ctx: &BuildContext, platform: &Platform) -> ExternalCommand {
  let mut cmd = ExternalCommand::new(&ctx.toolchain).arg("build");
  if !ctx.version.is_empty() {
    cmd = cmd.args(["-ldflags".to_string(), format!("-X {}={}", VERSION_SYMBOL, ctx.version)]);
  }
  let mut cmd = cmd
    .arg("-o")
    .path_arg(&ctx.binary_path(platform))
    .path_arg(&ctx.workspace)
    .current_dir(&ctx.workspace);
  for (key, value) in target_env(platform) {
    cmd = cmd.env(key, value);
  }
  cmd
}

/// Compiles the workspace once per platform.
pub struct PlatformBuilder<'a, R> {
  runner: &'a R,
  ctx: &'a BuildContext,
}

impl<'a, R: CommandRunner> PlatformBuilder<'a, R> {
  pub fn new(runner: &'a R, ctx: &'a BuildContext) -> Self {
    Self { runner, ctx }
  }

  /// Build one platform. Never fails the run: problems are recorded on the outcome.
  pub async fn build(&self, platform: &Platform) -> BuildOutcome {
    info!(platform = %platform, "building");

    let mut outcome = BuildOutcome {
      platform: *platform,
      relative_bin: self.ctx.relative_bin(platform),
      binary: self.ctx.binary_path(platform),
      failures: Vec::new(),
    };

    let out_dir = self.ctx.platform_dir(platform);
    if let Err(source) = fs::create_dir_all(&out_dir).await {
      warn!(platform = %platform, path = %out_dir.display(), error = %source, "could not create output directory");
      outcome.failures.push(StageFailure::new(
        Stage::OutputDir,
        StageError::CreateDir { path: out_dir, source },
      ));
    }

    let cmd = compile_command(self.ctx, platform);
    if self.ctx.verbose {
      info!(
        goos = platform.os.as_str(),
        goarch = platform.arch.as_str(),
        cgo_enabled = platform.cgo_flag(),
        command = %cmd,
        cwd = %self.ctx.workspace.display(),
        "compiler invocation"
      );
    } else {
      debug!(command = %cmd, cgo_enabled = platform.cgo_flag(), "compiler invocation");
    }

    match self.runner.run(&cmd).await {
      Ok(_) => info!(platform = %platform, binary = %outcome.binary.display(), "artifact generated"),
      Err(e) => {
        warn!(platform = %platform, error = %e, "compile failed");
        outcome.failures.push(StageFailure::new(Stage::Compile, e));
      }
    }

    outcome
  }
}

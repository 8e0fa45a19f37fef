//! Implementation of the `xforge build` command.
//!
//! Loads workspace settings, layers command-line overrides on top and drives
//! one full orchestrator run. Per-platform failures are reported in the
//! summary; only config, workspace and pre-build failures fail the command.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use owo_colors::{OwoColorize, Stream};
use tracing::debug;

use xforge_lib::package::codesign;
use xforge_lib::platform::PlatformTable;
use xforge_lib::process::SystemRunner;
use xforge_lib::settings::{Settings, Task, TaskSet};
use xforge_lib::{Orchestrator, RunReport};

use crate::output::{format_duration, print_error, print_info, print_stat, print_success, print_warning, symbols};

#[derive(Debug, Args)]
pub struct BuildArgs {
  /// Workspace directory
  #[arg(default_value = ".")]
  pub dir: PathBuf,

  /// Comma-separated OS selector, e.g. "linux,darwin"
  #[arg(long)]
  pub os: Option<String>,

  /// Comma-separated architecture selector, e.g. "amd64,arm"
  #[arg(long)]
  pub arch: Option<String>,

  /// Enabled tasks, replacing the configured set
  #[arg(long, value_delimiter = ',')]
  pub tasks: Option<Vec<Task>>,

  /// Package version
  #[arg(long = "pv")]
  pub package_version: Option<String>,

  /// Prerelease info appended to the version
  #[arg(long = "pr")]
  pub prerelease_info: Option<String>,

  /// Application name (defaults to the workspace directory name)
  #[arg(long)]
  pub app_name: Option<String>,

  /// Output root
  #[arg(short = 'd', long = "dest")]
  pub artifacts_dest: Option<PathBuf>,

  /// Resource glob patterns bundled into archives
  #[arg(long, value_delimiter = ',')]
  pub include: Option<Vec<String>>,

  /// Code-signing identity
  #[arg(long)]
  pub codesign: Option<String>,

  /// Compiler program
  #[arg(long)]
  pub toolchain: Option<String>,
}

impl BuildArgs {
  fn apply(self, settings: &mut Settings, verbose: bool) {
    if let Some(os) = self.os {
      settings.os = os;
    }
    if let Some(arch) = self.arch {
      settings.arch = arch;
    }
    if let Some(tasks) = self.tasks {
      settings.tasks = tasks.into_iter().collect::<TaskSet>();
    }
    if let Some(version) = self.package_version {
      settings.package_version = version;
    }
    if let Some(pr) = self.prerelease_info {
      settings.prerelease_info = pr;
    }
    if self.app_name.is_some() {
      settings.app_name = self.app_name;
    }
    if self.artifacts_dest.is_some() {
      settings.artifacts_dest = self.artifacts_dest;
    }
    if let Some(include) = self.include {
      settings.resources_include = include;
    }
    if let Some(identity) = self.codesign {
      settings.codesign = identity;
    }
    if let Some(toolchain) = self.toolchain {
      settings.toolchain = toolchain;
    }
    settings.verbose |= verbose;
  }
}

/// Execute the build command.
pub fn cmd_build(args: BuildArgs, verbose: bool) -> Result<()> {
  let start = Instant::now();
  let workspace = dunce::canonicalize(&args.dir)
    .with_context(|| format!("Workspace not found: {}", args.dir.display()))?;

  let mut settings = Settings::load(&workspace).context("Failed to load settings")?;
  args.apply(&mut settings, verbose);
  debug!(?settings, "effective settings");

  let table = PlatformTable::standard();
  let runner = SystemRunner;
  let orchestrator = Orchestrator::new(&runner, &table, &settings, &workspace, codesign::host_os());

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt.block_on(orchestrator.run()).context("Build failed")?;

  print_summary(&report, &workspace);
  println!();
  print_stat("Elapsed", &format_duration(start.elapsed()));

  Ok(())
}

fn print_summary(report: &RunReport, workspace: &Path) {
  println!();
  println!("Build complete!");
  print_stat("Workspace", &workspace.display().to_string());
  print_stat("Platforms", &report.matrix.len().to_string());
  if !report.pre_tasks.is_empty() {
    let tasks: Vec<&str> = report.pre_tasks.iter().map(|t| t.as_str()).collect();
    print_stat("Pre-build", &tasks.join(", "));
  }
  println!();

  for (platform, err) in &report.bootstrap_failures {
    print_warning(&format!("toolchain bootstrap for {} failed: {}", platform, err));
  }

  for platform in &report.matrix {
    match report.artifacts.get(platform) {
      Some(record) if record.is_ok() => print_success(&format!(
        "{:<16} {} {}",
        platform.key(),
        symbols::ARROW,
        record.path.if_supports_color(Stream::Stdout, |s| s.cyan())
      )),
      Some(record) => {
        print_error(&format!("{:<16} {} {}", platform.key(), symbols::ARROW, record.path));
        for failure in &record.failures {
          eprintln!("    {}", failure);
        }
      }
      None => print_info(&format!("{:<16} not built", platform.key())),
    }
  }

  if let Some(index) = &report.index {
    println!();
    print_info(&format!("Download index: {}", index.display()));
  }
  if let Some(err) = &report.index_error {
    print_warning(&err.to_string());
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn empty_args() -> BuildArgs {
    BuildArgs {
      dir: PathBuf::from("."),
      os: None,
      arch: None,
      tasks: None,
      package_version: None,
      prerelease_info: None,
      app_name: None,
      artifacts_dest: None,
      include: None,
      codesign: None,
      toolchain: None,
    }
  }

  #[test]
  fn missing_flags_keep_loaded_settings() {
    let mut settings = Settings {
      os: "linux".to_string(),
      package_version: "1.0".to_string(),
      ..Default::default()
    };
    let before = settings.clone();

    empty_args().apply(&mut settings, false);

    assert_eq!(settings, before);
  }

  #[test]
  fn flags_override_settings() {
    let mut settings = Settings::default();
    let args = BuildArgs {
      os: Some("darwin".to_string()),
      tasks: Some(vec![Task::Clean, Task::Build]),
      package_version: Some("2.0".to_string()),
      prerelease_info: Some("rc1".to_string()),
      ..empty_args()
    };

    args.apply(&mut settings, true);

    assert_eq!(settings.os, "darwin");
    assert!(settings.is_task(Task::Clean));
    assert!(!settings.is_task(Task::Archive));
    assert_eq!(settings.full_version_name(), "2.0-rc1");
    assert!(settings.verbose);
  }
}

//! Bootstrapping cross-compilers for platforms the installed toolchain lacks.
//!
//! Runs the toolchain's own `src/make.bash --no-clean` once per platform with the
//! target environment set. How the toolchain builds itself is its own business;
//! only the invocation lives here.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::build::execute::target_env;
use crate::platform::Platform;
use crate::platform::os::Os;
use crate::process::{CommandRunner, ExternalCommand, ProcessError};
use crate::settings::Settings;

/// Bootstrap script name for the host.
pub fn make_script(host: Option<Os>) -> &'static str {
  match host {
    Some(Os::Windows) => "make.bat",
    Some(Os::Plan9) => "make.rc",
    _ => "make.bash",
  }
}

pub fn bootstrap_command(goroot: &Path, platform: &Platform, host: Option<Os>) -> ExternalCommand {
  let src = goroot.join("src");
  let mut cmd = ExternalCommand::new(src.join(make_script(host)).to_string_lossy().into_owned())
    .arg("--no-clean")
    .current_dir(src);
  for (key, value) in target_env(platform) {
    cmd = cmd.env(key, value);
  }
  cmd
}

/// Locate the toolchain root: the configured one, else ask `<toolchain> env GOROOT`.
pub async fn locate_goroot<R: CommandRunner>(runner: &R, settings: &Settings) -> Result<PathBuf, ProcessError> {
  if let Some(goroot) = &settings.goroot {
    return Ok(goroot.clone());
  }
  let cmd = ExternalCommand::new(&settings.toolchain).args(["env", "GOROOT"]).capture();
  let output = runner.run(&cmd).await?;
  Ok(PathBuf::from(output.stdout.trim()))
}

/// Bootstrap every platform in order. Returns the platforms that failed.
pub async fn bootstrap_all<'p, R: CommandRunner>(
  runner: &R,
  goroot: &Path,
  platforms: impl IntoIterator<Item = &'p Platform>,
  host: Option<Os>,
) -> Vec<(Platform, ProcessError)> {
  let mut failed = Vec::new();
  for platform in platforms {
    info!(platform = %platform, goroot = %goroot.display(), "bootstrapping toolchain");
    if let Err(e) = runner.run(&bootstrap_command(goroot, platform, host)).await {
      warn!(platform = %platform, error = %e, "toolchain bootstrap failed");
      failed.push((*platform, e));
    }
  }
  failed
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::platform::arch::Arch;
  use crate::util::testutil::FakeRunner;

  #[test]
  fn bootstrap_runs_make_script_from_src() {
    let cmd = bootstrap_command(
      Path::new("/usr/local/go"),
      &Platform::new(Os::Windows, Arch::X86),
      Some(Os::Linux),
    );

    assert_eq!(Path::new(&cmd.program), Path::new("/usr/local/go/src/make.bash"));
    assert_eq!(cmd.args, vec!["--no-clean"]);
    assert_eq!(cmd.cwd.as_deref(), Some(Path::new("/usr/local/go/src")));
    assert_eq!(cmd.env.get("GOOS").map(String::as_str), Some("windows"));
    assert_eq!(cmd.env.get("GOARCH").map(String::as_str), Some("386"));
  }

  #[test]
  fn windows_host_uses_batch_script() {
    assert_eq!(make_script(Some(Os::Windows)), "make.bat");
    assert_eq!(make_script(None), "make.bash");
  }

  #[tokio::test]
  async fn configured_goroot_skips_query() {
    let runner = FakeRunner::new();
    let settings = Settings {
      goroot: Some(PathBuf::from("/opt/go")),
      ..Default::default()
    };

    assert_eq!(locate_goroot(&runner, &settings).await.unwrap(), PathBuf::from("/opt/go"));
    assert!(runner.calls().is_empty());
  }

  #[tokio::test]
  async fn goroot_is_queried_from_toolchain() {
    let runner = FakeRunner::new().with_stdout("/usr/lib/go\n");

    let goroot = locate_goroot(&runner, &Settings::default()).await.unwrap();

    assert_eq!(goroot, PathBuf::from("/usr/lib/go"));
    assert_eq!(runner.calls()[0].args, vec!["env", "GOROOT"]);
  }

  #[tokio::test]
  async fn failures_are_collected_per_platform() {
    let runner = FakeRunner::new().fail_when(|cmd| cmd.env.get("GOOS").is_some_and(|os| os == "plan9"));
    let platforms = [
      Platform::new(Os::Linux, Arch::Amd64),
      Platform::new(Os::Plan9, Arch::X86),
      Platform::new(Os::Windows, Arch::Amd64),
    ];

    let failed = bootstrap_all(&runner, Path::new("/go"), &platforms, Some(Os::Linux)).await;

    assert_eq!(runner.calls().len(), 3);
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].0, platforms[1]);
  }
}

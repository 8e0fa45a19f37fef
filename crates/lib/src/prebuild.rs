//! Whole-workspace maintenance tasks run before any platform is built.
//!
//! This is the only fail-fast stage: the first enabled task that fails stops
//! the run before any platform is touched.

use std::path::Path;

use thiserror::Error;
use tracing::{error, info};

use crate::process::{CommandRunner, ExternalCommand, ProcessError};
use crate::settings::{PRE_BUILD_ORDER, Settings, Task};

/// An enabled pre-build task failed.
#[derive(Debug, Error)]
#[error("pre-build task `{task}` failed: {source}")]
pub struct PreBuildError {
  pub task: Task,
  #[source]
  pub source: ProcessError,
}

/// Toolchain invocation for a pre-build task: the verb alone, run in the workspace.
pub fn task_command(toolchain: &str, workspace: &Path, verb: &str) -> ExternalCommand {
  ExternalCommand::new(toolchain).arg(verb).current_dir(workspace)
}

/// Run every enabled pre-build task in fixed order.
///
/// Returns the tasks that ran. Disabled tasks are skipped without side effects.
pub async fn run_pre_tasks<R: CommandRunner>(
  runner: &R,
  workspace: &Path,
  settings: &Settings,
) -> Result<Vec<Task>, PreBuildError> {
  let mut ran = Vec::new();

  for task in PRE_BUILD_ORDER {
    if !settings.is_task(task) {
      continue;
    }
    let Some(verb) = task.verb() else { continue };

    info!(task = %task, "running pre-build task");
    let cmd = task_command(&settings.toolchain, workspace, verb);
    if let Err(source) = runner.run(&cmd).await {
      error!(task = %task, error = %source, "pre-build task failed, aborting run");
      return Err(PreBuildError { task, source });
    }
    ran.push(task);
  }

  Ok(ran)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::settings::TaskSet;
  use crate::util::testutil::FakeRunner;

  fn settings_with(tasks: &[Task]) -> Settings {
    Settings {
      tasks: tasks.iter().copied().collect::<TaskSet>(),
      ..Default::default()
    }
  }

  #[tokio::test]
  async fn runs_enabled_tasks_in_fixed_order() {
    let runner = FakeRunner::new();
    let settings = settings_with(&[Task::Install, Task::Clean, Task::Test, Task::Build]);

    let ran = run_pre_tasks(&runner, Path::new("/ws"), &settings).await.unwrap();

    assert_eq!(ran, vec![Task::Clean, Task::Test, Task::Install]);
    let calls = runner.calls();
    let verbs: Vec<&str> = calls.iter().map(|c| c.args[0].as_str()).collect();
    assert_eq!(verbs, vec!["clean", "test", "install"]);
    assert!(calls.iter().all(|c| c.args.len() == 1));
    assert!(calls.iter().all(|c| c.cwd.as_deref() == Some(Path::new("/ws"))));
  }

  #[tokio::test]
  async fn first_failure_stops_remaining_tasks() {
    let runner = FakeRunner::new().fail_when(|cmd| cmd.args.first().is_some_and(|a| a == "vet"));
    let settings = settings_with(&Task::ALL);

    let err = run_pre_tasks(&runner, Path::new("/ws"), &settings).await.unwrap_err();

    assert_eq!(err.task, Task::Vet);
    let verbs: Vec<String> = runner.calls().iter().map(|c| c.args[0].clone()).collect();
    assert_eq!(verbs, vec!["clean", "vet"]);
  }

  #[tokio::test]
  async fn nothing_enabled_runs_nothing() {
    let runner = FakeRunner::new();
    let settings = settings_with(&[Task::Build, Task::Archive]);

    let ran = run_pre_tasks(&runner, Path::new("/ws"), &settings).await.unwrap();

    assert!(ran.is_empty());
    assert!(runner.calls().is_empty());
  }

  #[tokio::test]
  async fn uses_configured_toolchain() {
    let runner = FakeRunner::new();
    let settings = Settings {
      toolchain: "/opt/go/bin/go".to_string(),
      ..settings_with(&[Task::Fmt])
    };

    run_pre_tasks(&runner, Path::new("/ws"), &settings).await.unwrap();

    assert_eq!(runner.calls()[0].program, "/opt/go/bin/go");
  }
}

//! Synchronous-in-sequence execution of external programs.
//!
//! Every external invocation (pre-build verbs, the compiler, the signer and the
//! toolchain bootstrap) is described as an [`ExternalCommand`] and handed to a
//! [`CommandRunner`]. The runner awaits the child to completion before returning,
//! so callers never have more than one process in flight.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Where the child's standard streams go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Streams {
  /// Share the orchestrator's stdout/stderr. Stdin is closed.
  #[default]
  Inherit,
  /// Collect stdout/stderr into the returned [`CommandOutput`].
  Capture,
}

/// A fully described external invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalCommand {
  pub program: String,
  pub args: Vec<String>,
  /// Overrides layered on top of the inherited environment.
  pub env: BTreeMap<String, String>,
  pub cwd: Option<PathBuf>,
  pub streams: Streams,
}

impl ExternalCommand {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      ..Default::default()
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  /// Add a path argument, rendered lossily.
  pub fn path_arg(self, path: &Path) -> Self {
    self.arg(path.to_string_lossy().into_owned())
  }

  pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.env.insert(key.into(), value.into());
    self
  }

  pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.cwd = Some(dir.into());
    self
  }

  pub fn capture(mut self) -> Self {
    self.streams = Streams::Capture;
    self
  }

  /// Value of the argument following `flag`, if present.
  pub fn arg_after(&self, flag: &str) -> Option<&str> {
    self
      .args
      .iter()
      .position(|a| a == flag)
      .and_then(|i| self.args.get(i + 1))
      .map(String::as_str)
  }
}

impl fmt::Display for ExternalCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      if arg.is_empty() || arg.contains(' ') {
        write!(f, " {:?}", arg)?;
      } else {
        write!(f, " {}", arg)?;
      }
    }
    Ok(())
  }
}

/// Result of a child that exited successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
  /// Captured stdout (empty when streams were inherited).
  pub stdout: String,
  /// Captured stderr (empty when streams were inherited).
  pub stderr: String,
}

/// Errors from running an external program.
#[derive(Debug, Error)]
pub enum ProcessError {
  /// The program could not be started at all.
  #[error("failed to launch `{program}`: {source}")]
  Launch {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// The program ran but exited unsuccessfully.
  #[error("`{command}` exited with {}", describe_code(*code))]
  Exit {
    command: String,
    code: Option<i32>,
    stderr: String,
  },
}

fn describe_code(code: Option<i32>) -> String {
  match code {
    Some(code) => format!("exit code {}", code),
    None => "no exit code (terminated by signal)".to_string(),
  }
}

/// Runs an [`ExternalCommand`] to completion.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
  async fn run(&self, cmd: &ExternalCommand) -> Result<CommandOutput, ProcessError>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
  async fn run(&self, cmd: &ExternalCommand) -> Result<CommandOutput, ProcessError> {
    let mut command = Command::new(&cmd.program);
    command.args(&cmd.args).envs(&cmd.env).stdin(Stdio::null());
    if let Some(dir) = &cmd.cwd {
      command.current_dir(dir);
    }

    debug!(command = %cmd, cwd = ?cmd.cwd, "spawning process");

    let launch = |source| ProcessError::Launch {
      program: cmd.program.clone(),
      source,
    };

    let (status, stdout, stderr) = match cmd.streams {
      Streams::Inherit => {
        let status = command
          .stdout(Stdio::inherit())
          .stderr(Stdio::inherit())
          .status()
          .await
          .map_err(launch)?;
        (status, String::new(), String::new())
      }
      Streams::Capture => {
        let output = command.output().await.map_err(launch)?;
        (
          output.status,
          String::from_utf8_lossy(&output.stdout).into_owned(),
          String::from_utf8_lossy(&output.stderr).into_owned(),
        )
      }
    };

    if !status.success() {
      if !stderr.is_empty() {
        debug!(stderr = %stderr, "command stderr");
      }
      return Err(ProcessError::Exit {
        command: cmd.to_string(),
        code: status.code(),
        stderr,
      });
    }

    Ok(CommandOutput { stdout, stderr })
  }
}

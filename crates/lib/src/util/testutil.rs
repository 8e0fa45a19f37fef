//! Test utilities for xforge-lib.
//!
//! Provides a recording [`CommandRunner`] so pipeline stages can be tested
//! without a real toolchain, plus cross-platform shell helpers for the tests
//! that do spawn processes.

use std::cell::RefCell;
use std::fs;

use crate::process::{CommandOutput, CommandRunner, ExternalCommand, ProcessError};

type Predicate = Box<dyn Fn(&ExternalCommand) -> bool>;

/// Records every command it is asked to run and answers from a script.
///
/// A `build` invocation that is not told to fail writes a small file at its
/// `-o` path, standing in for the compiled binary.
#[derive(Default)]
pub struct FakeRunner {
  calls: RefCell<Vec<ExternalCommand>>,
  failures: Vec<Predicate>,
  stdout: String,
}

impl FakeRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Fail (with exit code 1) every command matching `predicate`.
  pub fn fail_when(mut self, predicate: impl Fn(&ExternalCommand) -> bool + 'static) -> Self {
    self.failures.push(Box::new(predicate));
    self
  }

  /// Stdout returned for every successful command.
  pub fn with_stdout(mut self, stdout: &str) -> Self {
    self.stdout = stdout.to_string();
    self
  }

  pub fn calls(&self) -> Vec<ExternalCommand> {
    self.calls.borrow().clone()
  }

  /// Calls whose program is `program`.
  pub fn calls_to(&self, program: &str) -> Vec<ExternalCommand> {
    self.calls().into_iter().filter(|c| c.program == program).collect()
  }
}

fn exit_failure(cmd: &ExternalCommand) -> ProcessError {
  ProcessError::Exit {
    command: cmd.to_string(),
    code: Some(1),
    stderr: String::new(),
  }
}

impl CommandRunner for FakeRunner {
  async fn run(&self, cmd: &ExternalCommand) -> Result<CommandOutput, ProcessError> {
    self.calls.borrow_mut().push(cmd.clone());

    if self.failures.iter().any(|f| f(cmd)) {
      return Err(exit_failure(cmd));
    }

    if cmd.args.first().is_some_and(|a| a == "build") {
      if let Some(out) = cmd.arg_after("-o") {
        let goos = cmd.env.get("GOOS").map(String::as_str).unwrap_or("?");
        let goarch = cmd.env.get("GOARCH").map(String::as_str).unwrap_or("?");
        fs::write(out, format!("binary for {}_{}", goos, goarch)).map_err(|_| exit_failure(cmd))?;
      }
    }

    Ok(CommandOutput {
      stdout: self.stdout.clone(),
      stderr: String::new(),
    })
  }
}

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A unit of work that can be switched on in the task set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Task {
  Toolchain,
  Clean,
  Vet,
  Test,
  Fmt,
  Install,
  Build,
  Archive,
  RemoveBinary,
}

/// Whole-workspace tasks, in the order they run before any platform build.
pub const PRE_BUILD_ORDER: [Task; 5] = [Task::Clean, Task::Vet, Task::Test, Task::Fmt, Task::Install];

impl Task {
  pub const ALL: [Task; 9] = [
    Task::Toolchain,
    Task::Clean,
    Task::Vet,
    Task::Test,
    Task::Fmt,
    Task::Install,
    Task::Build,
    Task::Archive,
    Task::RemoveBinary,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Task::Toolchain => "toolchain",
      Task::Clean => "clean",
      Task::Vet => "vet",
      Task::Test => "test",
      Task::Fmt => "fmt",
      Task::Install => "install",
      Task::Build => "build",
      Task::Archive => "archive",
      Task::RemoveBinary => "remove-binary",
    }
  }

  /// Toolchain sub-command for pre-build tasks.
  pub fn verb(&self) -> Option<&'static str> {
    PRE_BUILD_ORDER.contains(self).then(|| self.as_str())
  }
}

impl fmt::Display for Task {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown task '{0}' (expected one of: toolchain, clean, vet, test, fmt, install, build, archive, remove-binary)")]
pub struct UnknownTask(pub String);

impl FromStr for Task {
  type Err = UnknownTask;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    Task::ALL
      .into_iter()
      .find(|t| t.as_str() == s)
      .ok_or_else(|| UnknownTask(s.to_string()))
  }
}

/// The set of enabled tasks. Membership is all that matters; order comes from the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskSet(BTreeSet<Task>);

impl TaskSet {
  pub fn contains(&self, task: Task) -> bool {
    self.0.contains(&task)
  }
}

impl Default for TaskSet {
  fn default() -> Self {
    [Task::Build, Task::Archive].into_iter().collect()
  }
}

impl FromIterator<Task> for TaskSet {
  fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
    Self(iter.into_iter().collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_pre_build_tasks_have_verbs() {
    assert_eq!(Task::Fmt.verb(), Some("fmt"));
    assert_eq!(Task::Build.verb(), None);
    assert_eq!(Task::RemoveBinary.verb(), None);
  }

  #[test]
  fn parses_kebab_case_names() {
    assert_eq!("remove-binary".parse::<Task>().unwrap(), Task::RemoveBinary);
    assert_eq!(" vet ".parse::<Task>().unwrap(), Task::Vet);
    assert_eq!("xc".parse::<Task>(), Err(UnknownTask("xc".to_string())));
  }

  #[test]
  fn serde_uses_same_names_as_from_str() {
    for task in Task::ALL {
      let json = serde_json::to_string(&task).unwrap();
      assert_eq!(json, format!("\"{}\"", task.as_str()));
    }
  }
}

//! CLI smoke tests for xforge.
//!
//! These tests verify that all CLI commands run without panicking and
//! return appropriate exit codes.

use std::fs;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the xforge binary.
fn xforge_cmd() -> Command {
  cargo_bin_cmd!("xforge")
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  xforge_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  xforge_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("xforge"));
}

#[test]
fn subcommand_help_works() {
  for cmd in &["build", "platforms", "init", "info"] {
    xforge_cmd()
      .arg(cmd)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("Usage"));
  }
}

// =============================================================================
// Platforms & Info
// =============================================================================

#[test]
fn platforms_lists_whole_table_by_default() {
  let assert = xforge_cmd().arg("platforms").assert().success();
  let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
  let keys: Vec<&str> = stdout.lines().filter_map(|l| l.split_whitespace().next()).collect();

  assert_eq!(keys.len(), 16);
  assert_eq!(keys.first(), Some(&"darwin_386"));
  assert_eq!(keys.last(), Some(&"windows_amd64"));
}

#[test]
fn platforms_filters_in_table_order() {
  xforge_cmd()
    .args(["platforms", "--os", "windows,plan9", "--arch", "386"])
    .assert()
    .success()
    .stdout(predicate::str::is_match("(?s)plan9_386.*windows_386").unwrap())
    .stdout(predicate::str::contains("linux").not());
}

#[test]
fn info_shows_platform() {
  xforge_cmd()
    .arg("info")
    .assert()
    .success()
    .stdout(predicate::str::contains("Codesign:"));
}

// =============================================================================
// Init
// =============================================================================

#[test]
fn init_writes_default_config() {
  let temp = TempDir::new().unwrap();

  xforge_cmd()
    .arg("init")
    .arg(temp.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("Initialized"));

  let content = fs::read_to_string(temp.path().join(".xforge.json")).unwrap();
  assert!(content.contains("\"package-version\": \"unknown\""));
}

#[test]
fn init_refuses_to_overwrite() {
  let temp = TempDir::new().unwrap();
  fs::write(temp.path().join(".xforge.json"), "{}").unwrap();

  xforge_cmd().arg("init").arg(temp.path()).assert().failure();

  assert_eq!(fs::read_to_string(temp.path().join(".xforge.json")).unwrap(), "{}");
}

// =============================================================================
// Build
// =============================================================================

#[test]
fn build_rejects_unknown_task() {
  let temp = TempDir::new().unwrap();

  xforge_cmd()
    .arg("build")
    .arg(temp.path())
    .args(["--tasks", "build,deploy"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown task"));
}

#[test]
fn build_fails_on_malformed_config() {
  let temp = TempDir::new().unwrap();
  fs::write(temp.path().join(".xforge.json"), "not json").unwrap();

  xforge_cmd()
    .arg("build")
    .arg(temp.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to load settings"));
}

#[cfg(unix)]
mod fake_toolchain {
  use super::*;
  use std::os::unix::fs::PermissionsExt;
  use std::path::{Path, PathBuf};

  struct Project {
    temp: TempDir,
    workspace: PathBuf,
    toolchain: PathBuf,
    log: PathBuf,
  }

  /// A workspace plus a `go` stand-in that logs its arguments and writes the `-o` file.
  fn project(fail_verb: Option<&str>) -> Project {
    let temp = TempDir::new().unwrap();
    let workspace = temp.path().join("demo");
    fs::create_dir_all(&workspace).unwrap();
    fs::write(workspace.join("README.md"), "demo readme").unwrap();

    let log = temp.path().join("calls.log");
    let toolchain = temp.path().join("fake-go");
    let fail = fail_verb
      .map(|verb| format!("if [ \"$1\" = \"{}\" ]; then exit 3; fi\n", verb))
      .unwrap_or_default();
    let script = format!(
      "#!/bin/sh\n\
       echo \"$1 GOOS=$GOOS GOARCH=$GOARCH CGO_ENABLED=$CGO_ENABLED\" >> '{log}'\n\
       {fail}\
       if [ \"$1\" = \"build\" ]; then\n\
         while [ $# -gt 0 ]; do\n\
           if [ \"$1\" = \"-o\" ]; then shift; echo binary > \"$1\"; fi\n\
           shift\n\
         done\n\
       fi\n",
      log = log.display(),
      fail = fail,
    );
    fs::write(&toolchain, script).unwrap();
    fs::set_permissions(&toolchain, fs::Permissions::from_mode(0o755)).unwrap();

    Project {
      temp,
      workspace,
      toolchain,
      log,
    }
  }

  fn build(project: &Project, out: &Path) -> Command {
    let mut cmd = xforge_cmd();
    cmd
      .arg("build")
      .arg(&project.workspace)
      .arg("--toolchain")
      .arg(&project.toolchain)
      .arg("-d")
      .arg(out)
      .args(["--os", "linux,darwin", "--arch", "amd64"])
      .args(["--tasks", "clean,build,archive", "--pv", "1.2.0", "--app-name", "demo"]);
    cmd
  }

  #[test]
  fn builds_archives_and_indexes_selected_platforms() {
    let project = project(None);
    let out = project.temp.path().join("out");

    build(&project, &out)
      .assert()
      .success()
      .stdout(predicate::str::contains("demo_darwin_amd64.zip"))
      .stdout(predicate::str::contains("demo_linux_amd64.tar.gz"));

    let calls = fs::read_to_string(&project.log).unwrap();
    let calls: Vec<&str> = calls.lines().collect();
    assert_eq!(calls.len(), 3);
    assert!(calls[0].starts_with("clean "));
    assert!(calls[1].starts_with("build GOOS=darwin GOARCH=amd64 CGO_ENABLED=1"));
    assert!(calls[2].starts_with("build GOOS=linux GOARCH=amd64 CGO_ENABLED=1"));

    let version_dir = out.join("1.2.0");
    assert!(version_dir.join("demo_darwin_amd64.zip").is_file());
    assert!(version_dir.join("demo_linux_amd64.tar.gz").is_file());
    assert_eq!(
      fs::read_to_string(version_dir.join("downloads.md")).unwrap(),
      "demo downloads (1.2.0)\n------------\n\n\
       \x20* [darwin amd64](demo_darwin_amd64.zip)\n\
       \x20* [linux amd64](demo_linux_amd64.tar.gz)\n"
    );
  }

  #[test]
  fn compile_failures_do_not_change_exit_status() {
    let project = project(Some("build"));
    let out = project.temp.path().join("out");

    build(&project, &out).assert().success();

    let index = fs::read_to_string(out.join("1.2.0").join("downloads.md")).unwrap();
    assert!(index.contains("(darwin_amd64/demo)"));
    assert!(index.contains("(linux_amd64/demo)"));
  }

  #[test]
  fn pre_build_failure_exits_non_zero_before_building() {
    let project = project(Some("clean"));
    let out = project.temp.path().join("out");

    build(&project, &out)
      .assert()
      .failure()
      .stderr(predicate::str::contains("pre-build task `clean` failed"));

    let calls = fs::read_to_string(&project.log).unwrap();
    assert_eq!(calls.lines().count(), 1);
    assert!(!out.exists());
  }

  #[test]
  fn local_config_overrides_project_config() {
    let project = project(None);
    let out = project.temp.path().join("out");
    fs::write(
      project.workspace.join(".xforge.json"),
      format!(
        r#"{{"os": "linux", "arch": "arm", "tasks": ["build"], "package-version": "0.1", "artifacts-dest": "{}"}}"#,
        out.display()
      ),
    )
    .unwrap();
    fs::write(project.workspace.join(".xforge.local.json"), r#"{"package-version": "0.2"}"#).unwrap();

    xforge_cmd()
      .arg("build")
      .arg(&project.workspace)
      .arg("--toolchain")
      .arg(&project.toolchain)
      .assert()
      .success();

    assert!(out.join("0.2").join("linux_arm").join("demo").is_file());
    assert_eq!(
      fs::read_to_string(out.join("0.2").join("downloads.md")).unwrap(),
      "demo downloads (0.2)\n------------\n\n * [linux arm](linux_arm/demo)\n"
    );
  }
}

// End-to-end runs against a shell script standing in for a virtualenv python.
#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

const PYTHON: &str = r#"#!/bin/sh
echo "$@" >> "$(dirname "$0")/calls.log"
if [ "$1" = "--version" ]; then echo "Python 3.11.9"; exit 0; fi
if [ "$1" = "-m" ] && [ "$2" = "pip" ]; then
  shift 3
  case "$1" in
    --version) echo "pip 24.0"; exit 0 ;;
    list) echo '[{"name":"requests","version":"2.31.0"},{"name":"urllib3","version":"2.2.1"},{"name":"Flask","version":"3.0.0"}]'; exit 0 ;;
    show)
      if [ "$2" = "urllib3" ]; then
        printf 'Name: urllib3\nVersion: 2.2.1\nRequires:\nRequired-by: requests\n'
        exit 0
      fi
      echo "WARNING: Package(s) not found: $2" >&2
      exit 1 ;;
    install|uninstall) exit 0 ;;
  esac
fi
exit 2
"#;

struct TestEnv {
    tmp: TempDir,
    python: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let tmp = tempfile::tempdir().expect("tempdir");
        let venv = tmp.path().join("venv");
        let bin = venv.join("bin");
        fs::create_dir_all(&bin).expect("mkdir bin");
        fs::write(venv.join("pyvenv.cfg"), "home = /usr/bin\n").expect("write pyvenv.cfg");

        let python = bin.join("python");
        fs::write(&python, PYTHON).expect("write fake python");
        fs::set_permissions(&python, fs::Permissions::from_mode(0o755)).expect("chmod");

        Self { tmp, python }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_pypkgs"));
        cmd.current_dir(self.tmp.path())
            .env("HOME", self.tmp.path())
            .arg("--config")
            .arg(self.tmp.path().join("settings.kdl"))
            .arg("--color")
            .arg("never")
            .arg("--python")
            .arg(&self.python);
        cmd
    }

    fn calls(&self) -> String {
        fs::read_to_string(self.python.with_file_name("calls.log")).unwrap_or_default()
    }
}

#[test]
fn e2e_resolve_virtualenv() {
    let env = TestEnv::new();

    env.command()
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains("Python 3.11 (venv)"))
        .stdout(predicate::str::contains("Manager: pip"))
        .stdout(predicate::str::contains("User site: no"));
}

#[test]
fn e2e_list_json() {
    let env = TestEnv::new();

    env.command()
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"requests\""))
        .stdout(predicate::str::contains("\"version\": \"2.2.1\""));
}

#[test]
fn e2e_list_cached_only_never_runs_pip() {
    let env = TestEnv::new();

    env.command()
        .args(["list", "--cached"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No cached package list"));

    assert!(!env.calls().contains("list"));
}

#[test]
fn e2e_install_passes_options() {
    let env = TestEnv::new();

    env.command()
        .args(["install", "-U", "django>=4.2,<5", "--", "--no-deps"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed django"));

    let calls = env.calls();
    assert!(calls.contains("install"));
    assert!(calls.contains("--upgrade"));
    assert!(calls.contains("--no-deps"));
}

#[test]
fn e2e_uninstall_unknown_package_fails() {
    let env = TestEnv::new();

    env.command()
        .args(["uninstall", "numpy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Package 'numpy' is not installed"));
}

#[test]
fn e2e_dependents() {
    let env = TestEnv::new();

    env.command()
        .args(["dependents", "urllib3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("requests 2.31.0"));
}

#[test]
fn e2e_check_reports_missing_requirements() {
    let env = TestEnv::new();
    let module = env.tmp.path().join("app");
    fs::create_dir_all(&module).unwrap();
    fs::write(
        module.join("requirements.txt"),
        "requests>=2.0\nflask\nnumpy>=1.26\n",
    )
    .unwrap();

    env.command()
        .arg("check")
        .arg(&module)
        .assert()
        .failure()
        .stdout(predicate::str::contains("numpy>=1.26"))
        .stdout(predicate::str::contains("flask").not())
        .stderr(predicate::str::contains("1 of 3 requirements"));
}

#[test]
fn e2e_check_satisfied() {
    let env = TestEnv::new();
    let module = env.tmp.path().join("app");
    fs::create_dir_all(&module).unwrap();
    fs::write(module.join("requirements.txt"), "Requests~=2.31\nurllib3\n").unwrap();

    env.command()
        .arg("check")
        .arg(&module)
        .assert()
        .success()
        .stdout(predicate::str::contains("All 2 requirements of app are satisfied"));
}

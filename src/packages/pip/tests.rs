use super::*;

#[test]
fn parses_pip_list_json() {
    let json = r#"[{"name": "urllib3", "version": "2.2.1"}, {"name": "certifi", "version": "2024.2.2"}]"#;
    let packages = parse_pip_list(json).unwrap();
    assert_eq!(
        packages,
        vec![
            Package::new("certifi", "2024.2.2"),
            Package::new("urllib3", "2.2.1")
        ]
    );
}

#[test]
fn rejects_non_json_pip_list() {
    let err = parse_pip_list("Package Version\n------- -------").unwrap_err();
    assert!(matches!(err, PypkgsError::JsonError(_)));
}

#[test]
fn parses_required_by_line() {
    let show = "Name: urllib3\nVersion: 2.2.1\nRequires: \nRequired-by: requests, botocore\n";
    assert_eq!(parse_required_by(show), vec!["requests", "botocore"]);
    assert!(parse_required_by("Name: x\nRequired-by:\n").is_empty());
    assert!(parse_required_by("").is_empty());
}

#[test]
fn install_args_order() {
    let reqs = vec![
        Requirement::parse("requests>=2").unwrap(),
        Requirement::named("flask"),
    ];
    let args = install_args(&reqs, &["--upgrade".to_string()], Some("https://mirror/simple"));
    assert_eq!(
        args,
        vec![
            "install",
            "--index-url",
            "https://mirror/simple",
            "--upgrade",
            "requests>=2",
            "flask"
        ]
    );
}

#[test]
fn missing_interpreter_fails_to_spawn() {
    let manager = PipManager::new("/nonexistent/pypkgs/bin/python", ManagerOptions::default());
    assert!(matches!(
        manager.packages(false),
        Err(PypkgsError::SystemCommandFailed { .. })
    ));
    assert!(manager.packages(true).unwrap().is_none());
    assert!(!manager.has_management(true).unwrap());
}

#[cfg(unix)]
mod fake_python {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    const SCRIPT: &str = r#"#!/bin/sh
echo "$@" >> "$(dirname "$0")/calls.log"
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
if [ "$1" = "-m" ] && [ "$2" = "venv" ]; then exit 0; fi
exit 2
"#;

    fn fake_env() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        let python = bin.join("python");
        fs::write(&python, SCRIPT).unwrap();
        fs::set_permissions(&python, fs::Permissions::from_mode(0o755)).unwrap();
        (dir, python)
    }

    fn calls(dir: &TempDir) -> Vec<String> {
        fs::read_to_string(dir.path().join("bin/calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn manager(python: &Path) -> PipManager {
        PipManager::new(&python.to_string_lossy(), ManagerOptions::default())
    }

    #[test]
    fn packages_are_cached_until_refresh() {
        let (dir, python) = fake_env();
        let manager = manager(&python);

        let first = manager.packages(false).unwrap().unwrap();
        assert_eq!(first.len(), 3);
        let second = manager.packages(false).unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(calls(&dir).len(), 1);

        manager.refresh();
        assert!(manager.packages(true).unwrap().is_none());
        manager.packages(false).unwrap();
        assert_eq!(calls(&dir).len(), 2);
    }

    #[test]
    fn find_package_uses_normalized_names() {
        let (_dir, python) = fake_env();
        let manager = manager(&python);
        let found = manager.find_package("flask", false).unwrap().unwrap();
        assert_eq!(found, Package::new("Flask", "3.0.0"));
        assert!(manager.find_package("django", false).unwrap().is_none());
    }

    #[test]
    fn has_management_checks_once() {
        let (dir, python) = fake_env();
        let manager = manager(&python);
        assert!(!manager.has_management(true).unwrap());
        assert!(manager.has_management(false).unwrap());
        assert!(manager.has_management(true).unwrap());
        assert_eq!(calls(&dir).len(), 1);
    }

    #[test]
    fn install_passes_requirements_and_clears_cache() {
        let (dir, python) = fake_env();
        let manager = manager(&python);
        manager.packages(false).unwrap();

        manager.install_requirement("requests[socks]>=2.31").unwrap();
        assert!(manager.packages(true).unwrap().is_none());

        let log = calls(&dir);
        assert_eq!(
            log.last().unwrap(),
            "-m pip --disable-pip-version-check install requests[socks]>=2.31"
        );
    }

    #[test]
    fn install_rejects_bad_requirement_string() {
        let (dir, python) = fake_env();
        let manager = manager(&python);
        assert!(manager.install_requirement("$(reboot)").is_err());
        assert!(manager.install_requirement("requests >> 2").is_err());
        assert!(calls(&dir).is_empty());
    }

    #[test]
    fn uninstall_runs_pip_uninstall() {
        let (dir, python) = fake_env();
        let manager = manager(&python);
        manager
            .uninstall(&[Package::new("requests", "2.31.0")])
            .unwrap();
        assert_eq!(
            calls(&dir),
            vec!["-m pip --disable-pip-version-check uninstall -y requests"]
        );
        manager.uninstall(&[]).unwrap();
        assert_eq!(calls(&dir).len(), 1);
    }

    #[test]
    fn dependents_come_from_required_by() {
        let (_dir, python) = fake_env();
        let manager = manager(&python);
        let dependents = manager
            .dependents(&Package::new("urllib3", "2.2.1"))
            .unwrap()
            .unwrap();
        assert_eq!(
            dependents.into_iter().collect::<Vec<_>>(),
            vec![Package::new("requests", "2.31.0")]
        );

        let err = manager
            .dependents(&Package::new("missing", "1.0"))
            .unwrap_err();
        assert!(matches!(err, PypkgsError::PackageManagerError(_)));
    }

    #[test]
    fn create_virtual_env_returns_venv_python() {
        let (dir, python) = fake_env();
        let manager = manager(&python);
        let dest = dir.path().join("new-env");
        let created = manager.create_virtual_env(&dest, true).unwrap();
        assert_eq!(created, dest.join("bin/python").to_string_lossy());
        assert!(
            calls(&dir)
                .last()
                .unwrap()
                .starts_with("-m venv --system-site-packages ")
        );
    }
}

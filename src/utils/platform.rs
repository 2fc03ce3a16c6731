use std::path::{Path, PathBuf};
use std::process::Command;

/// Directory holding executables inside an environment root.
pub fn scripts_dir_name() -> &'static str {
    if cfg!(windows) { "Scripts" } else { "bin" }
}

/// File name of an executable on this platform (`conda` vs `conda.exe`).
pub fn executable_name(stem: &str) -> String {
    if cfg!(windows) {
        format!("{}.exe", stem)
    } else {
        stem.to_string()
    }
}

/// Path of the interpreter executable inside a freshly created environment.
pub fn env_python(env_root: &Path) -> PathBuf {
    if cfg!(windows) {
        env_root.join("python.exe")
    } else {
        env_root.join("bin").join("python")
    }
}

/// Path of the interpreter executable inside a venv (venvs use `Scripts` on Windows).
pub fn venv_python(env_root: &Path) -> PathBuf {
    env_root
        .join(scripts_dir_name())
        .join(executable_name("python"))
}

/// Environment root for an interpreter executable.
///
/// - Unix: `<root>/bin/python` -> `<root>`
/// - Windows: `<root>\python.exe` -> `<root>`
pub fn env_root_for(executable: &Path) -> Option<PathBuf> {
    let dir = executable.parent()?;
    if cfg!(windows) && !dir.ends_with("Scripts") {
        return Some(dir.to_path_buf());
    }
    dir.parent().map(Path::to_path_buf)
}

/// Build a direct program invocation.
pub fn build_program_command<S: AsRef<str>>(program: &Path, args: &[S]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args.iter().map(|a| a.as_ref()));
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_program_command_keeps_args() {
        let cmd = build_program_command(Path::new("python3"), &["-m", "pip"]);
        let debug = format!("{:?}", cmd);
        assert!(debug.contains("python3"));
        assert!(debug.contains("pip"));
    }

    #[cfg(unix)]
    #[test]
    fn env_root_is_parent_of_bin() {
        let root = env_root_for(Path::new("/opt/envs/foo/bin/python")).unwrap();
        assert_eq!(root, PathBuf::from("/opt/envs/foo"));
        assert_eq!(env_python(&root), PathBuf::from("/opt/envs/foo/bin/python"));
    }

    #[cfg(unix)]
    #[test]
    fn env_root_of_bare_name_is_none() {
        assert!(env_root_for(Path::new("python")).is_none());
    }
}

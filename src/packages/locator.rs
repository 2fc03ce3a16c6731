//! Conda executable discovery
//!
//! Lookup order for an interpreter home directory:
//! 1. the directory itself and up to three ancestors, checking the
//!    `bin`/`Scripts` and `condabin` directories of each
//!    (`envs/<name>/bin` -> `envs/<name>` -> `envs` -> conda root)
//! 2. `anaconda3`, `miniconda3`, `miniforge3` in the user's home
//! 3. `conda` on `PATH`
//!
//! Filesystem errors count as "not found".

use crate::ui;
use crate::utils::{paths, platform};
use std::path::{Path, PathBuf};

/// Ancestors of the home directory searched for a conda installation
const ANCESTOR_DEPTH: usize = 3;

const USER_INSTALLS: [&str; 3] = ["anaconda3", "miniconda3", "miniforge3"];

pub trait CondaLocator: Send + Sync {
    fn locate(&self, home_directory: &Path) -> Option<PathBuf>;
}

impl<F> CondaLocator for F
where
    F: Fn(&Path) -> Option<PathBuf> + Send + Sync,
{
    fn locate(&self, home_directory: &Path) -> Option<PathBuf> {
        self(home_directory)
    }
}

/// Searches the filesystem and `PATH`
#[derive(Debug, Default, Clone, Copy)]
pub struct FilesystemCondaLocator;

impl CondaLocator for FilesystemCondaLocator {
    fn locate(&self, home_directory: &Path) -> Option<PathBuf> {
        let found = find_near(home_directory)
            .or_else(find_in_user_installs)
            .or_else(|| which::which("conda").ok());

        match &found {
            Some(conda) => ui::debug(&format!(
                "conda for {}: {}",
                home_directory.display(),
                conda.display()
            )),
            None => ui::debug(&format!("no conda found for {}", home_directory.display())),
        }
        found
    }
}

fn candidates_in(root: &Path) -> Vec<PathBuf> {
    if cfg!(windows) {
        vec![
            root.join("Scripts").join("conda.exe"),
            root.join("condabin").join("conda.bat"),
            root.join("conda.exe"),
        ]
    } else {
        vec![
            root.join(platform::scripts_dir_name()).join("conda"),
            root.join("condabin").join("conda"),
            root.join("conda"),
        ]
    }
}

/// Search `home_directory` and its ancestors
pub fn find_near(home_directory: &Path) -> Option<PathBuf> {
    home_directory
        .ancestors()
        .take(ANCESTOR_DEPTH + 1)
        .flat_map(candidates_in)
        .find(|candidate| candidate.is_file())
}

fn find_in_user_installs() -> Option<PathBuf> {
    let home = paths::home_dir()?;
    USER_INSTALLS
        .iter()
        .flat_map(|dir| candidates_in(&home.join(dir)))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[cfg(unix)]
    #[test]
    fn finds_conda_of_named_environment() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("miniconda");
        let env_bin = root.join("envs/ml/bin");
        fs::create_dir_all(&env_bin).unwrap();
        fs::create_dir_all(root.join("bin")).unwrap();
        fs::write(root.join("bin/conda"), "").unwrap();

        assert_eq!(find_near(&env_bin), Some(root.join("bin/conda")));
    }

    #[cfg(unix)]
    #[test]
    fn prefers_closest_conda() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("conda");
        fs::create_dir_all(root.join("condabin")).unwrap();
        fs::write(root.join("condabin/conda"), "").unwrap();
        fs::create_dir_all(root.join("bin")).unwrap();

        assert_eq!(find_near(&root.join("bin")), Some(root.join("condabin/conda")));
    }

    #[test]
    fn search_depth_is_bounded() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("bin")).unwrap();
        fs::write(dir.path().join("bin").join(platform::executable_name("conda")), "").unwrap();

        let deep = dir.path().join("a/b/c/d/e");
        fs::create_dir_all(&deep).unwrap();
        assert!(find_near(&deep).is_none());
    }

    #[test]
    fn closures_are_locators() {
        let locator = |dir: &Path| Some(dir.join("conda"));
        assert_eq!(
            locator.locate(Path::new("/x")),
            Some(PathBuf::from("/x/conda"))
        );
    }
}

use crate::utils::sanitize::normalize_name;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// An installed distribution as reported by pip or conda.
// Ordering is by name then version so dependent sets print stably.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub version: String,
}

impl Package {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Name comparison after PEP 503 normalization (`Typing_Extensions` == `typing-extensions`)
    pub fn matches_name(&self, name: &str) -> bool {
        normalize_name(&self.name) == normalize_name(name)
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

// A source root inside a project. Requirements are declared per module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub root: PathBuf,
}

impl Module {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }

    /// Module named after its directory
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.to_string_lossy().into_owned());
        Self { name, root }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub root: PathBuf,
}

impl Project {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_matches_normalized_names() {
        let pkg = Package::new("typing_extensions", "4.12.2");
        assert!(pkg.matches_name("Typing-Extensions"));
        assert!(!pkg.matches_name("typing"));
    }

    #[test]
    fn packages_order_by_name_then_version() {
        let mut pkgs = vec![
            Package::new("urllib3", "2.0"),
            Package::new("certifi", "2024.2"),
            Package::new("urllib3", "1.26"),
        ];
        pkgs.sort();
        assert_eq!(pkgs[0].name, "certifi");
        assert_eq!(pkgs[1].version, "1.26");
    }

    #[test]
    fn module_from_root_uses_directory_name() {
        let module = Module::from_root("/work/app");
        assert_eq!(module.name, "app");
    }
}

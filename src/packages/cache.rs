//! Per-manager cached state

use crate::core::{Module, Package, Requirement, parse_requirements_file};
use crate::ui;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Installed packages and the management check result, as last seen.
///
/// Locks are only held while copying values in or out, never while a
/// package manager process runs.
#[derive(Debug, Default)]
pub struct PackageCache {
    packages: Mutex<Option<Vec<Package>>>,
    has_management: Mutex<Option<bool>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PackageCache {
    pub fn packages(&self) -> Option<Vec<Package>> {
        lock(&self.packages).clone()
    }

    pub fn store_packages(&self, packages: Vec<Package>) {
        *lock(&self.packages) = Some(packages);
    }

    pub fn has_management(&self) -> Option<bool> {
        *lock(&self.has_management)
    }

    pub fn store_has_management(&self, value: bool) {
        *lock(&self.has_management) = Some(value);
    }

    pub fn clear(&self) {
        *lock(&self.packages) = None;
        *lock(&self.has_management) = None;
    }
}

/// Requirements declared by `module` in its requirements file.
///
/// A missing file yields `None`; an unreadable one is reported and also
/// yields `None`.
pub fn module_requirements(module: &Module, file_name: &str) -> Option<Vec<Requirement>> {
    let path = module.root.join(file_name);
    if !path.is_file() {
        return None;
    }

    match parse_requirements_file(&path) {
        Ok(reqs) => Some(reqs),
        Err(e) => {
            ui::warning(&format!(
                "Could not read requirements of module '{}': {}",
                module.name, e
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn cache_starts_empty_and_clears() {
        let cache = PackageCache::default();
        assert!(cache.packages().is_none());
        assert!(cache.has_management().is_none());

        cache.store_packages(vec![Package::new("pip", "24.0")]);
        cache.store_has_management(true);
        assert_eq!(cache.packages().unwrap().len(), 1);
        assert_eq!(cache.has_management(), Some(true));

        cache.clear();
        assert!(cache.packages().is_none());
        assert!(cache.has_management().is_none());
    }

    #[test]
    fn module_without_requirements_file() {
        let dir = tempdir().unwrap();
        let module = Module::from_root(dir.path());
        assert!(module_requirements(&module, "requirements.txt").is_none());
    }

    #[test]
    fn module_with_requirements_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("reqs.txt"), "numpy>=1.26\n").unwrap();
        let module = Module::from_root(dir.path());
        let reqs = module_requirements(&module, "reqs.txt").unwrap();
        assert_eq!(reqs[0].name, "numpy");
    }
}

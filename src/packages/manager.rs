use crate::core::{Module, Package, Requirement};
use crate::error::Result;
use crate::packages::conda::CondaManager;
use crate::packages::invalid::InvalidManager;
use crate::packages::pip::PipManager;
use crate::packages::remote::RemoteManager;
use crate::packages::traits::{ManagerKind, PackageManager};
use std::collections::BTreeSet;
use std::path::Path;

/// The closed set of manager implementations handed out by the registry
pub enum Manager {
    Pip(PipManager),
    Conda(CondaManager),
    Remote(RemoteManager),
    Invalid(InvalidManager),
}

impl Manager {
    fn inner(&self) -> &dyn PackageManager {
        match self {
            Self::Pip(m) => m,
            Self::Conda(m) => m,
            Self::Remote(m) => m,
            Self::Invalid(m) => m,
        }
    }

    /// Home path the manager is bound to; `None` for invalid interpreters
    pub fn home_path(&self) -> Option<&str> {
        match self {
            Self::Pip(m) => Some(m.home_path()),
            Self::Conda(m) => Some(m.home_path()),
            Self::Remote(m) => Some(m.home_path()),
            Self::Invalid(_) => None,
        }
    }
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("kind", &self.kind())
            .field("home_path", &self.home_path())
            .finish()
    }
}

impl PackageManager for Manager {
    fn kind(&self) -> ManagerKind {
        self.inner().kind()
    }

    fn install_management(&self) -> Result<()> {
        self.inner().install_management()
    }

    fn has_management(&self, cached_only: bool) -> Result<bool> {
        self.inner().has_management(cached_only)
    }

    fn install_requirement(&self, requirement: &str) -> Result<()> {
        self.inner().install_requirement(requirement)
    }

    fn install(&self, requirements: &[Requirement], extra_args: &[String]) -> Result<()> {
        self.inner().install(requirements, extra_args)
    }

    fn uninstall(&self, packages: &[Package]) -> Result<()> {
        self.inner().uninstall(packages)
    }

    fn refresh(&self) {
        self.inner().refresh()
    }

    fn create_virtual_env(&self, destination: &Path, use_global_site: bool) -> Result<String> {
        self.inner().create_virtual_env(destination, use_global_site)
    }

    fn packages(&self, cached_only: bool) -> Result<Option<Vec<Package>>> {
        self.inner().packages(cached_only)
    }

    fn find_package(&self, name: &str, cached_only: bool) -> Result<Option<Package>> {
        self.inner().find_package(name, cached_only)
    }

    fn requirements(&self, module: &Module) -> Option<Vec<Requirement>> {
        self.inner().requirements(module)
    }

    fn dependents(&self, package: &Package) -> Result<Option<BTreeSet<Package>>> {
        self.inner().dependents(package)
    }
}

use crate::core::{Module, Package, Requirement};
use crate::error::Result;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// Which implementation backs a manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagerKind {
    Pip,
    Conda,
    Remote,
    Invalid,
}

impl fmt::Display for ManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pip => write!(f, "pip"),
            Self::Conda => write!(f, "conda"),
            Self::Remote => write!(f, "remote"),
            Self::Invalid => write!(f, "invalid"),
        }
    }
}

/// Package operations against one interpreter.
///
/// Implementations keep the installed package list cached between calls;
/// `cached_only` queries never start a process.
pub trait PackageManager: Send + Sync {
    fn kind(&self) -> ManagerKind;

    /// Install the packaging tool itself (pip) into the interpreter
    fn install_management(&self) -> Result<()>;

    /// Whether the packaging tool is usable
    fn has_management(&self, cached_only: bool) -> Result<bool>;

    /// Install from a single requirement string such as `requests>=2`
    fn install_requirement(&self, requirement: &str) -> Result<()>;

    fn install(&self, requirements: &[Requirement], extra_args: &[String]) -> Result<()>;

    fn uninstall(&self, packages: &[Package]) -> Result<()>;

    /// Drop cached state so the next query hits the interpreter again
    fn refresh(&self);

    /// Create a virtual environment at `destination`, returning the path of
    /// its interpreter executable
    fn create_virtual_env(&self, destination: &Path, use_global_site: bool) -> Result<String>;

    /// Installed packages. `None` when `cached_only` and nothing is cached yet.
    fn packages(&self, cached_only: bool) -> Result<Option<Vec<Package>>>;

    fn find_package(&self, name: &str, cached_only: bool) -> Result<Option<Package>> {
        Ok(self
            .packages(cached_only)?
            .and_then(|pkgs| pkgs.into_iter().find(|p| p.matches_name(name))))
    }

    /// Requirements declared by a module. `None` when it declares nothing.
    fn requirements(&self, module: &Module) -> Option<Vec<Requirement>>;

    /// Installed packages that depend on `package`
    fn dependents(&self, package: &Package) -> Result<Option<BTreeSet<Package>>>;
}

//! Management services
//!
//! A management service is the project-facing side of a manager: it takes
//! user level choices (version, upgrade, install for the user only) and
//! turns them into manager calls with the right tool options.

use crate::core::{Module, Package, Project, Requirement};
use crate::error::{PypkgsError, Result};
use crate::interpreter::Interpreter;
use crate::packages::manager::Manager;
use crate::packages::options::ManagerOptions;
use crate::packages::traits::{ManagerKind, PackageManager};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceFlavor {
    Standard,
    Conda,
}

pub struct ManagementService {
    flavor: ServiceFlavor,
    project: Project,
    interpreter: Interpreter,
    manager: Arc<Manager>,
    conda_channels: Vec<String>,
}

impl ManagementService {
    pub(crate) fn new(
        flavor: ServiceFlavor,
        project: Project,
        interpreter: Interpreter,
        manager: Arc<Manager>,
        options: &ManagerOptions,
    ) -> Self {
        Self {
            flavor,
            project,
            interpreter,
            manager,
            conda_channels: options.conda_channels.clone(),
        }
    }

    pub fn flavor(&self) -> ServiceFlavor {
        self.flavor
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn manager(&self) -> &Arc<Manager> {
        &self.manager
    }

    /// Freshly listed installed packages
    pub fn installed_packages(&self) -> Result<Vec<Package>> {
        self.manager.refresh();
        Ok(self.manager.packages(false)?.unwrap_or_default())
    }

    pub fn can_install_to_user(&self) -> bool {
        match self.flavor {
            ServiceFlavor::Standard => !self.interpreter.is_virtual_env(),
            ServiceFlavor::Conda => false,
        }
    }

    pub fn install_options_hint(&self) -> &'static str {
        match self.flavor {
            ServiceFlavor::Standard => "pip install options",
            ServiceFlavor::Conda => "conda install options",
        }
    }

    /// Tool options for an install request.
    ///
    /// Chosen by the manager actually bound, not the flavor: a conda
    /// environment without a located conda executable is driven by pip.
    pub fn install_options(
        &self,
        upgrade: bool,
        install_to_user: bool,
        extra_options: &[String],
    ) -> Vec<String> {
        let mut args = Vec::new();
        if self.manager.kind() == ManagerKind::Conda {
            for channel in &self.conda_channels {
                args.push("-c".to_string());
                args.push(channel.clone());
            }
        } else {
            if upgrade {
                args.push("--upgrade".to_string());
            }
            if install_to_user && self.can_install_to_user() {
                args.push("--user".to_string());
            }
        }
        args.extend(extra_options.iter().cloned());
        args
    }

    pub fn install_package(
        &self,
        name: &str,
        version: Option<&str>,
        upgrade: bool,
        install_to_user: bool,
        extra_options: &[String],
    ) -> Result<()> {
        let requirement = match version {
            Some(version) => Requirement::parse(&format!("{}=={}", name, version))?,
            None => Requirement::parse(name)?,
        };
        let options = self.install_options(upgrade, install_to_user, extra_options);
        self.manager.install(&[requirement], &options)
    }

    /// Uninstall by name. Every name must be installed.
    pub fn uninstall_packages(&self, names: &[String]) -> Result<()> {
        let installed = self.manager.packages(false)?.unwrap_or_default();
        let mut packages = Vec::with_capacity(names.len());
        for name in names {
            let package = installed
                .iter()
                .find(|p| p.matches_name(name))
                .ok_or_else(|| {
                    PypkgsError::PackageManagerError(format!(
                        "Package '{}' is not installed in {}",
                        name,
                        self.interpreter.name()
                    ))
                })?;
            packages.push(package.clone());
        }
        self.manager.uninstall(&packages)
    }

    /// Requirements of `module` that no installed package satisfies
    pub fn missing_requirements(&self, module: &Module) -> Result<Vec<Requirement>> {
        let Some(requirements) = self.manager.requirements(module) else {
            return Ok(Vec::new());
        };
        let installed = self.manager.packages(false)?.unwrap_or_default();
        Ok(requirements
            .into_iter()
            .filter(|req| req.match_installed(&installed).is_none())
            .collect())
    }
}

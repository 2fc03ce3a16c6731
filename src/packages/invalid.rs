//! Manager for interpreters without a home path
//!
//! Nothing can be run against such an interpreter. Every operation that
//! would start a process fails with an execution error naming the
//! interpreter; `refresh` and `requirements` quietly do nothing.

use crate::core::{Module, Package, Requirement};
use crate::error::{PypkgsError, Result};
use crate::interpreter::{Flavor, Interpreter, LanguageLevel};
use crate::packages::traits::{ManagerKind, PackageManager};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct InvalidManager {
    name: String,
    language_level: LanguageLevel,
    flavor: Flavor,
}

impl InvalidManager {
    pub fn new(interpreter: &Interpreter) -> Self {
        Self {
            name: interpreter.name().to_string(),
            language_level: interpreter.language_level(),
            flavor: interpreter.flavor(),
        }
    }

    pub fn error_message(&self) -> String {
        format!(
            "Invalid interpreter \"{}\" version: {} type: {}",
            self.name,
            self.language_level,
            self.flavor.name()
        )
    }

    fn fail<T>(&self) -> Result<T> {
        Err(PypkgsError::Execution(self.error_message()))
    }
}

impl PackageManager for InvalidManager {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Invalid
    }

    fn install_management(&self) -> Result<()> {
        self.fail()
    }

    fn has_management(&self, _cached_only: bool) -> Result<bool> {
        self.fail()
    }

    fn install_requirement(&self, _requirement: &str) -> Result<()> {
        self.fail()
    }

    fn install(&self, _requirements: &[Requirement], _extra_args: &[String]) -> Result<()> {
        self.fail()
    }

    fn uninstall(&self, _packages: &[Package]) -> Result<()> {
        self.fail()
    }

    fn refresh(&self) {}

    fn create_virtual_env(&self, _destination: &Path, _use_global_site: bool) -> Result<String> {
        self.fail()
    }

    fn packages(&self, _cached_only: bool) -> Result<Option<Vec<Package>>> {
        self.fail()
    }

    fn find_package(&self, _name: &str, _cached_only: bool) -> Result<Option<Package>> {
        self.fail()
    }

    fn requirements(&self, _module: &Module) -> Option<Vec<Requirement>> {
        None
    }

    fn dependents(&self, _package: &Package) -> Result<Option<BTreeSet<Package>>> {
        self.fail()
    }
}

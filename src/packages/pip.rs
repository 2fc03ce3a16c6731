//! Standard pip manager
//!
//! Drives `python -m pip` for a local interpreter. Remote managers reuse it
//! with a [`PythonRunner::Remote`] runner, which only changes how the
//! interpreter process is started.

use crate::core::{Module, Package, Requirement};
use crate::error::{PypkgsError, Result};
use crate::packages::cache::{PackageCache, module_requirements};
use crate::packages::options::ManagerOptions;
use crate::packages::remote::RemoteTarget;
use crate::packages::traits::{ManagerKind, PackageManager};
use crate::ui;
use crate::utils::{platform, process, sanitize};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;

/// How the interpreter process is started
#[derive(Debug, Clone)]
pub enum PythonRunner {
    Local(PathBuf),
    Remote(RemoteTarget),
}

impl PythonRunner {
    fn command(&self, args: &[String], options: &ManagerOptions) -> Result<Command> {
        match self {
            Self::Local(python) => Ok(platform::build_program_command(python, args)),
            Self::Remote(target) => target.command(args, options),
        }
    }

    /// Interpreter executable of a venv created at `destination`
    fn venv_python(&self, destination: &Path) -> String {
        match self {
            Self::Local(_) => platform::venv_python(destination)
                .to_string_lossy()
                .into_owned(),
            // Remote hosts are assumed to be POSIX
            Self::Remote(_) => format!(
                "{}/bin/python",
                destination.to_string_lossy().trim_end_matches('/')
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PipListEntry {
    name: String,
    version: String,
}

/// Parse `pip list --format=json`
pub fn parse_pip_list(json: &str) -> Result<Vec<Package>> {
    let entries: Vec<PipListEntry> = serde_json::from_str(json.trim())?;
    let mut packages: Vec<Package> = entries
        .into_iter()
        .map(|e| Package::new(e.name, e.version))
        .collect();
    packages.sort();
    Ok(packages)
}

/// Names from the `Required-by:` line of `pip show`
pub fn parse_required_by(show_output: &str) -> Vec<String> {
    show_output
        .lines()
        .find_map(|line| line.strip_prefix("Required-by:"))
        .map(|rest| {
            rest.split(',')
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Arguments for `pip install`
pub fn install_args(
    requirements: &[Requirement],
    extra_args: &[String],
    index_url: Option<&str>,
) -> Vec<String> {
    let mut args = vec!["install".to_string()];
    if let Some(url) = index_url {
        args.push("--index-url".to_string());
        args.push(url.to_string());
    }
    args.extend(extra_args.iter().cloned());
    args.extend(requirements.iter().map(ToString::to_string));
    args
}

pub struct PipManager {
    home_path: String,
    runner: PythonRunner,
    cache: PackageCache,
    options: ManagerOptions,
}

impl PipManager {
    pub fn new(home_path: &str, options: ManagerOptions) -> Self {
        Self::with_runner(home_path, PythonRunner::Local(PathBuf::from(home_path)), options)
    }

    pub fn with_runner(home_path: &str, runner: PythonRunner, options: ManagerOptions) -> Self {
        Self {
            home_path: home_path.to_string(),
            runner,
            cache: PackageCache::default(),
            options,
        }
    }

    pub fn home_path(&self) -> &str {
        &self.home_path
    }

    pub fn remote_target(&self) -> Option<&RemoteTarget> {
        match &self.runner {
            PythonRunner::Remote(target) => Some(target),
            PythonRunner::Local(_) => None,
        }
    }

    fn run_python(&self, args: Vec<String>) -> Result<String> {
        let mut cmd = self.runner.command(&args, &self.options)?;
        process::run_checked(&mut cmd, self.options.timeout)
    }

    fn run_pip<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut full = vec![
            "-m".to_string(),
            "pip".to_string(),
            "--disable-pip-version-check".to_string(),
        ];
        full.extend(args.into_iter().map(Into::into));
        self.run_python(full)
    }
}

impl PackageManager for PipManager {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Pip
    }

    fn install_management(&self) -> Result<()> {
        ui::debug(&format!("bootstrapping pip for {}", self.home_path));
        let result = self.run_python(vec![
            "-m".to_string(),
            "ensurepip".to_string(),
            "--upgrade".to_string(),
        ]);
        self.cache.clear();
        result.map(|_| ())
    }

    fn has_management(&self, cached_only: bool) -> Result<bool> {
        if let Some(known) = self.cache.has_management() {
            return Ok(known);
        }
        if cached_only {
            return Ok(false);
        }

        let available = match self.run_pip(["--version"]) {
            Ok(_) => true,
            Err(PypkgsError::PackageManagerError(_)) => false,
            Err(e) => return Err(e),
        };
        self.cache.store_has_management(available);
        Ok(available)
    }

    fn install_requirement(&self, requirement: &str) -> Result<()> {
        let requirement = Requirement::parse(requirement)?;
        self.install(&[requirement], &[])
    }

    fn install(&self, requirements: &[Requirement], extra_args: &[String]) -> Result<()> {
        if requirements.is_empty() && extra_args.is_empty() {
            return Ok(());
        }

        let names: Vec<&str> = requirements.iter().map(|r| r.name.as_str()).collect();
        sanitize::validate_package_names(&names)?;

        let args = install_args(
            requirements,
            extra_args,
            self.options.pip_index_url.as_deref(),
        );
        let result = self.run_pip(args);
        self.cache.clear();
        result.map(|_| ())
    }

    fn uninstall(&self, packages: &[Package]) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }

        let names: Vec<String> = packages.iter().map(|p| p.name.clone()).collect();
        sanitize::validate_package_names(&names)?;

        let mut args = vec!["uninstall".to_string(), "-y".to_string()];
        args.extend(names);
        let result = self.run_pip(args);
        self.cache.clear();
        result.map(|_| ())
    }

    fn refresh(&self) {
        self.cache.clear();
    }

    fn create_virtual_env(&self, destination: &Path, use_global_site: bool) -> Result<String> {
        let mut args = vec!["-m".to_string(), "venv".to_string()];
        if use_global_site {
            args.push("--system-site-packages".to_string());
        }
        args.push(destination.to_string_lossy().into_owned());

        self.run_python(args)?;
        Ok(self.runner.venv_python(destination))
    }

    fn packages(&self, cached_only: bool) -> Result<Option<Vec<Package>>> {
        if let Some(cached) = self.cache.packages() {
            return Ok(Some(cached));
        }
        if cached_only {
            return Ok(None);
        }

        let output = self.run_pip(["list", "--format=json"])?;
        let packages = parse_pip_list(&output)?;
        ui::debug(&format!(
            "{} packages installed in {}",
            packages.len(),
            self.home_path
        ));
        self.cache.store_packages(packages.clone());
        Ok(Some(packages))
    }

    fn requirements(&self, module: &Module) -> Option<Vec<Requirement>> {
        module_requirements(module, &self.options.requirements_file)
    }

    fn dependents(&self, package: &Package) -> Result<Option<BTreeSet<Package>>> {
        sanitize::validate_package_name(&package.name)?;

        let output = self.run_pip(["show", package.name.as_str()])?;
        let required_by = parse_required_by(&output);
        if required_by.is_empty() {
            return Ok(Some(BTreeSet::new()));
        }

        let installed = self.packages(false)?.unwrap_or_default();
        let dependents = installed
            .into_iter()
            .filter(|p| required_by.iter().any(|name| p.matches_name(name)))
            .collect();
        Ok(Some(dependents))
    }
}

#[cfg(test)]
mod tests;

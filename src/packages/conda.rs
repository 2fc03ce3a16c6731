//! Conda environment manager
//!
//! Works on the environment root with `conda ... -p ROOT`. Reverse
//! dependency queries go through pip inside the environment, since conda
//! has no equivalent of `pip show`.

use crate::core::{Module, Package, Requirement};
use crate::error::Result;
use crate::interpreter::LanguageLevel;
use crate::packages::cache::{PackageCache, module_requirements};
use crate::packages::options::ManagerOptions;
use crate::packages::pip::PipManager;
use crate::packages::traits::{ManagerKind, PackageManager};
use crate::ui;
use crate::utils::{platform, process, sanitize};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CondaListEntry {
    name: String,
    version: String,
}

/// Parse `conda list --json`
pub fn parse_conda_list(json: &str) -> Result<Vec<Package>> {
    let entries: Vec<CondaListEntry> = serde_json::from_str(json.trim())?;
    let mut packages: Vec<Package> = entries
        .into_iter()
        .map(|e| Package::new(e.name, e.version))
        .collect();
    packages.sort();
    Ok(packages)
}

/// Conda match spec for a requirement. Extras and markers have no conda
/// equivalent and are dropped.
pub fn conda_spec(requirement: &Requirement) -> String {
    let specs: Vec<String> = requirement.specs.iter().map(ToString::to_string).collect();
    format!("{}{}", requirement.name, specs.join(","))
}

pub struct CondaManager {
    home_path: String,
    env_root: PathBuf,
    conda: PathBuf,
    language_level: LanguageLevel,
    cache: PackageCache,
    options: ManagerOptions,
    pip: PipManager,
}

impl CondaManager {
    pub fn new(
        home_path: &str,
        conda: PathBuf,
        language_level: LanguageLevel,
        options: ManagerOptions,
    ) -> Self {
        let home = Path::new(home_path);
        let env_root = platform::env_root_for(home).unwrap_or_else(|| home.to_path_buf());

        Self {
            home_path: home_path.to_string(),
            env_root,
            conda,
            language_level,
            cache: PackageCache::default(),
            pip: PipManager::new(home_path, options.clone()),
            options,
        }
    }

    pub fn home_path(&self) -> &str {
        &self.home_path
    }

    pub fn env_root(&self) -> &Path {
        &self.env_root
    }

    pub fn conda_executable(&self) -> &Path {
        &self.conda
    }

    fn env_args(&self, command: &str) -> Vec<String> {
        vec![
            command.to_string(),
            "-p".to_string(),
            self.env_root.to_string_lossy().into_owned(),
        ]
    }

    fn run_conda(&self, args: &[String]) -> Result<String> {
        let mut cmd = platform::build_program_command(&self.conda, args);
        process::run_checked(&mut cmd, self.options.timeout)
    }
}

impl PackageManager for CondaManager {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Conda
    }

    fn install_management(&self) -> Result<()> {
        let mut args = self.env_args("install");
        args.extend(["-y".to_string(), "pip".to_string()]);
        let result = self.run_conda(&args);
        self.refresh();
        result.map(|_| ())
    }

    fn has_management(&self, cached_only: bool) -> Result<bool> {
        if let Some(known) = self.cache.has_management() {
            return Ok(known);
        }
        if cached_only {
            return Ok(false);
        }
        let available = self.conda.is_file();
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

        let mut args = self.env_args("install");
        args.push("-y".to_string());
        args.extend(extra_args.iter().cloned());
        args.extend(requirements.iter().map(conda_spec));

        let result = self.run_conda(&args);
        self.refresh();
        result.map(|_| ())
    }

    fn uninstall(&self, packages: &[Package]) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }

        let names: Vec<String> = packages.iter().map(|p| p.name.clone()).collect();
        sanitize::validate_package_names(&names)?;

        let mut args = self.env_args("remove");
        args.push("-y".to_string());
        args.extend(names);

        let result = self.run_conda(&args);
        self.refresh();
        result.map(|_| ())
    }

    fn refresh(&self) {
        self.cache.clear();
        self.pip.refresh();
    }

    fn create_virtual_env(&self, destination: &Path, _use_global_site: bool) -> Result<String> {
        let args = vec![
            "create".to_string(),
            "-p".to_string(),
            destination.to_string_lossy().into_owned(),
            "-y".to_string(),
            format!("python={}", self.language_level),
        ];
        self.run_conda(&args)?;
        Ok(platform::env_python(destination)
            .to_string_lossy()
            .into_owned())
    }

    fn packages(&self, cached_only: bool) -> Result<Option<Vec<Package>>> {
        if let Some(cached) = self.cache.packages() {
            return Ok(Some(cached));
        }
        if cached_only {
            return Ok(None);
        }

        let mut args = self.env_args("list");
        args.push("--json".to_string());
        let packages = parse_conda_list(&self.run_conda(&args)?)?;
        ui::debug(&format!(
            "{} packages installed in conda env {}",
            packages.len(),
            self.env_root.display()
        ));
        self.cache.store_packages(packages.clone());
        Ok(Some(packages))
    }

    fn requirements(&self, module: &Module) -> Option<Vec<Requirement>> {
        module_requirements(module, &self.options.requirements_file)
    }

    fn dependents(&self, package: &Package) -> Result<Option<BTreeSet<Package>>> {
        self.pip.dependents(package)
    }
}

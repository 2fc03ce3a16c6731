//! # Package Manager Registry
//!
//! Hands out one long-lived [`Manager`] per interpreter home path.
//!
//! ## Selection
//!
//! The first lookup of a home path creates the manager, checking in order:
//!
//! 1. **Remote** interpreters (`ssh://`, `docker://`) get a [`RemoteManager`]
//! 2. **Conda** environments get a [`CondaManager`] when a conda executable
//!    can be located for the interpreter's home directory
//! 3. everything else gets a [`PipManager`]
//!
//! Interpreters without a home path cannot be cached; they get a fresh
//! [`InvalidManager`] on every lookup.
//!
//! ## Lifecycle
//!
//! A registry is created once at startup (see [`crate::context::AppContext`])
//! and passed by reference to whoever needs a manager. Entries are never
//! evicted or replaced; they are dropped with the registry.

use crate::core::Project;
use crate::interpreter::Interpreter;
use crate::packages::conda::CondaManager;
use crate::packages::invalid::InvalidManager;
use crate::packages::locator::{CondaLocator, FilesystemCondaLocator};
use crate::packages::manager::Manager;
use crate::packages::options::ManagerOptions;
use crate::packages::pip::PipManager;
use crate::packages::remote::RemoteManager;
use crate::packages::service::{ManagementService, ServiceFlavor};
use crate::packages::traits::PackageManager;
use crate::ui;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub struct ManagerRegistry {
    instances: Mutex<HashMap<String, Arc<Manager>>>,
    locator: Box<dyn CondaLocator>,
    options: ManagerOptions,
}

impl ManagerRegistry {
    /// Registry that locates conda on the filesystem
    pub fn new(options: ManagerOptions) -> Self {
        Self::with_locator(Box::new(FilesystemCondaLocator), options)
    }

    pub fn with_locator(locator: Box<dyn CondaLocator>, options: ManagerOptions) -> Self {
        Self {
            instances: Mutex::new(HashMap::new()),
            locator,
            options,
        }
    }

    pub fn options(&self) -> &ManagerOptions {
        &self.options
    }

    // A panic while the lock was held cannot leave the map half-updated:
    // the only mutation is a single insert.
    fn instances(&self) -> MutexGuard<'_, HashMap<String, Arc<Manager>>> {
        self.instances.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Manager for `interpreter`.
    ///
    /// Lookup and creation happen under one lock, so concurrent first
    /// lookups of a home path all receive the same instance.
    pub fn resolve(&self, interpreter: &Interpreter) -> Arc<Manager> {
        let Some(home_path) = interpreter.home_path() else {
            ui::debug(&format!(
                "interpreter '{}' has no home path, using invalid manager",
                interpreter.name()
            ));
            return Arc::new(Manager::Invalid(InvalidManager::new(interpreter)));
        };

        let mut instances = self.instances();
        if let Some(manager) = instances.get(home_path) {
            return Arc::clone(manager);
        }

        let manager = Arc::new(self.create(interpreter, home_path));
        ui::debug(&format!(
            "created {} manager for {}",
            manager.kind(),
            home_path
        ));
        instances.insert(home_path.to_string(), Arc::clone(&manager));
        manager
    }

    fn create(&self, interpreter: &Interpreter, home_path: &str) -> Manager {
        if interpreter.is_remote() {
            return Manager::Remote(RemoteManager::new(home_path, self.options.clone()));
        }

        if interpreter.is_conda_venv()
            && let Some(conda) = interpreter
                .home_directory()
                .and_then(|dir| self.locator.locate(&dir))
        {
            return Manager::Conda(CondaManager::new(
                home_path,
                conda,
                interpreter.language_level(),
                self.options.clone(),
            ));
        }

        Manager::Pip(PipManager::new(home_path, self.options.clone()))
    }

    /// Management service for `interpreter` within `project`. Not cached.
    pub fn management_service(
        &self,
        project: &Project,
        interpreter: &Interpreter,
    ) -> ManagementService {
        let flavor = if interpreter.is_conda_venv() {
            ServiceFlavor::Conda
        } else {
            ServiceFlavor::Standard
        };

        ManagementService::new(
            flavor,
            project.clone(),
            interpreter.clone(),
            self.resolve(interpreter),
            &self.options,
        )
    }

    /// Number of cached managers
    pub fn len(&self) -> usize {
        self.instances().len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances().is_empty()
    }

    /// Cached home paths, sorted
    pub fn home_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.instances().keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Tear the registry down, dropping every cached manager.
    ///
    /// Managers still held elsewhere stay alive until their last `Arc` goes.
    pub fn shutdown(self) -> usize {
        let instances = self
            .instances
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        ui::debug(&format!("registry shut down with {} managers", instances.len()));
        instances.len()
    }
}

impl Default for ManagerRegistry {
    fn default() -> Self {
        Self::new(ManagerOptions::default())
    }
}

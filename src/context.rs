//! Application context
//!
//! Built once at startup and passed to every command. It owns the manager
//! registry, so the registry lives exactly as long as the command run and
//! is torn down explicitly by [`AppContext::shutdown`].

use crate::config::Settings;
use crate::error::Result;
use crate::packages::ManagerRegistry;
use std::path::Path;

pub struct AppContext {
    pub settings: Settings,
    pub registry: ManagerRegistry,
}

impl AppContext {
    /// Context with a filesystem conda locator and options from `settings`
    pub fn new(settings: Settings) -> Self {
        let registry = ManagerRegistry::new(settings.manager_options());
        Self { settings, registry }
    }

    pub fn with_registry(settings: Settings, registry: ManagerRegistry) -> Self {
        Self { settings, registry }
    }

    /// Load settings from `config`, or from the default location
    pub fn load(config: Option<&Path>) -> Result<Self> {
        let settings = match config {
            Some(path) => Settings::load_from(path)?,
            None => Settings::load()?,
        };
        Ok(Self::new(settings))
    }

    /// Drop the registry and every manager it cached
    pub fn shutdown(self) -> usize {
        self.registry.shutdown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{Flavor, Interpreter, LanguageLevel};

    #[test]
    fn registry_uses_settings_options() {
        let settings = Settings {
            docker: "podman".to_string(),
            ..Settings::default()
        };
        let ctx = AppContext::new(settings);
        assert_eq!(ctx.registry.options().docker_binary, "podman");
    }

    #[test]
    fn shutdown_counts_cached_managers() {
        let ctx = AppContext::new(Settings::default());
        ctx.registry.resolve(&Interpreter::new(
            "py",
            Some("/usr/bin/python3".to_string()),
            LanguageLevel::DEFAULT,
            Flavor::CPython,
        ));
        assert_eq!(ctx.shutdown(), 1);
    }

    #[test]
    fn load_reads_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.kdl");
        std::fs::write(&path, "timeout 5\n").unwrap();
        let ctx = AppContext::load(Some(&path)).unwrap();
        assert_eq!(ctx.settings.timeout_secs, 5);
    }
}

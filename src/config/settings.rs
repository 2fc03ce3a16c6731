//! Settings Module
//!
//! Loads `settings.kdl`:
//!
//! ```kdl
//! settings {
//!     color "auto"
//!     verbose #false
//!     timeout 600
//!     pip-index-url "https://pypi.org/simple"
//!     conda-channel "conda-forge" "bioconda"
//!     ssh "ssh"
//!     docker "docker"
//!     requirements-file "requirements.txt"
//! }
//! ```
//!
//! Keys may also appear at the top level. A missing file means defaults.

use crate::error::{PypkgsError, Result};
use crate::packages::ManagerOptions;
use crate::utils::paths;
use kdl::{KdlDocument, KdlNode, KdlValue};
use std::fs;
use std::path::Path;
use std::time::Duration;

const COLOR_MODES: [&str; 3] = ["auto", "always", "never"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub color: String,
    pub verbose: bool,
    pub timeout_secs: u64,
    pub pip_index_url: Option<String>,
    pub conda_channels: Vec<String>,
    pub ssh: String,
    pub docker: String,
    pub requirements_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        let options = ManagerOptions::default();
        Self {
            color: "auto".to_string(),
            verbose: false,
            timeout_secs: options.timeout.as_secs(),
            pip_index_url: options.pip_index_url,
            conda_channels: options.conda_channels,
            ssh: options.ssh_binary,
            docker: options.docker_binary,
            requirements_file: options.requirements_file,
        }
    }
}

impl Settings {
    /// Load from the platform config directory
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::settings_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| PypkgsError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let doc: KdlDocument = content.parse()?;
        let mut settings = Self::default();

        for node in doc.nodes() {
            if node.name().value() == "settings" {
                if let Some(children) = node.children() {
                    for child in children.nodes() {
                        settings.apply(child)?;
                    }
                }
            } else {
                settings.apply(node)?;
            }
        }

        Ok(settings)
    }

    fn apply(&mut self, node: &KdlNode) -> Result<()> {
        let key = node.name().value();
        match key {
            "color" => {
                let value = string_arg(node)?;
                if !COLOR_MODES.contains(&value.as_str()) {
                    return Err(invalid_value(key, &value, &COLOR_MODES.join(", ")));
                }
                self.color = value;
            }
            "verbose" => {
                self.verbose = first_arg(node)?
                    .as_bool()
                    .ok_or_else(|| invalid_value(key, &node.to_string(), "#true, #false"))?;
            }
            "timeout" => {
                const VALID: &str = "a positive number of seconds";
                let secs = first_arg(node)?
                    .as_integer()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| invalid_value(key, &node.to_string(), VALID))?;
                self.timeout_secs = u64::try_from(secs)
                    .map_err(|_| invalid_value(key, &secs.to_string(), VALID))?;
            }
            "pip-index-url" => self.pip_index_url = Some(string_arg(node)?),
            "conda-channel" | "conda-channels" => {
                for entry in node.entries().iter().filter(|e| e.name().is_none()) {
                    let channel = entry
                        .value()
                        .as_string()
                        .ok_or_else(|| invalid_value(key, &entry.to_string(), "channel names"))?;
                    self.conda_channels.push(channel.to_string());
                }
            }
            "ssh" => self.ssh = string_arg(node)?,
            "docker" => self.docker = string_arg(node)?,
            "requirements-file" => self.requirements_file = string_arg(node)?,
            other => {
                return Err(PypkgsError::ConfigError(format!(
                    "Unknown setting: '{}'. Valid settings: {}",
                    other,
                    Self::keys().join(", ")
                )));
            }
        }
        Ok(())
    }

    pub fn keys() -> [&'static str; 8] {
        [
            "color",
            "verbose",
            "timeout",
            "pip-index-url",
            "conda-channel",
            "ssh",
            "docker",
            "requirements-file",
        ]
    }

    /// Effective values, in `keys()` order
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("color", self.color.clone()),
            ("verbose", self.verbose.to_string()),
            ("timeout", self.timeout_secs.to_string()),
            (
                "pip-index-url",
                self.pip_index_url.clone().unwrap_or_else(|| "(pip default)".to_string()),
            ),
            ("conda-channel", self.conda_channels.join(" ")),
            ("ssh", self.ssh.clone()),
            ("docker", self.docker.clone()),
            ("requirements-file", self.requirements_file.clone()),
        ]
    }

    pub fn manager_options(&self) -> ManagerOptions {
        ManagerOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            pip_index_url: self.pip_index_url.clone(),
            conda_channels: self.conda_channels.clone(),
            ssh_binary: self.ssh.clone(),
            docker_binary: self.docker.clone(),
            requirements_file: self.requirements_file.clone(),
        }
    }
}

fn first_arg(node: &KdlNode) -> Result<&KdlValue> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .map(|e| e.value())
        .ok_or_else(|| {
            PypkgsError::ConfigError(format!("Setting '{}' needs a value", node.name().value()))
        })
}

fn string_arg(node: &KdlNode) -> Result<String> {
    let key = node.name().value();
    first_arg(node)?
        .as_string()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| invalid_value(key, &node.to_string(), "a non-empty string"))
}

fn invalid_value(key: &str, value: &str, valid: &str) -> PypkgsError {
    PypkgsError::ConfigError(format!(
        "Invalid value for '{}': '{}'. Valid: {}",
        key,
        value.trim(),
        valid
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.color, "auto");
        assert!(!settings.verbose);
        assert_eq!(settings.timeout_secs, 600);
        assert_eq!(settings.requirements_file, "requirements.txt");
        assert_eq!(settings.manager_options(), ManagerOptions::default());
    }

    #[test]
    fn test_parse_settings_block() {
        let settings = Settings::parse(
            r#"
settings {
    color "never"
    verbose #true
    timeout 30
    pip-index-url "https://mirror.example/simple"
    conda-channel "conda-forge" "bioconda"
    ssh "/usr/bin/ssh"
    requirements-file "requirements-dev.txt"
}
"#,
        )
        .unwrap();

        assert_eq!(settings.color, "never");
        assert!(settings.verbose);
        assert_eq!(settings.conda_channels, vec!["conda-forge", "bioconda"]);

        let options = settings.manager_options();
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert_eq!(options.pip_index_url.as_deref(), Some("https://mirror.example/simple"));
        assert_eq!(options.ssh_binary, "/usr/bin/ssh");
        assert_eq!(options.docker_binary, "docker");
        assert_eq!(options.requirements_file, "requirements-dev.txt");
    }

    #[test]
    fn test_top_level_keys() {
        let settings = Settings::parse("docker \"podman\"\n").unwrap();
        assert_eq!(settings.docker, "podman");
    }

    #[test]
    fn test_invalid_values() {
        assert!(Settings::parse("color \"purple\"").is_err());
        assert!(Settings::parse("timeout 0").is_err());
        assert!(Settings::parse("timeout \"soon\"").is_err());
        assert!(Settings::parse("ssh \"\"").is_err());
        assert!(Settings::parse("verbose").is_err());
    }

    #[test]
    fn test_unknown_key() {
        let err = Settings::parse("editor \"vim\"").unwrap_err();
        assert!(err.to_string().contains("Unknown setting: 'editor'"));
    }

    #[test]
    fn test_syntax_error_is_kdl_error() {
        let err = Settings::parse("settings {").unwrap_err();
        assert!(matches!(err, PypkgsError::KdlError(_)));
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.kdl")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.kdl");
        fs::write(&path, "settings {\n    color \"always\"\n}\n").unwrap();
        assert_eq!(Settings::load_from(&path).unwrap().color, "always");
    }
}

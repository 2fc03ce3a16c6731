//! Input validation for package names
//!
//! Names end up on pip / conda command lines and, for remote interpreters,
//! inside a command string executed by a remote shell.

use crate::error::{PypkgsError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Distribution names as allowed by PEP 508
static SAFE_PACKAGE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?$").expect("Invalid regex pattern")
});

static NAME_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_.]+").expect("Invalid regex pattern"));

/// Validate a package name is safe to pass to a package manager
pub fn validate_package_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(PypkgsError::InvalidRequirement(
            "Package name cannot be empty".to_string(),
        ));
    }

    if name.len() > 256 {
        return Err(PypkgsError::InvalidRequirement(format!(
            "Package name too long (max 256 chars): {}...",
            name.chars().take(50).collect::<String>()
        )));
    }

    if !SAFE_PACKAGE_NAME.is_match(name) {
        return Err(PypkgsError::InvalidRequirement(format!(
            "Package name contains invalid characters: {}",
            name
        )));
    }

    Ok(())
}

/// Validate a list of package names
pub fn validate_package_names<S: AsRef<str>>(names: &[S]) -> Result<()> {
    for name in names {
        validate_package_name(name.as_ref())?;
    }
    Ok(())
}

/// PEP 503 normalized form: lowercase, runs of `-_.` collapsed to `-`
pub fn normalize_name(name: &str) -> String {
    NAME_SEPARATORS
        .replace_all(&name.to_ascii_lowercase(), "-")
        .into_owned()
}

use crate::error::{PypkgsError, Result};
use directories::{ProjectDirs, UserDirs};
use std::path::PathBuf;

pub fn config_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from("com", "pypkgs", "pypkgs")
        .ok_or_else(|| PypkgsError::Other("Could not determine config directory".to_string()))?;
    Ok(proj.config_dir().to_path_buf())
}

pub fn settings_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("settings.kdl"))
}

/// The user's home directory, if one can be determined.
pub fn home_dir() -> Option<PathBuf> {
    UserDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

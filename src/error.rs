use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PypkgsError {
    /// Raised by managers bound to an interpreter that cannot be used
    #[error("{0}")]
    Execution(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error at '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    StdIoError(#[from] std::io::Error),

    #[error("KDL parse error: {0}")]
    KdlError(#[from] kdl::KdlError),

    #[error("Package manager error: {0}")]
    PackageManagerError(String),

    #[error("Invalid requirement: {0}")]
    InvalidRequirement(String),

    #[error("Invalid remote interpreter: {0}")]
    InvalidRemote(String),

    #[error("Operation interrupted by user")]
    Interrupted,

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error("System command '{command}' failed: {reason}")]
    SystemCommandFailed { command: String, reason: String },

    #[error("{0}")]
    Other(String),
}

impl PypkgsError {
    /// Whether this is the execution error raised for an unusable interpreter
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }
}

pub type Result<T> = std::result::Result<T, PypkgsError>;

//! Error types for stackgate
//!
//! Uses `thiserror` for library errors. Component-specific failures
//! (`ScanError`, `ControlPlaneError`, `RemoteDeployError`, ...) live next to
//! the component that raises them; this module holds the crate-level error
//! used by configuration, fixture loading, and identifier validation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for stackgate operations
pub type StackgateResult<T> = Result<T, StackgateError>;

/// Main error type for stackgate operations
#[derive(Error, Debug)]
pub enum StackgateError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Invalid configuration file
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Invalid fixture file
    #[error("invalid fixture in {file}: {message}")]
    InvalidFixture { file: PathBuf, message: String },

    /// Stack identifier failed validation
    #[error("invalid stack identifier '{0}'")]
    InvalidStackIdentifier(String),
}

//! # Configuration Errors

use std::path::PathBuf;

use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid JSON in config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Error saving config to {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Resource '{resource}': {reason}")]
    InvalidResource { resource: String, reason: String },

    #[error("Resource '{0}' is already registered")]
    DuplicateResource(String),
}

impl ConfigError {
    pub(crate) fn invalid(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidResource {
            resource: resource.into(),
            reason: reason.into(),
        }
    }
}

//! CLI-specific error types
//!
//! All CLI errors end the process with a non-zero status.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Data directory missing or not a directory
    #[error("Data directory not found: {}", .0.display())]
    DataDirNotFound(PathBuf),

    /// Configuration could not be loaded, built or saved
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Terminal or runtime I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The HTTP server stopped with an error
    #[error("HTTP server failed: {0}")]
    Server(String),
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

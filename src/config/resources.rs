//! Resource configuration file
//!
//! ```json
//! {
//!   "resources": {
//!     "users": { "file": "users.csv", "primary_key": "id", "readonly": false }
//!   }
//! }
//! ```
//!
//! `primary_key` defaults to `id`. A resource without `readonly` inherits the
//! server-wide setting.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::errors::{ConfigError, ConfigResult};

/// Primary key used when a resource does not name one
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// One table exposed over HTTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// File name relative to the data directory
    pub file: String,

    #[serde(default = "default_primary_key")]
    pub primary_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readonly: Option<bool>,
}

fn default_primary_key() -> String {
    DEFAULT_PRIMARY_KEY.to_string()
}

impl ResourceConfig {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            primary_key: default_primary_key(),
            readonly: None,
        }
    }

    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = primary_key.into();
        self
    }

    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = Some(readonly);
        self
    }
}

/// Whole configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceConfig>,
}

/// Loads and validates a JSON configuration file.
pub fn load_config(path: &Path) -> ConfigResult<ServerConfig> {
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
        _ => ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    let config: ServerConfig = serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate_config(&config)?;
    debug!(path = %path.display(), resources = config.resources.len(), "config loaded");
    Ok(config)
}

/// Writes `config` as pretty-printed JSON.
pub fn save_config(config: &ServerConfig, path: &Path) -> ConfigResult<()> {
    let mut text = to_json(config);
    text.push('\n');
    fs::write(path, text).map_err(|e| ConfigError::Save {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Pretty JSON rendering of a configuration.
pub fn to_json(config: &ServerConfig) -> String {
    // String keys and plain fields only; serialization cannot fail.
    serde_json::to_string_pretty(config).unwrap_or_else(|_| String::from("{}"))
}

/// Rejects empty names, empty keys, and files outside the data directory.
pub fn validate_config(config: &ServerConfig) -> ConfigResult<()> {
    for (name, resource) in &config.resources {
        if name.is_empty() || name.contains('/') {
            return Err(ConfigError::invalid(name, "name must be a single path segment"));
        }
        if resource.file.trim().is_empty() {
            return Err(ConfigError::invalid(name, "must specify 'file'"));
        }
        if resource.primary_key.trim().is_empty() {
            return Err(ConfigError::invalid(name, "primary_key must not be empty"));
        }
        let escapes = Path::new(&resource.file)
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ConfigError::invalid(
                name,
                format!("file '{}' must stay inside the data directory", resource.file),
            ));
        }
    }
    Ok(())
}

/// One resource per `*.csv` file directly inside `data_dir`, named after the
/// file stem. A missing directory yields an empty configuration.
pub fn discover_csv_files(data_dir: &Path, readonly: bool) -> ConfigResult<ServerConfig> {
    let mut config = ServerConfig::default();
    let entries = match fs::read_dir(data_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(config),
        Err(e) => {
            return Err(ConfigError::Io {
                path: data_dir.to_path_buf(),
                source: e,
            })
        }
    };

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::Io {
            path: data_dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        let (Some(stem), Some(file)) = (
            path.file_stem().and_then(|s| s.to_str()),
            path.file_name().and_then(|s| s.to_str()),
        ) else {
            continue;
        };
        config.resources.insert(
            stem.to_string(),
            ResourceConfig::new(file).with_readonly(readonly),
        );
    }

    debug!(dir = %data_dir.display(), found = config.resources.len(), "csv files discovered");
    Ok(config)
}

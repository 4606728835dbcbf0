//! Resource registry
//!
//! Maps resource names to their record stores. Built explicitly from a
//! [`ServerConfig`] and handed to the router; there is no global instance.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::storage::{RecordStore, StoreOptions};

use super::errors::{ConfigError, ConfigResult};
use super::resources::{validate_config, ResourceConfig, ServerConfig};

/// One registered resource
#[derive(Debug, Clone)]
pub struct Resource {
    pub name: String,
    pub readonly: bool,
    pub store: Arc<RecordStore>,
}

impl Resource {
    pub fn file_path(&self) -> &Path {
        self.store.path()
    }

    pub fn primary_key(&self) -> &str {
        self.store.primary_key()
    }
}

/// Named resources, iterated in name order
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    resources: BTreeMap<String, Resource>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry rooted at `data_dir`. Resources without an explicit
    /// `readonly` take `default_readonly`.
    pub fn from_config(
        data_dir: &Path,
        config: &ServerConfig,
        default_readonly: bool,
        options: StoreOptions,
    ) -> ConfigResult<Self> {
        validate_config(config)?;
        let mut registry = Self::new();
        for (name, resource) in &config.resources {
            registry.register(
                name,
                data_dir.join(&resource.file),
                &resource.primary_key,
                resource.readonly.unwrap_or(default_readonly),
                options,
            )?;
        }
        Ok(registry)
    }

    /// Adds a resource. Names must be unique.
    pub fn register(
        &mut self,
        name: &str,
        file_path: impl Into<PathBuf>,
        primary_key: &str,
        readonly: bool,
        options: StoreOptions,
    ) -> ConfigResult<()> {
        if self.resources.contains_key(name) {
            return Err(ConfigError::DuplicateResource(name.to_string()));
        }
        let store = RecordStore::with_options(file_path, primary_key, options);
        info!(
            resource = name,
            file = %store.path().display(),
            primary_key,
            readonly,
            "resource registered"
        );
        self.resources.insert(
            name.to_string(),
            Resource {
                name: name.to_string(),
                readonly,
                store: Arc::new(store),
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Configuration describing this registry, with file names only.
    pub fn as_config(&self) -> ServerConfig {
        let resources = self
            .resources
            .values()
            .map(|r| {
                let file = r
                    .file_path()
                    .file_name()
                    .map(|f| f.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let config = ResourceConfig::new(file)
                    .with_primary_key(r.primary_key())
                    .with_readonly(r.readonly);
                (r.name.clone(), config)
            })
            .collect();
        ServerConfig { resources }
    }
}

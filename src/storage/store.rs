//! Record store
//!
//! CRUD over one CSV table keyed by one primary-key column. Every call
//! reloads the file; only the inferred schema is cached between calls.
//!
//! Locking discipline:
//! - `create`, `update` and `delete` hold the table's exclusive lock for the
//!   whole load, mutate, persist sequence
//! - `list`, `get` and `schema` read without locking; atomic replace
//!   guarantees they see a complete table
//!
//! A store never holds more than one table lock, so stores cannot deadlock
//! each other.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info};

use crate::schema::{infer_schema, Schema};

use super::errors::{StoreError, StoreResult};
use super::keys::{allocate, KeyPolicy};
use super::lock::{TableLock, DEFAULT_LOCK_TIMEOUT};
use super::reader::read_table;
use super::record::{Record, Table};
use super::writer::write_table;

/// Per-store tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// How long a writer waits for the table lock
    pub lock_timeout: Duration,
    /// Handling of explicit duplicate keys on create
    pub key_policy: KeyPolicy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            key_policy: KeyPolicy::default(),
        }
    }
}

/// Cached inference result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SchemaCache {
    /// Not computed since the last invalidation
    #[default]
    Unset,
    /// Schema computed from the table as it was at that time
    Cached(Schema),
}

/// CRUD facade over one table file
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    primary_key: String,
    options: StoreOptions,
    schema: Mutex<SchemaCache>,
}

impl RecordStore {
    /// Creates a store with default options. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>, primary_key: impl Into<String>) -> Self {
        Self::with_options(path, primary_key, StoreOptions::default())
    }

    pub fn with_options(
        path: impl Into<PathBuf>,
        primary_key: impl Into<String>,
        options: StoreOptions,
    ) -> Self {
        Self {
            path: path.into(),
            primary_key: primary_key.into(),
            options,
            schema: Mutex::new(SchemaCache::Unset),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Loads the whole table.
    pub fn load(&self) -> StoreResult<Table> {
        read_table(&self.path)
    }

    /// Records in `[offset, offset + limit)`. Out-of-range offsets yield nothing.
    pub fn list(&self, limit: usize, offset: usize) -> StoreResult<Vec<Record>> {
        let table = self.load()?;
        Ok(table.records.into_iter().skip(offset).take(limit).collect())
    }

    /// Number of records currently stored
    pub fn count(&self) -> StoreResult<usize> {
        Ok(self.load()?.len())
    }

    /// First record whose key equals `key`.
    pub fn get(&self, key: &str) -> StoreResult<Record> {
        self.load()?
            .find(&self.primary_key, key)
            .cloned()
            .ok_or_else(|| StoreError::not_found(key))
    }

    /// Appends `payload`, assigning a key when it carries none.
    pub fn create(&self, payload: Record) -> StoreResult<Record> {
        let _lock = self.lock()?;
        let table = self.load()?;
        let result = allocate(
            &self.path,
            table,
            &self.primary_key,
            payload,
            self.options.key_policy,
        );
        // The backfill may have rewritten the file even if the append failed.
        self.invalidate_schema();
        let created = result?;

        info!(
            path = %self.path.display(),
            key = %created.get(&self.primary_key).map(String::as_str).unwrap_or(""),
            "record created"
        );
        Ok(created)
    }

    /// Merges `payload` over the record keyed `key`. The key itself cannot change.
    pub fn update(&self, key: &str, payload: Record) -> StoreResult<Record> {
        let _lock = self.lock()?;
        let mut table = self.load()?;
        let idx = table
            .position(&self.primary_key, key)
            .ok_or_else(|| StoreError::not_found(key))?;

        let adds_column = payload.keys().any(|k| !table.has_column(k));

        let record = &mut table.records[idx];
        record.extend(payload);
        record.insert(self.primary_key.clone(), key.to_string());
        let updated = record.clone();

        let order = table.column_order();
        write_table(&self.path, &table.records, Some(&order))?;

        // After the write: a schema() that loaded the old file must not survive.
        if adds_column {
            self.invalidate_schema();
        }
        info!(path = %self.path.display(), key = %key, "record updated");
        Ok(updated)
    }

    /// Removes every record keyed `key` and returns how many went.
    /// Deleting a missing key is a no-op and touches nothing on disk.
    pub fn delete(&self, key: &str) -> StoreResult<usize> {
        let _lock = self.lock()?;
        let mut table = self.load()?;
        let before = table.records.len();
        let primary_key = &self.primary_key;
        table
            .records
            .retain(|r| r.get(primary_key).map(String::as_str) != Some(key));
        let removed = before - table.records.len();

        if removed == 0 {
            debug!(path = %self.path.display(), key = %key, "delete matched nothing");
            return Ok(0);
        }

        let order = table.column_order();
        write_table(&self.path, &table.records, Some(&order))?;
        self.invalidate_schema();
        info!(path = %self.path.display(), key = %key, removed, "records deleted");
        Ok(removed)
    }

    /// Inferred schema, computed on first use after an invalidation.
    pub fn schema(&self) -> StoreResult<Schema> {
        let mut cache = self.cache();
        if let SchemaCache::Cached(schema) = &*cache {
            return Ok(schema.clone());
        }
        let schema = infer_schema(&self.load()?);
        debug!(path = %self.path.display(), columns = schema.len(), "schema inferred");
        *cache = SchemaCache::Cached(schema.clone());
        Ok(schema)
    }

    /// Drops the cached schema so the next access recomputes it.
    pub fn invalidate_schema(&self) {
        *self.cache() = SchemaCache::Unset;
    }

    /// Snapshot of the cache state
    pub fn schema_cache(&self) -> SchemaCache {
        self.cache().clone()
    }

    fn lock(&self) -> StoreResult<TableLock> {
        TableLock::acquire(&self.path, self.options.lock_timeout)
    }

    fn cache(&self) -> MutexGuard<'_, SchemaCache> {
        // The cache holds no invariant a panicking holder could break.
        self.schema.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

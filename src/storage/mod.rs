//! Record storage engine
//!
//! Each table is one CSV file: a header row followed by data rows. The
//! engine reads whole files, mutates them in memory and replaces them
//! atomically.
//!
//! # Guarantees
//!
//! - Readers never observe a partially written table (temp file + rename)
//! - Writers to one table are serialized by an OS-level file lock
//! - Rows are rectangular on disk: a missing field is written as ""
//! - Auto-assigned keys are strictly increasing
//!
//! # Non-guarantees
//!
//! - No atomicity across tables
//! - No index: every operation scans the full file

mod errors;
mod keys;
mod lock;
mod reader;
mod record;
mod store;
mod writer;

pub use errors::{StoreError, StoreResult};
pub use keys::{next_key, KeyPolicy, FIRST_KEY};
pub use lock::{lock_path_for, TableLock, DEFAULT_LOCK_TIMEOUT};
pub use reader::read_table;
pub use record::{Record, Table};
pub use store::{RecordStore, SchemaCache, StoreOptions};
pub use writer::write_table;

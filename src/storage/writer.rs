//! Atomic table writer
//!
//! Every write replaces the whole file. Content goes to a temporary file in
//! the target's directory, is fsynced, then renamed over the target, so a
//! reader sees either the complete old table or the complete new one.
//!
//! If anything fails before the rename the target is untouched and the
//! temporary file is removed when its handle drops.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use super::errors::{StoreError, StoreResult};
use super::record::Record;

/// Writes `records` to `path` atomically.
///
/// Column order is `field_order` when given, otherwise the first record's
/// fields. Missing fields are written as empty strings; fields outside the
/// column set are dropped. An empty column set produces an empty file.
pub fn write_table(path: &Path, records: &[Record], field_order: Option<&[String]>) -> StoreResult<()> {
    let columns: Vec<String> = match field_order {
        Some(order) => order.to_vec(),
        None => records
            .first()
            .map(|r| r.keys().cloned().collect())
            .unwrap_or_default(),
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
        if !columns.is_empty() {
            writer.write_record(&columns).map_err(|e| StoreError::from_csv(path, e))?;
            for record in records {
                let row = columns
                    .iter()
                    .map(|c| record.get(c).map(String::as_str).unwrap_or(""));
                writer.write_record(row).map_err(|e| StoreError::from_csv(path, e))?;
            }
        }
        writer.flush()?;
    }
    tmp.as_file_mut().flush()?;
    tmp.as_file().sync_all()?;

    // The temp file is created 0600; keep whatever mode the table had.
    if let Ok(existing) = fs::metadata(path) {
        tmp.as_file().set_permissions(existing.permissions())?;
    }
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    sync_dir(dir);

    debug!(
        path = %path.display(),
        rows = records.len(),
        columns = columns.len(),
        "table persisted"
    );
    Ok(())
}

/// Best-effort directory fsync so the rename itself is durable.
fn sync_dir(dir: &Path) {
    if let Ok(d) = File::open(dir) {
        let _ = d.sync_all();
    }
}

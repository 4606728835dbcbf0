//! Table reader
//!
//! Loads a whole CSV file into a [`Table`]. A missing file is an empty table,
//! not an error. Rows whose field count differs from the header are rejected.

use std::fs::File;
use std::io;
use std::path::Path;

use tracing::debug;

use super::errors::{StoreError, StoreResult};
use super::record::{Record, Table};

/// Reads the table stored at `path`.
///
/// # Errors
///
/// - `StoreError::MalformedTable` if the content is not well-formed CSV
///   (ragged rows, invalid UTF-8)
/// - `StoreError::Io` for any other read failure
pub fn read_table(path: &Path) -> StoreResult<Table> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "table file missing, treating as empty");
            return Ok(Table::default());
        }
        Err(e) => return Err(StoreError::Io(e)),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(file);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| StoreError::from_csv(path, e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| StoreError::from_csv(path, e))?;
        let record: Record = columns
            .iter()
            .cloned()
            .zip(row.iter().map(str::to_string))
            .collect();
        records.push(record);
    }

    debug!(path = %path.display(), rows = records.len(), "table loaded");
    Ok(Table::new(columns, records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let table = read_table(&temp.path().join("empty.csv")).unwrap();
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
    }

    #[test]
    fn test_read_zero_byte_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("blank.csv");
        fs::write(&path, "").unwrap();
        let table = read_table(&path).unwrap();
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
    }

    #[test]
    fn test_read_header_and_rows() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("users.csv");
        fs::write(&path, "id,name\n1,Alice\n2,Bob\n").unwrap();

        let table = read_table(&path).unwrap();
        assert_eq!(table.columns, vec!["id", "name"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[1]["name"], "Bob");
    }

    #[test]
    fn test_read_quoted_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.csv");
        fs::write(&path, "id,note\n1,\"hello, \"\"world\"\"\nsecond line\"\n").unwrap();

        let table = read_table(&path).unwrap();
        assert_eq!(table.records[0]["note"], "hello, \"world\"\nsecond line");
    }

    #[test]
    fn test_header_only_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("users.csv");
        fs::write(&path, "id,name\n").unwrap();

        let table = read_table(&path).unwrap();
        assert_eq!(table.columns, vec!["id", "name"]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_ragged_row_is_malformed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.csv");
        fs::write(&path, "id,name\n1,Alice,extra\n").unwrap();

        let result = read_table(&path);
        assert!(matches!(result, Err(StoreError::MalformedTable { .. })));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bin.csv");
        fs::write(&path, b"id,name\n1,\xff\xfe\n").unwrap();

        let result = read_table(&path);
        assert!(matches!(result, Err(StoreError::MalformedTable { .. })));
    }
}

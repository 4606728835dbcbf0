//! Table and record model
//!
//! A record is a flat field-name to string mapping that remembers insertion
//! order, so new columns land in the order a payload named them. Values are
//! always text on disk; typing is advisory and lives in `crate::schema`.

use indexmap::IndexMap;

/// One row of a table. Equality ignores field order.
pub type Record = IndexMap<String, String>;

/// The full contents of one table file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Header columns in file order
    pub columns: Vec<String>,
    /// Data rows in file order
    pub records: Vec<Record>,
}

impl Table {
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Columns a write must emit: the header first, then any field that only
    /// some records carry, in order of first appearance.
    pub fn column_order(&self) -> Vec<String> {
        let mut order = self.columns.clone();
        for record in &self.records {
            for field in record.keys() {
                if !order.iter().any(|c| c == field) {
                    order.push(field.clone());
                }
            }
        }
        order
    }

    /// First record whose `key_field` equals `key`.
    pub fn find(&self, key_field: &str, key: &str) -> Option<&Record> {
        self.records
            .iter()
            .find(|r| r.get(key_field).map(String::as_str) == Some(key))
    }

    pub(crate) fn position(&self, key_field: &str, key: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.get(key_field).map(String::as_str) == Some(key))
    }
}

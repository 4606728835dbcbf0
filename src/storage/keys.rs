//! Primary-key allocation
//!
//! Runs inside the writer lock. Given the freshly loaded table, assigns the
//! new record's key, applies the one-time key backfill when the header has
//! no key column, appends the record and persists the table.

use std::cmp::Ordering;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::schema::{canonical_integer, is_integer};

use super::errors::{StoreError, StoreResult};
use super::record::{Record, Table};
use super::writer::write_table;

/// Key assigned to the first record of an empty table
pub const FIRST_KEY: &str = "1";

/// How explicitly supplied keys that already exist are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPolicy {
    /// Accept the duplicate and log a warning.
    #[default]
    Permissive,
    /// Reject the duplicate with [`StoreError::DuplicateKey`].
    Strict,
}

/// Assigns a key to `payload`, appends it to `table` and persists.
pub(crate) fn allocate(
    path: &Path,
    mut table: Table,
    key_field: &str,
    payload: Record,
    policy: KeyPolicy,
) -> StoreResult<Record> {
    let explicit = payload
        .get(key_field)
        .filter(|v| !v.is_empty())
        .cloned();

    if table.is_empty() {
        let key = explicit.unwrap_or_else(|| FIRST_KEY.to_string());
        let record = keyed(key_field, key, payload);
        let order: Vec<String> = record.keys().cloned().collect();
        write_table(path, std::slice::from_ref(&record), Some(&order))?;
        info!(path = %path.display(), "table initialized by first record");
        return Ok(record);
    }

    if !table.has_column(key_field) {
        backfill_keys(path, &mut table, key_field)?;
    }

    let key = match explicit {
        Some(key) => {
            if table.find(key_field, &key).is_some() {
                match policy {
                    KeyPolicy::Strict => return Err(StoreError::DuplicateKey { key }),
                    KeyPolicy::Permissive => warn!(
                        path = %path.display(),
                        key = %key,
                        "explicit primary key duplicates an existing record"
                    ),
                }
            }
            key
        }
        None => next_key(&table, key_field),
    };

    let record = keyed(key_field, key, payload);
    table.records.push(record.clone());
    let order = table.column_order();
    write_table(path, &table.records, Some(&order))?;
    Ok(record)
}

/// The key first, then the payload's other fields in payload order.
fn keyed(key_field: &str, key: String, payload: Record) -> Record {
    let mut record = Record::with_capacity(payload.len() + 1);
    record.insert(key_field.to_string(), key);
    record.extend(payload.into_iter().filter(|(k, _)| k != key_field));
    record
}

/// Numbers every record by position and moves the key column to the front.
fn backfill_keys(path: &Path, table: &mut Table, key_field: &str) -> StoreResult<()> {
    for (i, record) in table.records.iter_mut().enumerate() {
        record.insert(key_field.to_string(), (i + 1).to_string());
    }
    table.columns.insert(0, key_field.to_string());

    let order = table.column_order();
    write_table(path, &table.records, Some(&order))?;
    info!(
        path = %path.display(),
        key = key_field,
        rows = table.records.len(),
        "backfilled missing primary key column"
    );
    Ok(())
}

/// One more than the largest integer key. Empty or non-integer keys count as 0.
///
/// Keys are compared as decimal numbers of any width, so a table holding a
/// key past the range of every machine integer still allocates above it.
pub fn next_key(table: &Table, key_field: &str) -> String {
    table
        .records
        .iter()
        .map(|r| {
            r.get(key_field)
                .and_then(|v| IntKey::parse(v))
                .unwrap_or_else(IntKey::zero)
        })
        .max()
        .unwrap_or_else(IntKey::zero)
        .successor()
        .to_string()
}

/// Decimal integer of unbounded width. `digits` is canonical: no sign, no
/// leading zeros, and zero is never negative.
#[derive(Debug, Clone, PartialEq, Eq)]
struct IntKey {
    negative: bool,
    digits: String,
}

impl IntKey {
    fn zero() -> Self {
        Self {
            negative: false,
            digits: "0".to_string(),
        }
    }

    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if !is_integer(text) {
            return None;
        }
        let canonical = canonical_integer(text);
        Some(match canonical.strip_prefix('-') {
            Some(magnitude) => Self {
                negative: true,
                digits: magnitude.to_string(),
            },
            None => Self {
                negative: false,
                digits: canonical,
            },
        })
    }

    fn successor(&self) -> Self {
        if self.negative {
            let digits = decrement_digits(&self.digits);
            Self {
                negative: digits != "0",
                digits,
            }
        } else {
            Self {
                negative: false,
                digits: increment_digits(&self.digits),
            }
        }
    }
}

impl Ord for IntKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => cmp_magnitude(&self.digits, &other.digits),
            (true, true) => cmp_magnitude(&other.digits, &self.digits),
        }
    }
}

impl PartialOrd for IntKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for IntKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str(&self.digits)
    }
}

fn cmp_magnitude(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn increment_digits(digits: &str) -> String {
    let mut bytes = digits.as_bytes().to_vec();
    for b in bytes.iter_mut().rev() {
        if *b == b'9' {
            *b = b'0';
        } else {
            *b += 1;
            return bytes.iter().map(|&b| b as char).collect();
        }
    }
    // All nines: carry into a new leading digit.
    std::iter::once('1')
        .chain(bytes.iter().map(|&b| b as char))
        .collect()
}

/// `digits` must be at least 1.
fn decrement_digits(digits: &str) -> String {
    let mut bytes = digits.as_bytes().to_vec();
    for b in bytes.iter_mut().rev() {
        if *b == b'0' {
            *b = b'9';
        } else {
            *b -= 1;
            break;
        }
    }
    let text: String = bytes.iter().map(|&b| b as char).collect();
    let trimmed = text.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

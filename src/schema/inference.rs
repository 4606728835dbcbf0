//! Column type inference
//!
//! Each column is classified from at most [`SAMPLE_SIZE`] non-blank values,
//! taken from the top of the table. A column is `integer` only if every
//! sample is a base-10 integer, else `float` only if every sample parses as a
//! float, else `string`. Columns with no samples are `string`.

use crate::storage::Table;

use super::types::{ColumnType, Schema};

/// Maximum number of non-blank values sampled per column
pub const SAMPLE_SIZE: usize = 10;

/// Infers a schema for `table`. An empty table yields an empty schema.
pub fn infer_schema(table: &Table) -> Schema {
    if table.is_empty() {
        return Schema::new();
    }

    table
        .column_order()
        .into_iter()
        .map(|column| {
            let samples: Vec<&str> = table
                .records
                .iter()
                .filter_map(|r| r.get(&column))
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .take(SAMPLE_SIZE)
                .collect();
            let ty = classify(&samples);
            (column, ty)
        })
        .collect()
}

/// Classifies a set of trimmed, non-empty samples.
pub fn classify(samples: &[&str]) -> ColumnType {
    if samples.is_empty() {
        ColumnType::String
    } else if samples.iter().all(|v| is_integer(v)) {
        ColumnType::Integer
    } else if samples.iter().all(|v| is_float(v)) {
        ColumnType::Float
    } else {
        ColumnType::String
    }
}

/// Optional sign followed by one or more ASCII digits. No width limit.
pub fn is_integer(value: &str) -> bool {
    let digits = value
        .strip_prefix('-')
        .or_else(|| value.strip_prefix('+'))
        .unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Strips a leading `+` and leading zeros: `"+007"` becomes `"7"`, `"-0"` becomes `"0"`.
pub fn canonical_integer(text: &str) -> String {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        "0".to_string()
    } else if negative {
        format!("-{}", digits)
    } else {
        digits.to_string()
    }
}

pub fn is_float(value: &str) -> bool {
    value.parse::<f64>().is_ok()
}

//! Payload validation and coercion
//!
//! Turns an incoming JSON object into a [`Record`] of strings, checking each
//! value against the inferred column type:
//!
//! - Fields unknown to the schema are accepted as text (new columns allowed)
//! - `null` and `""` become an empty value for any column
//! - `integer` columns take integers, numbers (truncated) and integer text
//! - `float` columns take numbers and numeric text
//! - Arrays and objects are rejected everywhere
//!
//! Every violation is collected before failing.

use serde_json::{Map, Value};

use crate::storage::Record;

use super::errors::{FieldViolation, ValidationError, ValidationResult};
use super::inference::{canonical_integer, is_integer};
use super::types::{ColumnType, Schema};

/// Validates `payload` against `schema` and returns the coerced record.
pub fn validate_payload(payload: &Value, schema: &Schema) -> ValidationResult<Record> {
    let object = payload
        .as_object()
        .ok_or_else(|| ValidationError::NotAnObject(json_type_name(payload)))?;
    validate_object(object, schema)
}

/// Validates an already-unwrapped JSON object.
pub fn validate_object(object: &Map<String, Value>, schema: &Schema) -> ValidationResult<Record> {
    let mut record = Record::new();
    let mut violations = Vec::new();

    for (field, value) in object {
        let expected = schema.get(field).unwrap_or(ColumnType::String);
        match coerce(value, expected) {
            Some(text) => {
                record.insert(field.clone(), text);
            }
            None => violations.push(FieldViolation::new(field, expected, display_value(value))),
        }
    }

    if violations.is_empty() {
        Ok(record)
    } else {
        Err(ValidationError::Fields(violations))
    }
}

fn coerce(value: &Value, expected: ColumnType) -> Option<String> {
    match value {
        Value::Null => return Some(String::new()),
        Value::String(s) if s.is_empty() => return Some(String::new()),
        Value::Array(_) | Value::Object(_) => return None,
        _ => {}
    }

    match expected {
        ColumnType::Integer => coerce_integer(value),
        ColumnType::Float => coerce_float(value),
        ColumnType::String => Some(match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }),
    }
}

fn coerce_integer(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(String::from(if *b { "1" } else { "0" })),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                let f = n.as_f64()?;
                let truncated = f.trunc();
                if truncated.is_finite() && truncated.abs() < i64::MAX as f64 {
                    Some((truncated as i64).to_string())
                } else {
                    None
                }
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if is_integer(trimmed) {
                Some(canonical_integer(trimmed))
            } else {
                None
            }
        }
        _ => None,
    }
}

fn coerce_float(value: &Value) -> Option<String> {
    let f = match value {
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    Some(format_float(f))
}

/// Whole floats keep a trailing `.0` so the column still reads back as float.
pub fn format_float(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        let text = if f > 0.0 { "inf" } else { "-inf" };
        text.to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Schema {
        vec![
            ("id".to_string(), ColumnType::Integer),
            ("name".to_string(), ColumnType::String),
            ("age".to_string(), ColumnType::Integer),
            ("score".to_string(), ColumnType::Float),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_valid_payload_is_stringified() {
        let record = validate_payload(
            &json!({"name": "Alice", "age": 30, "score": "2.5"}),
            &schema(),
        )
        .unwrap();

        assert_eq!(record["name"], "Alice");
        assert_eq!(record["age"], "30");
        assert_eq!(record["score"], "2.5");
    }

    #[test]
    fn test_integer_text_is_canonicalized() {
        let record = validate_payload(&json!({"age": " +007 "}), &schema()).unwrap();
        assert_eq!(record["age"], "7");
        let record = validate_payload(&json!({"age": "-0"}), &schema()).unwrap();
        assert_eq!(record["age"], "0");
    }

    #[test]
    fn test_float_number_truncates_for_integer_column() {
        let record = validate_payload(&json!({"age": 41.9}), &schema()).unwrap();
        assert_eq!(record["age"], "41");
    }

    #[test]
    fn test_whole_float_keeps_decimal_point() {
        let record = validate_payload(&json!({"score": 3}), &schema()).unwrap();
        assert_eq!(record["score"], "3.0");
    }

    #[test]
    fn test_null_and_empty_become_blank() {
        let record = validate_payload(&json!({"age": null, "score": ""}), &schema()).unwrap();
        assert_eq!(record["age"], "");
        assert_eq!(record["score"], "");
    }

    #[test]
    fn test_unknown_fields_are_allowed() {
        let record = validate_payload(&json!({"nickname": "Al", "active": true}), &schema()).unwrap();
        assert_eq!(record["nickname"], "Al");
        assert_eq!(record["active"], "true");
    }

    #[test]
    fn test_all_violations_are_collected() {
        let err = validate_payload(
            &json!({"age": "old", "score": "high", "name": "ok"}),
            &schema(),
        )
        .unwrap_err();

        match err {
            ValidationError::Fields(violations) => {
                let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
                assert_eq!(fields, vec!["age", "score"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_integer_column_rejects_decimal_text() {
        assert!(validate_payload(&json!({"age": "3.5"}), &schema()).is_err());
    }

    #[test]
    fn test_nested_values_rejected() {
        assert!(validate_payload(&json!({"tags": ["a", "b"]}), &schema()).is_err());
        assert!(validate_payload(&json!({"name": {"first": "A"}}), &schema()).is_err());
    }

    #[test]
    fn test_non_object_payload() {
        let err = validate_payload(&json!([1, 2]), &schema()).unwrap_err();
        assert_eq!(err, ValidationError::NotAnObject("array"));
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(-0.25), "-0.25");
        assert_eq!(format_float(f64::INFINITY), "inf");
    }
}

//! Payload validation errors

use std::fmt;

use thiserror::Error;

use super::types::ColumnType;

/// One rejected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Field name
    pub field: String,
    /// Type the schema expects
    pub expected: ColumnType,
    /// Offending value as received
    pub actual: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, expected: ColumnType, actual: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected,
            actual: actual.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Field '{}': Expected {}, got '{}'",
            self.field, self.expected, self.actual
        )
    }
}

/// Payload validation failure carrying every violation found
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The payload is not a JSON object
    #[error("Payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// One or more fields do not match the schema
    #[error("Validation failed: {} field(s) rejected", .0.len())]
    Fields(Vec<FieldViolation>),
}

impl ValidationError {
    /// Human-readable messages, one per problem
    pub fn messages(&self) -> Vec<String> {
        match self {
            ValidationError::NotAnObject(_) => vec![self.to_string()],
            ValidationError::Fields(violations) => {
                violations.iter().map(ToString::to_string).collect()
            }
        }
    }
}

/// Result type for payload validation
pub type ValidationResult<T> = Result<T, ValidationError>;

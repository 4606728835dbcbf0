//! Schema inference and payload validation
//!
//! Schemas are never stored. They are derived from the current table
//! contents on demand and are advisory: they drive payload coercion at the
//! HTTP boundary, not storage-level constraints.

mod errors;
mod inference;
mod types;
mod validator;

pub use errors::{FieldViolation, ValidationError, ValidationResult};
pub use inference::{canonical_integer, classify, infer_schema, is_float, is_integer, SAMPLE_SIZE};
pub use types::{ColumnType, Schema};
pub use validator::{format_float, validate_object, validate_payload};

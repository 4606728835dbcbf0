//! # REST API Module
//!
//! HTTP endpoints for CRUD, schema and list queries on every configured
//! resource, with payloads coerced against the inferred schema.

pub mod errors;
pub mod filter;
pub mod parser;
pub mod response;
pub mod server;

pub use errors::{ErrorResponse, RestError, RestResult};
pub use filter::{run_query, FilterExpr, FilterOperator};
pub use parser::QueryParams;
pub use response::{ListResponse, SchemaResponse};
pub use server::RestServer;

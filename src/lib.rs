//! csv-server - REST API over a directory of CSV files
//!
//! Each CSV file is a resource. Records are read and written whole-file,
//! with an inferred column schema used to coerce incoming payloads.

pub mod cli;
pub mod config;
pub mod rest_api;
pub mod schema;
pub mod storage;

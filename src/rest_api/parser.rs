//! # Query Parameter Parser
//!
//! Parses list query parameters:
//! `?q=text&filter=col:eq:value&sort=col&order=desc&limit=20&offset=40`.
//! `filter` may repeat.

use super::errors::{RestError, RestResult};
use super::filter::FilterExpr;

/// Default limit if not specified
pub const DEFAULT_LIMIT: usize = 50;

/// Parsed query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    /// Free-text search over all values
    pub q: Option<String>,

    /// Filter expressions (AND)
    pub filters: Vec<FilterExpr>,

    /// Column to sort by
    pub sort: Option<String>,

    /// Sort direction
    pub descending: bool,

    /// Number of records to return
    pub limit: usize,

    /// Number of records to skip
    pub offset: usize,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            q: None,
            filters: Vec::new(),
            sort: None,
            descending: false,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl QueryParams {
    /// Parse query parameters from key/value pairs, keeping repeats.
    ///
    /// Malformed filters are skipped. Unknown keys are ignored.
    pub fn parse(pairs: &[(String, String)]) -> RestResult<Self> {
        let mut result = QueryParams::default();

        for (key, value) in pairs {
            match key.as_str() {
                "q" => result.q = Some(value.clone()),
                "filter" => {
                    if let Some(f) = FilterExpr::parse(value) {
                        result.filters.push(f);
                    }
                }
                "sort" => {
                    if !value.is_empty() {
                        result.sort = Some(value.clone());
                    }
                }
                "order" => result.descending = parse_order(value)?,
                "limit" => result.limit = parse_number("limit", value)?,
                "offset" => result.offset = parse_number("offset", value)?,
                _ => {}
            }
        }

        Ok(result)
    }
}

fn parse_order(value: &str) -> RestResult<bool> {
    match value.to_lowercase().as_str() {
        "asc" | "" => Ok(false),
        "desc" => Ok(true),
        _ => Err(RestError::InvalidQueryParam(format!(
            "Invalid order direction: {}",
            value
        ))),
    }
}

fn parse_number(name: &str, value: &str) -> RestResult<usize> {
    value
        .parse()
        .map_err(|_| RestError::InvalidQueryParam(format!("Invalid {}: {}", name, value)))
}

//! # List Query Engine
//!
//! Search, filter, sort and paginate already-loaded records. All comparisons
//! are on the stored text.

use std::cmp::Ordering;

use crate::storage::Record;

use super::parser::QueryParams;
use super::response::ListResponse;

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Equals
    Eq,

    /// Not equals
    Ne,

    /// Substring match, case-insensitive
    Contains,
}

impl FilterOperator {
    pub fn parse(op: &str) -> Option<Self> {
        match op {
            "eq" => Some(FilterOperator::Eq),
            "ne" => Some(FilterOperator::Ne),
            "contains" => Some(FilterOperator::Contains),
            _ => None,
        }
    }
}

/// A `column:op:value` filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpr {
    pub column: String,
    pub operator: FilterOperator,
    pub value: String,
}

impl FilterExpr {
    pub fn new(column: impl Into<String>, operator: FilterOperator, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    /// Parses `column:op:value`. The value may itself contain `:`.
    /// Returns `None` for malformed text or unknown operators.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.splitn(3, ':');
        let column = parts.next()?;
        let op = FilterOperator::parse(parts.next()?)?;
        let value = parts.next()?;
        if column.is_empty() {
            return None;
        }
        Some(Self::new(column, op, value))
    }

    /// Missing fields compare as "".
    pub fn matches(&self, record: &Record) -> bool {
        let field = record.get(&self.column).map(String::as_str).unwrap_or("");
        match self.operator {
            FilterOperator::Eq => field == self.value,
            FilterOperator::Ne => field != self.value,
            FilterOperator::Contains => field.to_lowercase().contains(&self.value.to_lowercase()),
        }
    }
}

/// Records where any value contains `q`, case-insensitive. Blank `q` keeps all.
pub fn search(records: Vec<Record>, q: Option<&str>) -> Vec<Record> {
    let needle = match q {
        Some(q) if !q.is_empty() => q.to_lowercase(),
        _ => return records,
    };
    records
        .into_iter()
        .filter(|r| r.values().any(|v| v.to_lowercase().contains(&needle)))
        .collect()
}

/// Records matching every filter
pub fn filter(records: Vec<Record>, filters: &[FilterExpr]) -> Vec<Record> {
    records
        .into_iter()
        .filter(|r| filters.iter().all(|f| f.matches(r)))
        .collect()
}

/// Stable sort on the text of `column`; missing values sort as "".
pub fn sort(records: &mut [Record], column: &str, descending: bool) {
    records.sort_by(|a, b| {
        let ord = cmp_field(a, b, column);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
}

fn cmp_field(a: &Record, b: &Record, column: &str) -> Ordering {
    let av = a.get(column).map(String::as_str).unwrap_or("");
    let bv = b.get(column).map(String::as_str).unwrap_or("");
    av.cmp(bv)
}

pub fn paginate(records: Vec<Record>, limit: usize, offset: usize) -> Vec<Record> {
    records.into_iter().skip(offset).take(limit).collect()
}

/// Runs search, filters, sort and pagination. `total` counts matches before
/// pagination.
pub fn run_query(records: Vec<Record>, params: &QueryParams) -> ListResponse<Record> {
    let records = search(records, params.q.as_deref());
    let mut records = filter(records, &params.filters);
    if let Some(column) = &params.sort {
        sort(&mut records, column, params.descending);
    }
    let total = records.len();
    let items = paginate(records, params.limit, params.offset);
    ListResponse::new(items, total)
}

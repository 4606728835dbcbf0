//! # Response Formatting
//!
//! Standard response bodies for the REST API.

use serde::Serialize;

use crate::schema::Schema;

/// List response: one page plus the match count before pagination
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T: Serialize> ListResponse<T> {
    pub fn new(items: Vec<T>, total: usize) -> Self {
        Self { items, total }
    }
}

/// Inferred schema of one resource
#[derive(Debug, Clone, Serialize)]
pub struct SchemaResponse {
    pub schema: Schema,
}

impl SchemaResponse {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;
    use serde_json::json;

    #[test]
    fn test_list_response_serialization() {
        let response = ListResponse::new(vec![json!({"id": "1"}), json!({"id": "2"})], 7);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["total"], 7);
        assert_eq!(json["items"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_schema_response_serialization() {
        let mut schema = Schema::new();
        schema.insert("id", ColumnType::Integer);
        let json = serde_json::to_value(SchemaResponse::new(schema)).unwrap();
        assert_eq!(json, json!({"schema": {"id": "integer"}}));
    }
}

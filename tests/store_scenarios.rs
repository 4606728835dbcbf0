//! Record Store Scenario Tests
//!
//! End-to-end behaviour of a store over a real CSV file:
//! - key allocation on create
//! - merge semantics on update
//! - delete of absent keys
//! - schema caching and invalidation

use csv_server::schema::{validate_payload, ColumnType};
use csv_server::storage::{
    read_table, KeyPolicy, Record, RecordStore, SchemaCache, StoreError, StoreOptions,
};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn record(fields: &[(&str, &str)]) -> Record {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn users_file(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("users.csv");
    fs::write(&path, "id,name,age\n1,Alice,30\n2,Bob,25\n").unwrap();
    path
}

// =============================================================================
// Create
// =============================================================================

#[test]
fn test_create_assigns_next_key() {
    let temp = TempDir::new().unwrap();
    let store = RecordStore::new(users_file(temp.path()), "id");

    let created = store.create(record(&[("name", "Carol"), ("age", "41")])).unwrap();
    assert_eq!(created["id"], "3");
    assert_eq!(created["name"], "Carol");

    let table = read_table(store.path()).unwrap();
    assert_eq!(table.columns, vec!["id", "name", "age"]);
    assert_eq!(table.len(), 3);
    assert_eq!(table.records[2]["name"], "Carol");
}

#[test]
fn test_create_on_missing_file_starts_at_one() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("people.csv");
    let store = RecordStore::new(&path, "id");

    let created = store.create(record(&[("name", "Dana")])).unwrap();
    assert_eq!(created["id"], "1");

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text, "id,name\n1,Dana\n");
}

#[test]
fn test_create_skips_non_numeric_keys() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tags.csv");
    fs::write(&path, "id,label\nabc,x\n7,y\n").unwrap();
    let store = RecordStore::new(&path, "id");

    let created = store.create(record(&[("label", "z")])).unwrap();
    assert_eq!(created["id"], "8");
}

#[test]
fn test_create_above_widest_machine_integer_key() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("big.csv");
    fs::write(&path, "id,name\n170141183460469231731687303715884105727,a\n").unwrap();
    let store = RecordStore::new(&path, "id");

    let created = store.create(record(&[("name", "b")])).unwrap();
    assert_eq!(created["id"], "170141183460469231731687303715884105728");
}

#[test]
fn test_create_keeps_increasing_past_wide_keys() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("wide.csv");
    fs::write(
        &path,
        "id,name\n5,a\n99999999999999999999999999999999999999999,b\n",
    )
    .unwrap();
    let store = RecordStore::new(&path, "id");

    let created = store.create(record(&[("name", "c")])).unwrap();
    assert_eq!(created["id"], "100000000000000000000000000000000000000000");
}

#[test]
fn test_create_keeps_explicit_key() {
    let temp = TempDir::new().unwrap();
    let store = RecordStore::new(users_file(temp.path()), "id");

    let created = store
        .create(record(&[("id", "10"), ("name", "Eve"), ("age", "22")]))
        .unwrap();
    assert_eq!(created["id"], "10");

    let next = store.create(record(&[("name", "Finn")])).unwrap();
    assert_eq!(next["id"], "11");
}

#[test]
fn test_strict_policy_rejects_duplicate_key() {
    let temp = TempDir::new().unwrap();
    let options = StoreOptions {
        key_policy: KeyPolicy::Strict,
        ..StoreOptions::default()
    };
    let store = RecordStore::with_options(users_file(temp.path()), "id", options);

    let err = store
        .create(record(&[("id", "1"), ("name", "Clash")]))
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey { ref key } if key == "1"));
    assert_eq!(store.count().unwrap(), 2);
}

#[test]
fn test_create_with_new_column_rectangularizes_file() {
    let temp = TempDir::new().unwrap();
    let store = RecordStore::new(users_file(temp.path()), "id");

    store
        .create(record(&[("name", "Gus"), ("email", "gus@example.com")]))
        .unwrap();

    let table = read_table(store.path()).unwrap();
    assert_eq!(table.columns, vec!["id", "name", "age", "email"]);
    assert_eq!(table.records[0]["email"], "");
    assert_eq!(table.records[2]["age"], "");
}

// =============================================================================
// Update / Delete
// =============================================================================

#[test]
fn test_update_merges_and_pins_key() {
    let temp = TempDir::new().unwrap();
    let store = RecordStore::new(users_file(temp.path()), "id");

    let updated = store
        .update("2", record(&[("id", "99"), ("age", "26")]))
        .unwrap();
    assert_eq!(updated["id"], "2");
    assert_eq!(updated["name"], "Bob");
    assert_eq!(updated["age"], "26");

    assert!(matches!(store.get("99"), Err(StoreError::NotFound { .. })));
    assert_eq!(store.get("2").unwrap()["age"], "26");
}

#[test]
fn test_update_missing_key() {
    let temp = TempDir::new().unwrap();
    let store = RecordStore::new(users_file(temp.path()), "id");

    let err = store.update("42", record(&[("age", "1")])).unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[test]
fn test_delete_absent_key_leaves_file_untouched() {
    let temp = TempDir::new().unwrap();
    let path = users_file(temp.path());
    let before = fs::read(&path).unwrap();
    let store = RecordStore::new(&path, "id");

    assert_eq!(store.delete("99").unwrap(), 0);
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn test_delete_removes_every_match() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("dupes.csv");
    fs::write(&path, "id,v\n1,a\n2,b\n1,c\n").unwrap();
    let store = RecordStore::new(&path, "id");

    assert_eq!(store.delete("1").unwrap(), 2);
    let table = read_table(&path).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.records[0]["v"], "b");
}

// =============================================================================
// Schema
// =============================================================================

#[test]
fn test_schema_drives_validation() {
    let temp = TempDir::new().unwrap();
    let store = RecordStore::new(users_file(temp.path()), "id");

    let schema = store.schema().unwrap();
    assert_eq!(schema.get("age"), Some(ColumnType::Integer));
    assert_eq!(schema.get("name"), Some(ColumnType::String));

    let payload = validate_payload(&json!({"name": "Hal", "age": "31"}), &schema).unwrap();
    let created = store.create(payload).unwrap();
    assert_eq!(created["age"], "31");

    assert!(validate_payload(&json!({"age": "old"}), &schema).is_err());
}

#[test]
fn test_schema_cache_invalidated_by_create() {
    let temp = TempDir::new().unwrap();
    let store = RecordStore::new(users_file(temp.path()), "id");

    store.schema().unwrap();
    assert!(matches!(store.schema_cache(), SchemaCache::Cached(_)));

    store.create(record(&[("name", "Ivy"), ("age", "n/a")])).unwrap();
    assert_eq!(store.schema_cache(), SchemaCache::Unset);
}

#[test]
fn test_schema_cache_survives_update_without_new_columns() {
    let temp = TempDir::new().unwrap();
    let store = RecordStore::new(users_file(temp.path()), "id");

    store.schema().unwrap();
    store.update("1", record(&[("age", "31")])).unwrap();
    assert!(matches!(store.schema_cache(), SchemaCache::Cached(_)));

    store.update("1", record(&[("city", "Oslo")])).unwrap();
    assert_eq!(store.schema_cache(), SchemaCache::Unset);
    assert_eq!(store.schema().unwrap().get("city"), Some(ColumnType::String));
}

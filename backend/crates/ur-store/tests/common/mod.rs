#![allow(dead_code)]

use ur_store::{Record, RecordLocation, SqliteRecordStore};

use tempfile::TempDir;

pub fn test_location() -> RecordLocation {
    RecordLocation::new("identity-system", "user-registry")
}

/// A freshly built record holding one `users` field.
pub fn test_record(users: &str) -> Record {
    Record::new(test_location()).with_field("users", users)
}

/// File-backed store inside a temp dir; keep the dir alive for the test.
pub async fn create_file_store() -> (TempDir, SqliteRecordStore) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let store = SqliteRecordStore::connect(temp.path().join("nested/registry.db"))
        .await
        .expect("Failed to open SQLite store");
    (temp, store)
}

//! Behaviour every `RecordStore` must share, run against each implementation.

mod common;

use common::{create_file_store, test_location, test_record};

use ur_store::{
    CallContext, MemoryRecordStore, RecordStore, SqliteRecordStore, StoreError, VersionToken,
};

use googletest::prelude::*;

async fn stores() -> Vec<(&'static str, Box<dyn RecordStore>)> {
    vec![
        ("memory", Box::new(MemoryRecordStore::new())),
        (
            "sqlite",
            Box::new(
                SqliteRecordStore::in_memory()
                    .await
                    .expect("Failed to open in-memory SQLite store"),
            ),
        ),
    ]
}

#[tokio::test]
async fn given_empty_store_when_get_then_not_found() {
    for (name, store) in stores().await {
        // When
        let result = store.get(&CallContext::background(), &test_location()).await;

        // Then
        assert!(
            matches!(result, Err(StoreError::NotFound { .. })),
            "{name}: expected NotFound, got {result:?}"
        );
    }
}

#[tokio::test]
async fn given_new_record_when_created_then_get_returns_it_at_initial_version() {
    for (name, store) in stores().await {
        let ctx = CallContext::background();

        // When
        let created = store.create(&ctx, test_record("{}")).await.unwrap();
        let fetched = store.get(&ctx, &test_location()).await.unwrap();

        // Then
        assert_eq!(created.version, Some(VersionToken::INITIAL), "{name}");
        assert_eq!(fetched, created, "{name}");
        assert_that!(fetched.field("users"), some(eq("{}")));
    }
}

#[tokio::test]
async fn given_existing_record_when_created_again_then_already_exists() {
    for (name, store) in stores().await {
        let ctx = CallContext::background();
        store.create(&ctx, test_record("{}")).await.unwrap();

        // When
        let result = store.create(&ctx, test_record(r#"{"u1":"Alice"}"#)).await;

        // Then
        assert!(
            matches!(result, Err(StoreError::AlreadyExists { .. })),
            "{name}: expected AlreadyExists, got {result:?}"
        );
        let stored = store.get(&ctx, &test_location()).await.unwrap();
        assert_that!(stored.field("users"), some(eq("{}")));
    }
}

#[tokio::test]
async fn given_fresh_token_when_updated_then_version_advances() {
    for (name, store) in stores().await {
        let ctx = CallContext::background();
        let created = store.create(&ctx, test_record("{}")).await.unwrap();

        // When
        let updated = store
            .update(&ctx, created.clone().with_field("users", r#"{"u1":"Alice"}"#))
            .await
            .unwrap();

        // Then
        assert!(updated.version > created.version, "{name}");
        let stored = store.get(&ctx, &test_location()).await.unwrap();
        assert_eq!(stored, updated, "{name}");
    }
}

#[tokio::test]
async fn given_stale_token_when_updated_then_conflict_and_stored_record_unchanged() {
    for (name, store) in stores().await {
        let ctx = CallContext::background();
        let created = store.create(&ctx, test_record(r#"{"u1":"Alice"}"#)).await.unwrap();

        // Given: writer A and writer B both read the same version
        let reader_a = store.get(&ctx, &test_location()).await.unwrap();
        let reader_b = store.get(&ctx, &test_location()).await.unwrap();
        let b_written = store
            .update(
                &ctx,
                reader_b.with_field("users", r#"{"u1":"Alice","u2":"Bob"}"#),
            )
            .await
            .unwrap();

        // When: A writes with its stale token
        let result = store
            .update(&ctx, reader_a.with_field("users", r#"{"u1":"Alice2"}"#))
            .await;

        // Then
        match result {
            Err(StoreError::Conflict {
                expected, actual, ..
            }) => {
                assert_eq!(expected, created.version, "{name}");
                assert_eq!(Some(actual), b_written.version, "{name}");
            }
            other => panic!("{name}: expected Conflict, got {other:?}"),
        }
        let stored = store.get(&ctx, &test_location()).await.unwrap();
        assert_that!(stored.field("users"), some(eq(r#"{"u1":"Alice","u2":"Bob"}"#)));
    }
}

#[tokio::test]
async fn given_unversioned_record_when_updated_then_conflict() {
    for (name, store) in stores().await {
        let ctx = CallContext::background();
        store.create(&ctx, test_record("{}")).await.unwrap();

        // When
        let result = store.update(&ctx, test_record(r#"{"u1":"Alice"}"#)).await;

        // Then
        assert!(
            matches!(result, Err(StoreError::Conflict { expected: None, .. })),
            "{name}: expected Conflict, got {result:?}"
        );
    }
}

#[tokio::test]
async fn given_missing_record_when_updated_then_not_found() {
    for (name, store) in stores().await {
        let ctx = CallContext::background();
        let other = store.create(&ctx, test_record("{}")).await.unwrap();
        let mut elsewhere = other.clone();
        elsewhere.location.name = "somewhere-else".to_string();

        // When
        let result = store.update(&ctx, elsewhere).await;

        // Then
        assert!(
            matches!(result, Err(StoreError::NotFound { .. })),
            "{name}: expected NotFound, got {result:?}"
        );
    }
}

#[tokio::test]
async fn given_cancelled_context_when_get_then_cancelled() {
    for (name, store) in stores().await {
        let (ctx, handle) = CallContext::cancellable();
        handle.cancel();

        // When
        let result = store.get(&ctx, &test_location()).await;

        // Then
        assert!(
            matches!(result, Err(StoreError::Cancelled { .. })),
            "{name}: expected Cancelled, got {result:?}"
        );
    }
}

#[tokio::test]
async fn given_file_store_when_reopened_then_records_persist() {
    // Given
    let (temp, store) = create_file_store().await;
    let ctx = CallContext::background();
    let created = store.create(&ctx, test_record(r#"{"u1":"Alice"}"#)).await.unwrap();
    store.pool().close().await;

    // When
    let reopened = SqliteRecordStore::connect(temp.path().join("nested/registry.db"))
        .await
        .unwrap();
    let fetched = reopened.get(&ctx, &test_location()).await.unwrap();

    // Then
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn given_shared_memory_store_when_cloned_then_clones_see_same_records() {
    // Given
    let store = MemoryRecordStore::new();
    let clone = store.clone();

    // When
    store
        .create(&CallContext::background(), test_record("{}"))
        .await
        .unwrap();

    // Then
    assert_eq!(clone.len().await, 1);
    assert!(!clone.is_empty().await);
}

use crate::{
    CallContext, Record, RecordLocation, RecordStore, Result as StoreErrorResult, StoreError,
    VersionToken,
};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::sync::RwLock;

/// Process-local record store. Clones share the same records.
#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    records: Arc<RwLock<HashMap<RecordLocation, Record>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get(
        &self,
        ctx: &CallContext,
        location: &RecordLocation,
    ) -> StoreErrorResult<Record> {
        ctx.run("get", async {
            let records = self.records.read().await;
            records
                .get(location)
                .cloned()
                .ok_or_else(|| StoreError::not_found(location.clone()))
        })
        .await
    }

    async fn create(&self, ctx: &CallContext, record: Record) -> StoreErrorResult<Record> {
        ctx.run("create", async move {
            let mut records = self.records.write().await;

            if records.contains_key(&record.location) {
                warn!("Refusing to create {}: already exists", record.location);
                return Err(StoreError::already_exists(record.location));
            }

            let stored = Record {
                version: Some(VersionToken::INITIAL),
                ..record
            };
            records.insert(stored.location.clone(), stored.clone());
            debug!("Created {} at version {}", stored.location, VersionToken::INITIAL);

            Ok(stored)
        })
        .await
    }

    async fn update(&self, ctx: &CallContext, record: Record) -> StoreErrorResult<Record> {
        ctx.run("update", async move {
            let mut records = self.records.write().await;

            let current = records
                .get_mut(&record.location)
                .ok_or_else(|| StoreError::not_found(record.location.clone()))?;
            let actual = current.version.unwrap_or(VersionToken::INITIAL);

            if record.version != Some(actual) {
                warn!(
                    "Rejecting stale update of {}: expected {:?}, stored {}",
                    record.location, record.version, actual
                );
                return Err(StoreError::conflict(
                    record.location,
                    record.version,
                    actual,
                ));
            }

            let next = actual.next();
            *current = Record {
                version: Some(next),
                ..record
            };
            debug!("Updated {} to version {next}", current.location);

            Ok(current.clone())
        })
        .await
    }
}

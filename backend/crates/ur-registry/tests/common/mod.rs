#![allow(dead_code)]

use ur_registry::{CallContext, Record, RecordLocation, RecordStore, UserRegistry};
use ur_store::{MemoryRecordStore, Result as StoreErrorResult, StoreError};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

pub fn test_location() -> RecordLocation {
    RecordLocation::new("identity-system", "user-registry")
}

/// Memory store that counts calls and can be told to report the next few
/// `get`s as missing, which is what a caller losing the create race sees.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryRecordStore,
    gets: AtomicUsize,
    creates: AtomicUsize,
    updates: AtomicUsize,
    forced_misses: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn force_misses(&self, count: usize) {
        self.forced_misses.store(count, Ordering::SeqCst);
    }

    /// Seeds the backing record directly, bypassing the registry.
    pub async fn seed(&self, record: Record) -> Record {
        self.inner
            .create(&CallContext::background(), record)
            .await
            .expect("Failed to seed record")
    }

    pub async fn stored(&self) -> Record {
        self.inner
            .get(&CallContext::background(), &test_location())
            .await
            .expect("Backing record missing")
    }
}

#[async_trait]
impl RecordStore for CountingStore {
    async fn get(
        &self,
        ctx: &CallContext,
        location: &RecordLocation,
    ) -> StoreErrorResult<Record> {
        self.gets.fetch_add(1, Ordering::SeqCst);

        let forced = self
            .forced_misses
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if forced {
            return Err(StoreError::not_found(location.clone()));
        }

        self.inner.get(ctx, location).await
    }

    async fn create(&self, ctx: &CallContext, record: Record) -> StoreErrorResult<Record> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create(ctx, record).await
    }

    async fn update(&self, ctx: &CallContext, record: Record) -> StoreErrorResult<Record> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update(ctx, record).await
    }
}

/// Store whose backend is unreachable.
pub struct UnreachableStore;

#[async_trait]
impl RecordStore for UnreachableStore {
    async fn get(&self, _: &CallContext, _: &RecordLocation) -> StoreErrorResult<Record> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn create(&self, _: &CallContext, _: Record) -> StoreErrorResult<Record> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn update(&self, _: &CallContext, _: Record) -> StoreErrorResult<Record> {
        Err(StoreError::unavailable("connection refused"))
    }
}

pub fn counting_registry() -> (Arc<CountingStore>, UserRegistry) {
    let store = Arc::new(CountingStore::new());
    let registry = UserRegistry::new(store.clone(), test_location());
    (store, registry)
}

use crate::{CallContext, Record, RecordLocation, Result as StoreErrorResult};

use async_trait::async_trait;

/// Get/create/update of structured records addressed by namespace and name.
///
/// Implementations stamp a fresh [`crate::VersionToken`] on every record they
/// persist and refuse an update whose token does not match the stored one.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetches the record, or `StoreError::NotFound`.
    async fn get(
        &self,
        ctx: &CallContext,
        location: &RecordLocation,
    ) -> StoreErrorResult<Record>;

    /// Persists a new record, or `StoreError::AlreadyExists` if one is
    /// already stored at the same location. The incoming version is ignored.
    async fn create(&self, ctx: &CallContext, record: Record) -> StoreErrorResult<Record>;

    /// Replaces the stored record.
    ///
    /// Fails with `StoreError::Conflict` when `record.version` is missing or
    /// stale, and with `StoreError::NotFound` when nothing is stored at the
    /// location. A failed update leaves the stored record untouched.
    async fn update(&self, ctx: &CallContext, record: Record) -> StoreErrorResult<Record>;
}

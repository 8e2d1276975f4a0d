use crate::{Result as RegistryErrorResult, UserRegistry};

use ur_config::{Config, StoreBackend};
use ur_store::{CallContext, MemoryRecordStore, RecordLocation, RecordStore, SqliteRecordStore};

use std::sync::Arc;

use log::info;

/// Validates `config`, opens the configured store and returns a registry
/// bound to the configured backing record location.
pub async fn open(config: &Config) -> RegistryErrorResult<UserRegistry> {
    config.validate()?;

    let store: Arc<dyn RecordStore> = match config.store.backend {
        StoreBackend::Memory => Arc::new(MemoryRecordStore::new()),
        StoreBackend::Sqlite => Arc::new(SqliteRecordStore::connect(config.store_path()?).await?),
    };

    let location = RecordLocation::new(&config.registry.namespace, &config.registry.name);
    info!(
        "User registry bound to {location} on {} store",
        config.store.backend
    );

    Ok(UserRegistry::new(store, location))
}

/// A context carrying the configured per-call store timeout.
pub fn call_context(config: &Config) -> CallContext {
    CallContext::background().with_timeout(config.store.timeout())
}

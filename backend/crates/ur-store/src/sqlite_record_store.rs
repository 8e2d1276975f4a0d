//! Durable [`RecordStore`] on SQLite.
//!
//! Each record is one row keyed by `(namespace, name)`. The field map is kept
//! as JSON text and the version as an integer that every successful write
//! bumps by one. Updates are a compare-and-swap on that integer, so a writer
//! holding a stale token changes nothing and gets `StoreError::Conflict`.

use crate::{
    CallContext, Record, RecordLocation, RecordStore, Result as StoreErrorResult, StoreError,
    VersionToken,
};

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use log::{debug, info, warn};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

const MAX_CONNECTIONS: u32 = 5;

#[derive(Clone)]
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    /// Wraps an existing pool. The schema is assumed to be migrated.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if missing) the database file and applies the schema.
    pub async fn connect(path: impl AsRef<Path>) -> StoreErrorResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StoreError::unavailable(format!(
                    "Failed to create store directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        let store = Self::new(pool);
        store.migrate().await?;

        info!("Opened SQLite record store at {}", path.display());
        Ok(store)
    }

    /// Private in-memory database, alive as long as the store is.
    pub async fn in_memory() -> StoreErrorResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(":memory:")
            .create_if_missing(true);

        // In-memory needs single connection that is never recycled
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> StoreErrorResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn current_version(&self, location: &RecordLocation) -> StoreErrorResult<VersionToken> {
        let row = sqlx::query("SELECT version FROM ur_records WHERE namespace = ? AND name = ?")
            .bind(&location.namespace)
            .bind(&location.name)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => decode_version(location, row.try_get("version")?),
            None => Err(StoreError::not_found(location.clone())),
        }
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn get(
        &self,
        ctx: &CallContext,
        location: &RecordLocation,
    ) -> StoreErrorResult<Record> {
        ctx.run("get", async {
            let row = sqlx::query(
                r#"
                    SELECT fields_json, version
                    FROM ur_records
                    WHERE namespace = ? AND name = ?
                "#,
            )
            .bind(&location.namespace)
            .bind(&location.name)
            .fetch_optional(&self.pool)
            .await?;

            let Some(row) = row else {
                return Err(StoreError::not_found(location.clone()));
            };

            let fields_json: String = row.try_get("fields_json")?;
            let fields: BTreeMap<String, String> = serde_json::from_str(&fields_json)
                .map_err(|e| StoreError::corrupted(location.clone(), e.to_string()))?;

            Ok(Record {
                location: location.clone(),
                fields,
                version: Some(decode_version(location, row.try_get("version")?)?),
            })
        })
        .await
    }

    async fn create(&self, ctx: &CallContext, record: Record) -> StoreErrorResult<Record> {
        ctx.run("create", async move {
            let fields_json = serde_json::to_string(&record.fields)?;

            let result = sqlx::query(
                r#"
                    INSERT INTO ur_records (namespace, name, fields_json, version)
                    VALUES (?, ?, ?, ?)
                    ON CONFLICT(namespace, name) DO NOTHING
                "#,
            )
            .bind(&record.location.namespace)
            .bind(&record.location.name)
            .bind(&fields_json)
            .bind(encode_version(VersionToken::INITIAL))
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 0 {
                warn!("Refusing to create {}: already exists", record.location);
                return Err(StoreError::already_exists(record.location));
            }

            debug!("Created {} at version {}", record.location, VersionToken::INITIAL);
            Ok(Record {
                version: Some(VersionToken::INITIAL),
                ..record
            })
        })
        .await
    }

    async fn update(&self, ctx: &CallContext, record: Record) -> StoreErrorResult<Record> {
        ctx.run("update", async move {
            let Some(expected) = record.version else {
                let actual = self.current_version(&record.location).await?;
                warn!("Rejecting unversioned update of {}", record.location);
                return Err(StoreError::conflict(record.location, None, actual));
            };

            let fields_json = serde_json::to_string(&record.fields)?;

            let result = sqlx::query(
                r#"
                    UPDATE ur_records
                    SET fields_json = ?, version = version + 1
                    WHERE namespace = ? AND name = ? AND version = ?
                "#,
            )
            .bind(&fields_json)
            .bind(&record.location.namespace)
            .bind(&record.location.name)
            .bind(encode_version(expected))
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 0 {
                let actual = self.current_version(&record.location).await?;
                warn!(
                    "Rejecting stale update of {}: expected {expected}, stored {actual}",
                    record.location
                );
                return Err(StoreError::conflict(
                    record.location,
                    Some(expected),
                    actual,
                ));
            }

            let next = expected.next();
            debug!("Updated {} to version {next}", record.location);
            Ok(Record {
                version: Some(next),
                ..record
            })
        })
        .await
    }
}

fn encode_version(version: VersionToken) -> i64 {
    version.raw() as i64
}

#[track_caller]
fn decode_version(location: &RecordLocation, raw: i64) -> StoreErrorResult<VersionToken> {
    u64::try_from(raw)
        .map(VersionToken::from_raw)
        .map_err(|_| StoreError::corrupted(location.clone(), format!("negative version {raw}")))
}

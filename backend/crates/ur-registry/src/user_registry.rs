use crate::codec::{self, EMPTY_REGISTRY, REGISTRY_FIELD, UserMap};
use crate::{RegistryError, Result as RegistryErrorResult};

use ur_core::{UserIdentity, validate_user_id};
use ur_store::{CallContext, Record, RecordLocation, RecordStore, StoreError};

use std::sync::Arc;

use log::{debug, error, info};

/// Registry of user id to display name, persisted as one field of a single
/// backing record.
///
/// Every operation is at most one read (plus a create on first use) and one
/// write against the store. Writes carry the version observed on read, so a
/// concurrent update makes the later writer fail with
/// [`RegistryError::Conflict`] instead of overwriting. Nothing is retried
/// here; callers that retry should re-run the whole operation.
#[derive(Clone)]
pub struct UserRegistry {
    store: Arc<dyn RecordStore>,
    location: RecordLocation,
}

impl UserRegistry {
    pub fn new(store: Arc<dyn RecordStore>, location: RecordLocation) -> Self {
        Self { store, location }
    }

    pub fn location(&self) -> &RecordLocation {
        &self.location
    }

    /// Looks up one user by id.
    ///
    /// Fails with `InvalidArgument` for an empty id before touching the store,
    /// and with `NotFound` when the registry has no entry for `id`.
    pub async fn lookup_user(
        &self,
        ctx: &CallContext,
        id: &str,
    ) -> RegistryErrorResult<UserIdentity> {
        validate_user_id(id)?;

        let record = self.ensure_backing_record(ctx).await?;
        let users = self.decode_registry(&record)?;

        match users.get(id) {
            Some(display_name) => Ok(UserIdentity {
                id: id.to_string(),
                display_name: display_name.clone(),
            }),
            None => {
                error!("User not found in {}: {id}", self.location);
                Err(RegistryError::not_found(id))
            }
        }
    }

    /// All users, ordered by id.
    pub async fn list_users(&self, ctx: &CallContext) -> RegistryErrorResult<Vec<UserIdentity>> {
        let record = self.ensure_backing_record(ctx).await?;
        let users = self.decode_registry(&record)?;

        Ok(users
            .into_iter()
            .map(|(id, display_name)| UserIdentity { id, display_name })
            .collect())
    }

    /// Inserts `user`, replacing the display name if the id is already known.
    pub async fn save_user(
        &self,
        ctx: &CallContext,
        user: &UserIdentity,
    ) -> RegistryErrorResult<()> {
        let user = UserIdentity::new(user.id.as_str(), user.display_name.as_str())?;

        let record = self.ensure_backing_record(ctx).await?;
        let mut users = self.decode_registry(&record)?;

        let previous = users.insert(user.id.clone(), user.display_name.clone());
        self.write_registry(ctx, record, &users).await?;

        match previous {
            Some(old) => info!("Renamed user {} from {old:?} to {:?}", user.id, user.display_name),
            None => info!("Added user {}", user),
        }
        Ok(())
    }

    /// Removes a user and returns the identity that was stored.
    pub async fn remove_user(
        &self,
        ctx: &CallContext,
        id: &str,
    ) -> RegistryErrorResult<UserIdentity> {
        validate_user_id(id)?;

        let record = self.ensure_backing_record(ctx).await?;
        let mut users = self.decode_registry(&record)?;

        let Some(display_name) = users.remove(id) else {
            error!("Cannot remove unknown user from {}: {id}", self.location);
            return Err(RegistryError::not_found(id));
        };
        self.write_registry(ctx, record, &users).await?;

        info!("Removed user {id}");
        Ok(UserIdentity {
            id: id.to_string(),
            display_name,
        })
    }

    /// Fetches the backing record, creating it with an empty registry if it
    /// does not exist yet.
    ///
    /// The create is not retried: when another caller creates the record
    /// first, this fails with `AlreadyExists` and the caller should re-run
    /// its whole operation.
    pub async fn ensure_backing_record(&self, ctx: &CallContext) -> RegistryErrorResult<Record> {
        match self.store.get(ctx, &self.location).await {
            Ok(record) => Ok(record),
            Err(StoreError::NotFound { .. }) => {
                info!("Backing record {} not found, creating it", self.location);

                let initial =
                    Record::new(self.location.clone()).with_field(REGISTRY_FIELD, EMPTY_REGISTRY);

                self.store.create(ctx, initial).await.map_err(|e| {
                    error!("Failed to create backing record {}: {e}", self.location);
                    RegistryError::from(e)
                })
            }
            Err(e) => {
                error!("Failed to get backing record {}: {e}", self.location);
                Err(RegistryError::from(e))
            }
        }
    }

    /// Decodes the registry held in `record`. See [`codec::decode_registry`].
    pub fn decode_registry(&self, record: &Record) -> RegistryErrorResult<UserMap> {
        codec::decode_registry(record)
    }

    /// Replaces the registry field of `record` with the encoding of `users`
    /// and writes the record back using its version token.
    ///
    /// `record` must be one this registry read from the store: a record from
    /// another location, or one without a version token, is rejected with
    /// `InvalidState`. A stale token fails with `Conflict` and leaves the
    /// stored registry unchanged.
    pub async fn write_registry(
        &self,
        ctx: &CallContext,
        mut record: Record,
        users: &UserMap,
    ) -> RegistryErrorResult<Record> {
        if record.location != self.location {
            error!(
                "Refusing to write registry of {} into {}",
                self.location, record.location
            );
            return Err(RegistryError::invalid_state(format!(
                "record {} is not the backing record {}",
                record.location, self.location
            )));
        }

        if record.version.is_none() {
            error!("Refusing unversioned write of {}", self.location);
            return Err(RegistryError::invalid_state(format!(
                "record {} carries no version token",
                record.location
            )));
        }

        let encoded = codec::encode_registry(users)?;
        record.fields.insert(REGISTRY_FIELD.to_string(), encoded);

        match self.store.update(ctx, record).await {
            Ok(updated) => {
                debug!(
                    "Wrote {} users to {} (version {:?})",
                    users.len(),
                    self.location,
                    updated.version
                );
                Ok(updated)
            }
            // Deleted since it was read: same outcome as a stale token
            Err(e @ StoreError::NotFound { .. }) => {
                error!("Backing record {} vanished during write: {e}", self.location);
                Err(RegistryError::conflict(e))
            }
            Err(e) => {
                error!("Failed to write registry {}: {e}", self.location);
                Err(RegistryError::from(e))
            }
        }
    }
}

//! Conversion between the user map and the text stored in the backing
//! record's `users` field.
//!
//! The stored form is a compact JSON object of user id to display name, e.g.
//! `{"alice123":"Alice Smith"}`. Keys are emitted in sorted order, so
//! encoding is deterministic and `encode(decode(encode(m))) == encode(m)`.
//!
//! A field that exists but holds the empty string decodes to an empty map.
//! Provisioning always writes `{}`, so that state is logged as unusual rather
//! than rejected. A field that is missing altogether means the record was not
//! provisioned by this registry and is an error.

use crate::{RegistryError, Result as RegistryErrorResult};

use ur_store::Record;

use std::collections::BTreeMap;

use log::{error, warn};

/// Name of the record field holding the encoded registry.
pub const REGISTRY_FIELD: &str = "users";

/// Encoding of a registry with no users.
pub const EMPTY_REGISTRY: &str = "{}";

/// User id to display name.
pub type UserMap = BTreeMap<String, String>;

/// Decodes the registry held in `record`.
///
/// Returns either a complete map or an error, never a partial map.
pub fn decode_registry(record: &Record) -> RegistryErrorResult<UserMap> {
    let Some(raw) = record.field(REGISTRY_FIELD) else {
        error!(
            "Record {} has no `{REGISTRY_FIELD}` field",
            record.location
        );
        return Err(RegistryError::invalid_state(format!(
            "record {} has no `{REGISTRY_FIELD}` field",
            record.location
        )));
    };

    if raw.is_empty() {
        warn!(
            "Registry field `{REGISTRY_FIELD}` in {} is empty",
            record.location
        );
        return Ok(UserMap::new());
    }

    serde_json::from_str::<UserMap>(raw).map_err(|source| {
        error!(
            "Registry in {} is not valid JSON, content: {raw}, err: {source}",
            record.location
        );
        RegistryError::decode(raw, source)
    })
}

/// Encodes `users` in canonical form.
pub fn encode_registry(users: &UserMap) -> RegistryErrorResult<String> {
    serde_json::to_string(users).map_err(|source| {
        error!("Failed to encode registry of {} users: {source}", users.len());
        RegistryError::encode(source)
    })
}

use crate::{CoreError, Result as CoreErrorResult};

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A user known to the registry.
///
/// Two identities are the same user when their ids match; the display name is
/// presentation data and does not take part in equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub display_name: String,
}

impl UserIdentity {
    #[track_caller]
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> CoreErrorResult<Self> {
        let id = id.into();
        let display_name = display_name.into();

        validate_user_id(&id)?;
        if display_name.is_empty() {
            return Err(CoreError::validation(
                "display_name",
                "display name must not be empty",
            ));
        }

        Ok(Self { id, display_name })
    }
}

impl PartialEq for UserIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for UserIdentity {}

impl Hash for UserIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.display_name, self.id)
    }
}

/// Rejects empty user ids.
#[track_caller]
pub fn validate_user_id(id: &str) -> CoreErrorResult<()> {
    if id.is_empty() {
        return Err(CoreError::validation("id", "user id must not be empty"));
    }
    Ok(())
}

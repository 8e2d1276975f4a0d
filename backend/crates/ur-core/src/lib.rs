pub mod error;
pub mod user_identity;

pub use error::{CoreError, Result};
pub use error_location::ErrorLocation;
pub use user_identity::{UserIdentity, validate_user_id};

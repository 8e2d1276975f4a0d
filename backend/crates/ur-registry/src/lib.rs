pub mod codec;
pub mod error;
pub mod logger;
pub mod open;
pub mod user_registry;

pub use codec::{EMPTY_REGISTRY, REGISTRY_FIELD, UserMap, decode_registry, encode_registry};
pub use error::{RegistryError, Result};
pub use open::{call_context, open};
pub use user_registry::UserRegistry;

pub use ur_core::UserIdentity;
pub use ur_store::{CallContext, CancelHandle, Record, RecordLocation, RecordStore};

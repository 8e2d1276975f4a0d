pub mod call_context;
pub mod error;
pub mod memory_record_store;
pub mod record;
pub mod record_store;
pub mod sqlite_record_store;

pub use call_context::{CallContext, CancelHandle};
pub use error::{Result, StoreError};
pub use memory_record_store::MemoryRecordStore;
pub use record::{Record, RecordLocation, VersionToken};
pub use record_store::RecordStore;
pub use sqlite_record_store::SqliteRecordStore;

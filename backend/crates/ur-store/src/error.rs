use crate::{RecordLocation, VersionToken};

use std::panic::Location;
use std::time::Duration;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record not found: {record} {location}")]
    NotFound {
        record: RecordLocation,
        location: ErrorLocation,
    },

    #[error("Record already exists: {record} {location}")]
    AlreadyExists {
        record: RecordLocation,
        location: ErrorLocation,
    },

    #[error(
        "Conflict: record {record} was modified (expected version {expected:?}, current version {actual}) {location}"
    )]
    Conflict {
        record: RecordLocation,
        expected: Option<VersionToken>,
        actual: VersionToken,
        location: ErrorLocation,
    },

    #[error("Stored record {record} is corrupted: {message} {location}")]
    Corrupted {
        record: RecordLocation,
        message: String,
        location: ErrorLocation,
    },

    #[error("Store unavailable: {message} {location}")]
    Unavailable {
        message: String,
        location: ErrorLocation,
    },

    #[error("SQLx error: {source} {location}")]
    Sqlx {
        #[source]
        source: sqlx::Error,
        location: ErrorLocation,
    },

    #[error("Migration error: {source} {location}")]
    Migration {
        #[source]
        source: sqlx::migrate::MigrateError,
        location: ErrorLocation,
    },

    #[error("Failed to serialize record fields: {source} {location}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("{operation} cancelled by caller {location}")]
    Cancelled {
        operation: &'static str,
        location: ErrorLocation,
    },

    #[error("{operation} timed out after {timeout:?} {location}")]
    TimedOut {
        operation: &'static str,
        timeout: Duration,
        location: ErrorLocation,
    },
}

impl StoreError {
    /// Whether re-running the caller's whole read-modify-write may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::AlreadyExists { .. }
                | Self::Conflict { .. }
                | Self::Unavailable { .. }
                | Self::Sqlx { .. }
                | Self::TimedOut { .. }
        )
    }

    /// Creates NotFound error at caller location.
    #[track_caller]
    pub fn not_found(record: RecordLocation) -> Self {
        Self::NotFound {
            record,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Creates AlreadyExists error at caller location.
    #[track_caller]
    pub fn already_exists(record: RecordLocation) -> Self {
        Self::AlreadyExists {
            record,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Creates Conflict error at caller location.
    #[track_caller]
    pub fn conflict(
        record: RecordLocation,
        expected: Option<VersionToken>,
        actual: VersionToken,
    ) -> Self {
        Self::Conflict {
            record,
            expected,
            actual,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Creates Corrupted error at caller location.
    #[track_caller]
    pub fn corrupted(record: RecordLocation, message: impl Into<String>) -> Self {
        Self::Corrupted {
            record,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Creates Unavailable error at caller location.
    #[track_caller]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn cancelled(operation: &'static str) -> Self {
        Self::Cancelled {
            operation,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn timed_out(operation: &'static str, timeout: Duration) -> Self {
        Self::TimedOut {
            operation,
            timeout,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    #[track_caller]
    fn from(source: sqlx::Error) -> Self {
        Self::Sqlx {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    #[track_caller]
    fn from(source: sqlx::migrate::MigrateError) -> Self {
        Self::Migration {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Serialization {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

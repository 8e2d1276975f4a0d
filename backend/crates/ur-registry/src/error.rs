use ur_core::CoreError;
use ur_store::StoreError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Invalid argument: {message} {location}")]
    InvalidArgument {
        message: String,
        location: ErrorLocation,
    },

    #[error("User not found: {id} {location}")]
    NotFound { id: String, location: ErrorLocation },

    #[error("Backing record was created concurrently: {source} {location}")]
    AlreadyExists {
        #[source]
        source: StoreError,
        location: ErrorLocation,
    },

    #[error("Registry was modified concurrently: {source} {location}")]
    Conflict {
        #[source]
        source: StoreError,
        location: ErrorLocation,
    },

    #[error("Registry payload is not a JSON object of strings: {source}; content: {raw} {location}")]
    Decode {
        raw: String,
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("Failed to encode registry: {source} {location}")]
    Encode {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("Invalid registry state: {message} {location}")]
    InvalidState {
        message: String,
        location: ErrorLocation,
    },

    #[error("Storage unavailable: {source} {location}")]
    StorageUnavailable {
        #[source]
        source: StoreError,
        location: ErrorLocation,
    },

    #[error("Registry setup failed: {message} {location}")]
    Setup {
        message: String,
        location: ErrorLocation,
    },
}

impl RegistryError {
    /// Whether the caller may re-run the whole read-modify-write cycle.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::AlreadyExists { .. } | Self::Conflict { .. } => true,
            Self::StorageUnavailable { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::AlreadyExists { .. } => "ALREADY_EXISTS",
            Self::Conflict { .. } => "CONFLICT",
            Self::Decode { .. } => "DECODE_ERROR",
            Self::Encode { .. } => "ENCODE_ERROR",
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::StorageUnavailable { .. } => "STORAGE_UNAVAILABLE",
            Self::Setup { .. } => "SETUP_FAILED",
        }
    }

    /// Creates InvalidArgument error at caller location.
    #[track_caller]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Creates NotFound error at caller location.
    #[track_caller]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            id: id.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Creates Conflict error at caller location.
    #[track_caller]
    pub fn conflict(source: StoreError) -> Self {
        Self::Conflict {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Creates Decode error at caller location.
    #[track_caller]
    pub fn decode(raw: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            raw: raw.into(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Creates Encode error at caller location.
    #[track_caller]
    pub fn encode(source: serde_json::Error) -> Self {
        Self::Encode {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Creates InvalidState error at caller location.
    #[track_caller]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Creates Setup error at caller location.
    #[track_caller]
    pub fn setup(message: impl Into<String>) -> Self {
        Self::Setup {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<StoreError> for RegistryError {
    #[track_caller]
    fn from(source: StoreError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match source {
            StoreError::AlreadyExists { .. } => Self::AlreadyExists { source, location },
            StoreError::Conflict { .. } => Self::Conflict { source, location },
            _ => Self::StorageUnavailable { source, location },
        }
    }
}

impl From<CoreError> for RegistryError {
    #[track_caller]
    fn from(source: CoreError) -> Self {
        Self::invalid_argument(source.to_string())
    }
}

impl From<ur_config::ConfigError> for RegistryError {
    #[track_caller]
    fn from(source: ur_config::ConfigError) -> Self {
        Self::setup(source.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;

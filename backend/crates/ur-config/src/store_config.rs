use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_STORE_PATH, DEFAULT_STORE_TIMEOUT_SECS, StoreBackend,
};

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

pub const MIN_TIMEOUT_SECS: u64 = 1;
pub const MAX_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// SQLite file, relative to the config directory
    pub path: String,
    /// Per-call deadline applied to every store request
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: String::from(DEFAULT_STORE_PATH),
            timeout_secs: DEFAULT_STORE_TIMEOUT_SECS,
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.timeout_secs < MIN_TIMEOUT_SECS || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::store(format!(
                "store.timeout_secs must be {}-{}, got {}",
                MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS, self.timeout_secs
            )));
        }

        // Store path must not escape the config dir
        if self.backend == StoreBackend::Sqlite {
            if self.path.is_empty() {
                return Err(ConfigError::store("store.path must not be empty"));
            }
            if Path::new(&self.path).is_absolute() || self.path.contains("..") {
                return Err(ConfigError::store(
                    "store.path must be relative and cannot contain '..'",
                ));
            }
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

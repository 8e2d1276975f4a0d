mod config;
mod error;
mod log_level;
mod logging_config;
mod registry_config;
mod store_backend;
mod store_config;

pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use registry_config::RegistryConfig;
pub use store_backend::StoreBackend;
pub use store_config::StoreConfig;

#[cfg(test)]
mod tests;

const CONFIG_DIR_ENV: &str = "UR_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".ur";
const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_REGISTRY_NAMESPACE: &str = "identity-system";
const DEFAULT_REGISTRY_NAME: &str = "user-registry";

const DEFAULT_STORE_PATH: &str = "registry.db";
const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;

const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_COLORED: bool = true;

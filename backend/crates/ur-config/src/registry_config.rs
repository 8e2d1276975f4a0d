use crate::{ConfigError, ConfigErrorResult, DEFAULT_REGISTRY_NAME, DEFAULT_REGISTRY_NAMESPACE};

use serde::Deserialize;

pub const MAX_NAMESPACE_LENGTH: usize = 63;
pub const MAX_NAME_LENGTH: usize = 253;

/// Where the backing record lives. Fixed for the lifetime of a deployment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub namespace: String,
    pub name: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            namespace: String::from(DEFAULT_REGISTRY_NAMESPACE),
            name: String::from(DEFAULT_REGISTRY_NAME),
        }
    }
}

impl RegistryConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        validate_identifier("registry.namespace", &self.namespace, MAX_NAMESPACE_LENGTH, false)?;
        validate_identifier("registry.name", &self.name, MAX_NAME_LENGTH, true)?;
        Ok(())
    }
}

/// Lowercase alphanumerics and '-', plus '.' when `allow_dots`; must start
/// and end with an alphanumeric.
#[track_caller]
fn validate_identifier(
    key: &str,
    value: &str,
    max_length: usize,
    allow_dots: bool,
) -> ConfigErrorResult<()> {
    if value.is_empty() || value.len() > max_length {
        return Err(ConfigError::registry(format!(
            "{key} must be 1-{max_length} characters, got {}",
            value.len()
        )));
    }

    let valid_char =
        |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || (allow_dots && c == '.');
    if let Some(bad) = value.chars().find(|c| !valid_char(*c)) {
        return Err(ConfigError::registry(format!(
            "{key} contains invalid character '{bad}': {value}"
        )));
    }

    let alphanumeric = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    if !value.starts_with(alphanumeric) || !value.ends_with(alphanumeric) {
        return Err(ConfigError::registry(format!(
            "{key} must start and end with a letter or digit: {value}"
        )));
    }

    Ok(())
}

use crate::tests::{EnvGuard, setup_config_dir};
use crate::{Config, StoreBackend};

use std::str::FromStr;
use std::time::Duration;

use googletest::assert_that;
use googletest::prelude::{anything, eq, err, ok};
use serial_test::serial;

// =========================================================================
// Validation Tests - Store
// =========================================================================

#[test]
#[serial]
fn given_timeout_zero_when_validate_then_error() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _timeout = EnvGuard::set("UR_STORE_TIMEOUT_SECS", "0");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_timeout_over_max_when_validate_then_error() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _timeout = EnvGuard::set("UR_STORE_TIMEOUT_SECS", "301");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_sqlite_backend_with_parent_traversal_when_validate_then_error() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _backend = EnvGuard::set("UR_STORE_BACKEND", "sqlite");
    let _path = EnvGuard::set("UR_STORE_PATH", "../escape.db");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_sqlite_backend_with_absolute_path_when_validate_then_error() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _backend = EnvGuard::set("UR_STORE_BACKEND", "sqlite");
    let _path = EnvGuard::set("UR_STORE_PATH", "/var/lib/registry.db");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_memory_backend_with_unused_bad_path_when_validate_then_ok() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _path = EnvGuard::set("UR_STORE_PATH", "../ignored.db");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
fn given_backend_names_when_parsed_then_case_insensitive() {
    assert_that!(StoreBackend::from_str("SQLite").unwrap(), eq(StoreBackend::Sqlite));
    assert_that!(StoreBackend::from_str("memory").unwrap(), eq(StoreBackend::Memory));
    assert_that!(StoreBackend::from_str("etcd"), err(anything()));
}

#[test]
#[serial]
fn given_timeout_secs_when_timeout_then_duration_matches() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _timeout = EnvGuard::set("UR_STORE_TIMEOUT_SECS", "42");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.store.timeout(), eq(Duration::from_secs(42)));
}

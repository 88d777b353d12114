//! Support for library configuration options

use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;

/// Name of the backend table that holds the event records.
/// Feel free to override it when initing this library.
pub static TABLE_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("events".to_string())));

/// Path prefix under which the backend exposes its tables (PostgREST-style services usually use `/rest/v1`).
/// Feel free to override it when initing this library.
pub static REST_PREFIX: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("/rest/v1".to_string())));

/// Environment variable that holds the base URL of the backend
pub const ENV_URL: &str = "EVENTS_ADMIN_URL";
/// Environment variable that holds the API key of the backend
pub const ENV_KEY: &str = "EVENTS_ADMIN_KEY";
/// Environment variable that overrides [`TABLE_NAME`]
pub const ENV_TABLE: &str = "EVENTS_ADMIN_TABLE";
/// Environment variable that points to a local JSON store, to be used instead of the backend
pub const ENV_STORE: &str = "EVENTS_ADMIN_STORE";

/// Returns the current table name
pub fn table_name() -> String {
    match TABLE_NAME.lock() {
        Ok(name) => name.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Returns the current REST path prefix
pub fn rest_prefix() -> String {
    match REST_PREFIX.lock() {
        Ok(prefix) => prefix.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Overrides the table name
pub fn set_table_name<S: ToString>(name: S) {
    let name = name.to_string();
    match TABLE_NAME.lock() {
        Ok(mut current) => *current = name,
        Err(poisoned) => *poisoned.into_inner() = name,
    }
}

/// Overrides the REST path prefix
pub fn set_rest_prefix<S: ToString>(prefix: S) {
    let prefix = prefix.to_string();
    match REST_PREFIX.lock() {
        Ok(mut current) => *current = prefix,
        Err(poisoned) => *poisoned.into_inner() = prefix,
    }
}

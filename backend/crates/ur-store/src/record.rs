use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fixed `(namespace, name)` address of a record in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordLocation {
    pub namespace: String,
    pub name: String,
}

impl RecordLocation {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for RecordLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Optimistic-concurrency token stamped by the store on every create and
/// update. Callers treat it as opaque and hand it back unchanged on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionToken(u64);

impl VersionToken {
    pub const INITIAL: VersionToken = VersionToken(1);

    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub(crate) fn raw(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for VersionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A structured record: a free-form map of field name to string value.
///
/// `version` is `None` for records built locally and `Some` for every record
/// handed out by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub location: RecordLocation,
    pub fields: BTreeMap<String, String>,
    pub version: Option<VersionToken>,
}

impl Record {
    pub fn new(location: RecordLocation) -> Self {
        Self {
            location,
            fields: BTreeMap::new(),
            version: None,
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

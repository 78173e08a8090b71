//! Connection Records
//!
//! A [`ConnectionRecord`] is the normalized key/value view of one
//! environment's database configuration: always a `database` and an `adapter`
//! tag, optionally `username`/`user`, `password`, `host`, `port`, `socket`,
//! `encoding`, and arbitrary adapter-specific extras.
//!
//! # Ordering
//! Keys are stored in a `BTreeMap`, so iteration is always lexicographic.
//! The credential-file renderer relies on this for deterministic output.
//!
//! # Normalization
//! [`ConnectionRecord::normalize`] removes the `adapter` tag and folds the
//! `username` synonym into `user` (only when `user` is absent — an explicit
//! `user` is never overwritten). After normalization at most one of
//! `user`/`username` remains.

use std::collections::BTreeMap;

use crate::error::{DbPromptError, Result};

/// Record key holding the adapter tag
pub const ADAPTER_KEY: &str = "adapter";

/// Record key holding the database name
pub const DATABASE_KEY: &str = "database";

/// One environment's database configuration as a string map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionRecord {
    fields: BTreeMap<String, String>,
}

impl ConnectionRecord {
    /// Create an empty record
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a field value
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Set a field value, returning the previous value if any
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(key.into(), value.into())
    }

    /// Remove a field, returning its value if it was present
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.fields.remove(key)
    }

    /// The adapter tag, if present
    #[must_use]
    pub fn adapter(&self) -> Option<&str> {
        self.get(ADAPTER_KEY)
    }

    /// The database name, if present
    #[must_use]
    pub fn database(&self) -> Option<&str> {
        self.get(DATABASE_KEY)
    }

    /// Iterate fields in lexicographic key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields in the record
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate the record before dispatch
    ///
    /// The database name must be present, non-empty, and whitespace-free.
    /// Whitespace is disallowed because it cannot be safely embedded in a
    /// command line without quoting logic this tool deliberately omits.
    pub fn validate(&self) -> Result<()> {
        match self.database() {
            None => Err(DbPromptError::MissingDatabaseName),
            Some("") => Err(DbPromptError::EmptyDatabaseName),
            Some(name) if name.chars().any(char::is_whitespace) => {
                Err(DbPromptError::InvalidDatabaseName(name.to_string()))
            }
            Some(_) => Ok(()),
        }
    }

    /// Normalize the record for credential-file rendering
    ///
    /// Removes the `adapter` tag. If `user` is absent and `username` present,
    /// copies `username` into `user` and removes `username`; an explicit
    /// `user` always wins over the synonym.
    pub fn normalize(&mut self) {
        self.fields.remove(ADAPTER_KEY);
        if !self.fields.contains_key("user") {
            if let Some(username) = self.fields.remove("username") {
                self.fields.insert("user".to_string(), username);
            }
        } else {
            self.fields.remove("username");
        }
    }
}

impl FromIterator<(String, String)> for ConnectionRecord {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self { fields: iter.into_iter().collect() }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for ConnectionRecord {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }
}

//! Key-name translation for remote-control commands.
//!
//! The session layer treats key identifiers as opaque: callers submit a
//! human-meaningful name (`"VOLUP"`) and the [`KeyMap`] resolves it to the
//! payload string the television expects (`"KEY_VOLUP"`). Lookups are total
//! functions that fail with [`KeymapError::UnknownKeyCode`] — the only error
//! a key submission surfaces synchronously.

mod samsung;

use std::collections::HashMap;

use thiserror::Error;

/// Error type for key-name resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeymapError {
    /// The key identifier has no entry in the table.
    #[error("unknown key code: {0}")]
    UnknownKeyCode(String),
}

/// Flat mapping of key identifiers to device-specific wire payloads.
#[derive(Debug, Clone)]
pub struct KeyMap {
    entries: HashMap<String, String>,
}

impl KeyMap {
    /// Returns the built-in table covering the common Samsung remote keys.
    pub fn samsung_default() -> Self {
        Self::from_entries(samsung::DEFAULT_KEYS.iter().copied())
    }

    /// Builds a map from arbitrary `(name, payload)` pairs.
    ///
    /// Later duplicates of a name replace earlier ones.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Resolves a key identifier to its wire payload.
    ///
    /// # Errors
    ///
    /// Returns [`KeymapError::UnknownKeyCode`] when the identifier has no
    /// entry.
    pub fn resolve(&self, key: &str) -> Result<&str, KeymapError> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| KeymapError::UnknownKeyCode(key.to_string()))
    }

    /// `true` when the identifier has an entry.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

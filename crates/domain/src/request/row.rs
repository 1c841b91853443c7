//! Key-value rows for headers and query parameters

use serde::{Deserialize, Serialize};

/// An ordered key-value row used for headers and query parameters.
///
/// Supports enable/disable without deletion for UI convenience. Keys
/// need not be unique; disabled or blank-key rows are simply not
/// transmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueRow {
    /// The row key
    pub key: String,
    /// The row value
    pub value: String,
    /// Whether this row is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Optional description for documentation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

const fn default_enabled() -> bool {
    true
}

impl KeyValueRow {
    /// Creates a new enabled row.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled: true,
            description: None,
        }
    }

    /// Creates a disabled row.
    #[must_use]
    pub fn disabled(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled: false,
            description: None,
        }
    }

    /// Creates a blank row (the trailing editor placeholder).
    #[must_use]
    pub fn blank() -> Self {
        Self::new("", "")
    }

    /// Returns true if this row would be sent with the request.
    #[must_use]
    pub fn is_transmitted(&self) -> bool {
        self.enabled && !self.key.is_empty()
    }
}

impl Default for KeyValueRow {
    fn default() -> Self {
        Self::blank()
    }
}

/// An ordered collection of key-value rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowList {
    items: Vec<KeyValueRow>,
}

impl RowList {
    /// Creates an empty row list.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Adds a row to the list.
    pub fn add(&mut self, row: KeyValueRow) {
        self.items.push(row);
    }

    /// Returns an iterator over rows that would be transmitted.
    ///
    /// Disabled rows and rows with an empty key are filtered out; the
    /// auto-grow trailing blank row editors maintain is excluded here
    /// without any special casing.
    pub fn transmitted(&self) -> impl Iterator<Item = &KeyValueRow> {
        self.items.iter().filter(|r| r.is_transmitted())
    }

    /// Returns all rows (enabled and disabled).
    #[must_use]
    pub fn all(&self) -> &[KeyValueRow] {
        &self.items
    }

    /// Returns the number of rows.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no rows.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<KeyValueRow> for RowList {
    fn from_iter<T: IntoIterator<Item = KeyValueRow>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

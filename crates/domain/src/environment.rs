//! Environment and variable domain types

use serde::{Deserialize, Serialize};

use crate::id::generate_id;

/// A single environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVariable {
    /// Variable name, matched literally inside `{{ }}` delimiters
    pub key: String,
    /// Substitution value
    pub value: String,
    /// Whether this variable participates in resolution
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

impl EnvVariable {
    /// Creates a new enabled variable.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled: true,
        }
    }

    /// Creates a disabled variable.
    #[must_use]
    pub fn disabled(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled: false,
        }
    }
}

/// A named set of variables.
///
/// Variables are kept in declared order; resolution applies them
/// left-to-right, so ordering is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Unique identifier
    pub id: String,
    /// Environment name (e.g., "Development", "Production")
    pub name: String,
    /// Variables in declared order
    #[serde(default)]
    pub variables: Vec<EnvVariable>,
}

impl Environment {
    /// Creates a new empty environment with a generated id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            variables: Vec::new(),
        }
    }

    /// Appends a variable, preserving declaration order.
    pub fn push_variable(&mut self, variable: EnvVariable) {
        self.variables.push(variable);
    }

    /// Returns an iterator over variables that participate in
    /// resolution (enabled, non-empty key).
    pub fn active_variables(&self) -> impl Iterator<Item = &EnvVariable> {
        self.variables
            .iter()
            .filter(|v| v.enabled && !v.key.is_empty())
    }
}

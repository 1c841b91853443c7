//! Authentication configuration types

use serde::{Deserialize, Serialize};

/// Authentication configuration for a request.
///
/// Modeled as a sum type so that invalid combinations (a `basic` type
/// carrying a bearer payload, say) are unrepresentable. Credential
/// fields may contain `{{variable}}` tokens; resolution happens in the
/// application layer at send time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// No authentication
    #[default]
    None,
    /// Basic authentication
    Basic {
        /// Username (may contain variables)
        username: String,
        /// Password (may contain variables)
        password: String,
    },
    /// Bearer token authentication
    Bearer {
        /// The bearer token (may contain variables like `{{access_token}}`)
        token: String,
    },
    /// `OAuth2` with a user-supplied access token.
    ///
    /// Identical to `Bearer` at the wire level; the token is never
    /// fetched from an authorization server.
    #[serde(rename = "oauth2")]
    OAuth2 {
        /// The access token (may contain variables)
        access_token: String,
    },
}

impl AuthConfig {
    /// Returns true if authentication is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Creates a basic authentication.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates a bearer token authentication.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Creates an `OAuth2` authentication from a user-supplied token.
    #[must_use]
    pub fn oauth2(access_token: impl Into<String>) -> Self {
        Self::OAuth2 {
            access_token: access_token.into(),
        }
    }
}

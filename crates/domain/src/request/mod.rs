//! Request template types

mod method;
mod row;

pub use method::HttpMethod;
pub use row::{KeyValueRow, RowList};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::auth::AuthConfig;
use crate::error::{DomainError, DomainResult};
use crate::id::generate_id;

/// The protocol flavor of a request.
///
/// Controls which editor tabs and methods are valid: GraphQL requests
/// are POST-only and WebSocket requests carry no meaningful method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    /// Plain HTTP request
    #[default]
    Http,
    /// GraphQL request (always POST)
    Graphql,
    /// WebSocket connection (no method)
    Websocket,
}

impl RequestType {
    /// Returns whether the given method is valid for this request type.
    #[must_use]
    pub const fn allows_method(self, method: HttpMethod) -> bool {
        match self {
            Self::Http | Self::Websocket => true,
            Self::Graphql => matches!(method, HttpMethod::Post),
        }
    }

    /// Returns the default method for this request type.
    #[must_use]
    pub const fn default_method(self) -> HttpMethod {
        match self {
            Self::Http | Self::Websocket => HttpMethod::Get,
            Self::Graphql => HttpMethod::Post,
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Http => "http",
            Self::Graphql => "graphql",
            Self::Websocket => "websocket",
        };
        write!(f, "{s}")
    }
}

/// Body encoding for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BodyType {
    /// No body
    #[default]
    None,
    /// Raw JSON body
    Json,
    /// Form data body
    FormData,
}

/// A stored request template.
///
/// The `url`, header and parameter values, body, and auth credential
/// fields may all contain `{{variable}}` tokens that are substituted
/// from the active environment at send time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestTemplate {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Target URL (may contain `{{var}}` tokens)
    pub url: String,
    /// Query parameters
    #[serde(default)]
    pub params: RowList,
    /// Request headers
    #[serde(default)]
    pub headers: RowList,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Body encoding
    #[serde(default, rename = "bodyType")]
    pub body_type: BodyType,
    /// Raw body content
    #[serde(default)]
    pub body: String,
    /// When the request was last sent (history ordering)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_timestamp"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    /// Protocol flavor
    #[serde(default, rename = "requestType")]
    pub request_type: RequestType,
}

/// Accepts both RFC 3339 strings and the epoch-millisecond numbers
/// that older exported configurations carry for `timestamp`.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Rfc3339(DateTime<Utc>),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Millis(ms)) => DateTime::from_timestamp_millis(ms),
        Some(Raw::Rfc3339(ts)) => Some(ts),
    })
}

impl RequestTemplate {
    /// Creates a new GET request template with a generated id.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            method: HttpMethod::Get,
            url: url.into(),
            params: RowList::new(),
            headers: RowList::new(),
            auth: AuthConfig::None,
            body_type: BodyType::None,
            body: String::new(),
            timestamp: Some(Utc::now()),
            request_type: RequestType::Http,
        }
    }

    /// Sets the method.
    #[must_use]
    pub const fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the auth configuration.
    #[must_use]
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn with_json_body(mut self, body: impl Into<String>) -> Self {
        self.body_type = BodyType::Json;
        self.body = body.into();
        self
    }

    /// Validates that the method is allowed for the request type.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MethodNotAllowed`] when, for example, a
    /// GraphQL request is configured with anything other than POST.
    pub fn validate(&self) -> DomainResult<()> {
        if self.request_type.allows_method(self.method) {
            Ok(())
        } else {
            Err(DomainError::MethodNotAllowed {
                method: self.method.to_string(),
                request_type: self.request_type.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_request_defaults() {
        let req = RequestTemplate::new("Users", "https://api.example.com/users");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.body_type, BodyType::None);
        assert_eq!(req.request_type, RequestType::Http);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_graphql_forces_post() {
        let mut req = RequestTemplate::new("Query", "https://api.example.com/graphql");
        req.request_type = RequestType::Graphql;
        assert!(req.validate().is_err());

        req.method = HttpMethod::Post;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_request_type_default_method() {
        assert_eq!(RequestType::Http.default_method(), HttpMethod::Get);
        assert_eq!(RequestType::Graphql.default_method(), HttpMethod::Post);
    }

    #[test]
    fn test_timestamp_accepts_epoch_millis_and_rfc3339() {
        let from_millis: RequestTemplate = serde_json::from_str(
            r#"{"id":"r1","name":"R","method":"GET","url":"https://example.com","timestamp":1700000000000}"#,
        )
        .unwrap_or_else(|_| unreachable!("numeric timestamp must deserialize"));
        assert_eq!(
            from_millis.timestamp,
            DateTime::from_timestamp_millis(1_700_000_000_000)
        );

        let from_string: RequestTemplate = serde_json::from_str(
            r#"{"id":"r2","name":"R","method":"GET","url":"https://example.com","timestamp":"2023-11-14T22:13:20Z"}"#,
        )
        .unwrap_or_else(|_| unreachable!("RFC 3339 timestamp must deserialize"));
        assert_eq!(from_string.timestamp, from_millis.timestamp);

        let absent: RequestTemplate = serde_json::from_str(
            r#"{"id":"r3","name":"R","method":"GET","url":"https://example.com"}"#,
        )
        .unwrap_or_else(|_| unreachable!("absent timestamp must deserialize"));
        assert_eq!(absent.timestamp, None);
    }

    #[test]
    fn test_serde_field_names() {
        let req = RequestTemplate::new("R", "https://example.com").with_json_body("{}");
        let json = serde_json::to_value(&req).unwrap_or_default();
        assert_eq!(json["bodyType"], "json");
        assert_eq!(json["requestType"], "http");
        assert_eq!(json["method"], "GET");
    }
}

//! Relay client port
//!
//! Abstracts the transport to the loopback forwarding relay so the
//! dispatcher and runner can be exercised with mock transports.

use std::collections::HashMap;

use async_trait::async_trait;
use reqatlas_domain::HttpMethod;
use thiserror::Error;

/// A fully prepared request handed to the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    /// HTTP method to forward with
    pub method: HttpMethod,
    /// The true destination URL (carried in the `x-target-url` header)
    pub target_url: String,
    /// Resolved request headers
    pub headers: HashMap<String, String>,
    /// Resolved body; `None` for GET/HEAD
    pub body: Option<String>,
}

/// The raw response the relay streamed back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelayResponse {
    /// Status code as received (origin status, or the relay's gateway
    /// status on forwarding failure)
    pub status: u16,
    /// Canonical status text
    pub status_text: String,
    /// Response headers, lowercase names, duplicates collapsed
    pub headers: HashMap<String, String>,
    /// Opaque body bytes
    pub body: Vec<u8>,
}

impl RelayResponse {
    /// Returns the `content-type` header value, if present.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type").map(String::as_str)
    }
}

/// Failures reaching the relay itself.
///
/// Origin-side failures do not surface here: the relay reports those
/// as a gateway-status [`RelayResponse`]. This error means the local
/// relay process could not be reached or the exchange with it broke.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    /// The relay endpoint did not accept the connection.
    #[error("could not reach the local relay: {0}")]
    Unreachable(String),

    /// The exchange with the relay failed mid-flight.
    #[error("relay transport failure: {0}")]
    Transport(String),
}

/// Port for forwarding requests through the loopback relay.
#[async_trait]
pub trait RelayClient: Send + Sync {
    /// Forwards one request and returns the relayed response.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError`] only when the relay itself cannot be
    /// reached; origin failures come back as gateway-status responses.
    async fn forward(&self, request: RelayRequest) -> Result<RelayResponse, RelayError>;
}

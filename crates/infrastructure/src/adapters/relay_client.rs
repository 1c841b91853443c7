//! Relay client implementation using reqwest.
//!
//! This adapter implements the `RelayClient` port by sending every
//! prepared request to the loopback forwarding relay, with the true
//! destination carried in the `x-target-url` header.

use std::collections::HashMap;

use async_trait::async_trait;
use reqatlas_application::ports::{RelayClient, RelayError, RelayRequest, RelayResponse};
use reqatlas_domain::HttpMethod;
use reqwest::{Client, Method};

/// The default relay endpoint on the fixed loopback port.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3001/proxy";

/// Header carrying the true destination URL.
pub const TARGET_URL_HEADER: &str = "x-target-url";

/// Relay transport backed by `reqwest::Client`.
pub struct HttpRelayClient {
    client: Client,
    endpoint: String,
}

impl HttpRelayClient {
    /// Creates a client against the default loopback endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self, RelayError> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Creates a client against a custom relay endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, RelayError> {
        let client = Client::builder()
            .user_agent(concat!("ReqAtlas/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Converts the domain method to a reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
        }
    }

    fn map_error(error: &reqwest::Error) -> RelayError {
        if error.is_connect() {
            RelayError::Unreachable(error.to_string())
        } else {
            RelayError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl RelayClient for HttpRelayClient {
    async fn forward(&self, request: RelayRequest) -> Result<RelayResponse, RelayError> {
        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), &self.endpoint)
            .header(TARGET_URL_HEADER, &request.target_url);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| Self::map_error(&e))?;

        let status = response.status();
        // Flatten headers; duplicate names collapse to the last value
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    v.to_str().unwrap_or("<binary>").to_string(),
                )
            })
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| RelayError::Transport(format!("failed to read body: {e}")))?
            .to_vec();

        Ok(RelayResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn relay_request(m: HttpMethod, target: &str) -> RelayRequest {
        RelayRequest {
            method: m,
            target_url: target.to_string(),
            headers: HashMap::new(),
            body: None,
        }
    }

    #[test]
    fn test_method_mapping() {
        assert_eq!(
            HttpRelayClient::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            HttpRelayClient::to_reqwest_method(HttpMethod::Patch),
            Method::PATCH
        );
        assert_eq!(
            HttpRelayClient::to_reqwest_method(HttpMethod::Options),
            Method::OPTIONS
        );
    }

    #[tokio::test]
    async fn test_forward_carries_target_url_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/proxy"))
            .and(header(TARGET_URL_HEADER, "https://api.example.com/users"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(r#"{"ok":true}"#, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpRelayClient::with_endpoint(format!("{}/proxy", server.uri())).unwrap();
        let response = client
            .forward(relay_request(
                HttpMethod::Get,
                "https://api.example.com/users",
            ))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.status_text, "OK");
        assert_eq!(response.content_type(), Some("application/json"));
        assert_eq!(response.body, br#"{"ok":true}"#.to_vec());
    }

    #[tokio::test]
    async fn test_forward_sends_body_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/proxy"))
            .and(header("Authorization", "Bearer tok"))
            .and(body_string(r#"{"name":"x"}"#))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpRelayClient::with_endpoint(format!("{}/proxy", server.uri())).unwrap();
        let request = RelayRequest {
            method: HttpMethod::Post,
            target_url: "https://api.example.com/things".to_string(),
            headers: HashMap::from([("Authorization".to_string(), "Bearer tok".to_string())]),
            body: Some(r#"{"name":"x"}"#.to_string()),
        };

        let response = client.forward(request).await.unwrap();
        assert_eq!(response.status, 201);
    }

    #[tokio::test]
    async fn test_unreachable_relay_maps_to_unreachable() {
        // Nothing listens on this port
        let client = HttpRelayClient::with_endpoint("http://127.0.0.1:1/proxy").unwrap();
        let result = client
            .forward(relay_request(HttpMethod::Get, "https://example.com"))
            .await;

        assert!(matches!(result, Err(RelayError::Unreachable(_))));
    }
}

//! ReqAtlas Forwarding Relay
//!
//! A same-machine intermediary bound to a loopback port. The sandboxed
//! UI cannot issue cross-origin requests itself, so it sends every
//! request here with the true destination in the `x-target-url`
//! header; the relay re-issues it to the real origin and streams the
//! status, headers, and body back.

use std::net::SocketAddr;

use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Method, Response as HttpResponse, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

/// Header carrying the true destination URL.
pub const TARGET_URL_HEADER: &str = "x-target-url";

/// The fixed loopback port the relay listens on.
pub const DEFAULT_PORT: u16 = 3001;

/// Request headers never copied to the outbound request: the relay's
/// own framing plus the destination header itself.
const STRIPPED_REQUEST_HEADERS: [&str; 4] =
    ["host", "connection", "content-length", TARGET_URL_HEADER];

/// Shared relay state.
#[derive(Clone)]
struct RelayState {
    client: reqwest::Client,
}

/// Builds the relay router with a default outbound client.
#[must_use]
pub fn router() -> Router {
    router_with_client(reqwest::Client::new())
}

/// Builds the relay router with a custom outbound client.
#[must_use]
pub fn router_with_client(client: reqwest::Client) -> Router {
    Router::new()
        .route("/proxy", any(forward))
        // The relay asserts its own permissive cross-origin policy;
        // the origin's is stripped from forwarded responses.
        .layer(CorsLayer::permissive())
        .with_state(RelayState { client })
}

/// Binds the relay and serves until shutdown.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn run_server(addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "relay listening");
    axum::serve(listener, router()).await
}

/// Handles one forwarded request on `/proxy`, any method.
async fn forward(
    State(state): State<RelayState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(target) = headers
        .get(TARGET_URL_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
    else {
        tracing::warn!("rejected request without {TARGET_URL_HEADER} header");
        return (StatusCode::BAD_REQUEST, "Missing x-target-url header").into_response();
    };

    tracing::info!(%method, url = %target, "forwarding request");

    match proxy_to_origin(&state.client, &method, &headers, body, &target).await {
        Ok(response) => {
            tracing::info!(status = response.status().as_u16(), url = %target, "forwarded response");
            response
        }
        Err(error) => {
            tracing::error!(%error, url = %target, "forwarding failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "error": "Proxy Error",
                    "details": error.to_string(),
                    "target": target,
                })),
            )
                .into_response()
        }
    }
}

/// Re-issues the request to the real origin and maps the result back.
async fn proxy_to_origin(
    client: &reqwest::Client,
    method: &Method,
    headers: &HeaderMap,
    body: Bytes,
    target: &str,
) -> Result<Response, reqwest::Error> {
    let outbound_method = reqwest::Method::from_bytes(method.as_str().as_bytes())
        .unwrap_or(reqwest::Method::GET);

    let mut outbound = client.request(outbound_method, target);
    for (name, value) in headers {
        if STRIPPED_REQUEST_HEADERS.contains(&name.as_str()) {
            continue;
        }
        // Non-UTF8 header values are dropped rather than re-encoded
        if let Ok(value) = value.to_str() {
            outbound = outbound.header(name.as_str(), value);
        }
    }

    // Raw bytes pass through unmodified so any content type survives
    if *method != Method::GET && *method != Method::HEAD {
        outbound = outbound.body(body.to_vec());
    }

    let origin = outbound.send().await?;
    let status = origin.status().as_u16();

    let mut builder = HttpResponse::builder().status(status);
    for (name, value) in origin.headers() {
        let lower = name.as_str();
        // The payload is already decompressed by the outbound fetch,
        // and the relay asserts its own CORS policy.
        if lower.starts_with("access-control-")
            || lower == "content-encoding"
            || lower == "content-length"
        {
            continue;
        }
        builder = builder.header(lower, value.as_bytes());
    }

    let bytes = origin.bytes().await?;
    let response = builder
        .body(Body::from(bytes))
        .unwrap_or_else(|_| StatusCode::BAD_GATEWAY.into_response());
    Ok(response)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;
    use wiremock::matchers::{body_string, header, method as wm_method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn body_bytes(response: Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    #[tokio::test]
    async fn test_missing_target_header_is_rejected() {
        let app = router();
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/proxy")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_bytes(response).await;
        assert_eq!(body, b"Missing x-target-url header".to_vec());
    }

    #[tokio::test]
    async fn test_forwards_to_origin_and_passes_status_through() {
        let origin = MockServer::start().await;
        Mock::given(wm_method("GET"))
            .and(path("/users/1"))
            .and(header("x-custom", "kept"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_raw(r#"{"message":"Not Found"}"#, "application/json"),
            )
            .expect(1)
            .mount(&origin)
            .await;

        let app = router();
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/proxy")
                    .header(TARGET_URL_HEADER, format!("{}/users/1", origin.uri()))
                    .header("x-custom", "kept")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        let body = body_bytes(response).await;
        assert_eq!(body, br#"{"message":"Not Found"}"#.to_vec());
    }

    #[tokio::test]
    async fn test_destination_header_not_forwarded_to_origin() {
        let origin = MockServer::start().await;
        // The mock only matches requests *without* the destination
        // header; a forwarded x-target-url would leave it unmatched
        // and fail the expect(1) assertion.
        Mock::given(wm_method("GET"))
            .and(path("/"))
            .and(wiremock::matchers::header_exists(TARGET_URL_HEADER))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&origin)
            .await;
        Mock::given(wm_method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&origin)
            .await;

        let app = router();
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/proxy")
                    .header(TARGET_URL_HEADER, origin.uri())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_raw_body_passes_through_for_post() {
        let origin = MockServer::start().await;
        Mock::given(wm_method("POST"))
            .and(path("/items"))
            .and(body_string(r#"{"name":"atlas"}"#))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&origin)
            .await;

        let app = router();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/proxy")
                    .header(TARGET_URL_HEADER, format!("{}/items", origin.uri()))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"atlas"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_origin_cors_and_encoding_headers_stripped() {
        let origin = MockServer::start().await;
        Mock::given(wm_method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("access-control-allow-origin", "https://origin.example")
                    .insert_header("x-kept", "yes")
                    .set_body_string("ok"),
            )
            .mount(&origin)
            .await;

        let app = router();
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/proxy")
                    .header(TARGET_URL_HEADER, origin.uri())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // The origin's cross-origin policy must not leak through
        assert!(response.headers().get("access-control-allow-origin").is_none());
        assert_eq!(response.headers().get("x-kept").unwrap(), "yes");
    }

    #[tokio::test]
    async fn test_unreachable_origin_yields_gateway_error_naming_target() {
        let app = router();
        let target = "http://127.0.0.1:1/nothing-listens-here";
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/proxy")
                    .header(TARGET_URL_HEADER, target)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["error"], "Proxy Error");
        assert_eq!(body["target"], target);
        assert!(body["details"].as_str().is_some());
    }
}

//! Request dispatcher
//!
//! Orchestrates one logical send: resolve variables, build auth and
//! cookie headers, forward through the relay, classify the payload,
//! and record history, the response map, and console logs. Failures
//! are converted into a status-0 [`Response`]; nothing here returns an
//! error to the caller.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use reqatlas_domain::console::LogKind;
use reqatlas_domain::response::human_size;
use reqatlas_domain::{CookieJar, Environment, RequestTemplate, Response, ResponseBody, Workspace};
use serde_json::{Value, json};
use url::Url;

use crate::headers::{authorization_header, cookie_header};
use crate::ports::{RelayClient, RelayRequest, RelayResponse};
use crate::resolver::resolve;

/// A request after resolution and header building, ready to forward.
pub(crate) struct Prepared {
    /// The relay call payload.
    pub relay: RelayRequest,
    /// The cookie header that was attached, for console logging.
    pub cookie_header: Option<String>,
}

/// Resolves a template into a forwardable relay request.
///
/// Shared by the dispatcher and the collection runner so both follow
/// the exact same resolve → header-build pipeline.
pub(crate) fn prepare(
    request: &RequestTemplate,
    env: Option<&Environment>,
    cookies: &CookieJar,
) -> Prepared {
    let resolved_url = resolve(&request.url, env);
    let target_url = merge_params(&resolved_url, request, env);
    let cookie = cookie_header(&target_url, cookies);

    let mut headers: HashMap<String, String> = HashMap::new();
    for row in request.headers.transmitted() {
        headers.insert(row.key.clone(), resolve(&row.value, env));
    }
    if let Some(auth) = authorization_header(&request.auth, env) {
        headers.insert("Authorization".to_string(), auth);
    }
    if let Some(value) = &cookie {
        headers.insert("Cookie".to_string(), value.clone());
    }

    let body = request
        .method
        .forwards_body()
        .then(|| resolve(&request.body, env));

    Prepared {
        relay: RelayRequest {
            method: request.method,
            target_url,
            headers,
            body,
        },
        cookie_header: cookie,
    }
}

/// Appends transmitted query parameters to the resolved URL.
///
/// Fails open: an unparsable URL is forwarded as-is and the relay's
/// outbound fetch surfaces the failure.
fn merge_params(url: &str, request: &RequestTemplate, env: Option<&Environment>) -> String {
    let extra: Vec<(String, String)> = request
        .params
        .transmitted()
        .map(|row| (row.key.clone(), resolve(&row.value, env)))
        .collect();
    if extra.is_empty() {
        return url.to_string();
    }

    Url::parse(url).map_or_else(
        |_| url.to_string(),
        |mut parsed| {
            {
                let mut pairs = parsed.query_pairs_mut();
                for (key, value) in &extra {
                    pairs.append_pair(key, value);
                }
            }
            parsed.to_string()
        },
    )
}

pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Classifies a relayed payload into a structured [`Response`].
fn classify(relayed: RelayResponse, time: u64) -> Response {
    let is_image = relayed
        .content_type()
        .is_some_and(|ct| ct.contains("image/"));

    let data = if is_image {
        ResponseBody::Binary(relayed.body)
    } else {
        let text = String::from_utf8_lossy(&relayed.body).into_owned();
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text),
        }
    };

    Response {
        status: relayed.status,
        status_text: relayed.status_text,
        time,
        size: human_size(data.serialized_len()),
        headers: relayed.headers,
        data,
        is_image,
    }
}

/// The single-request send pipeline.
pub struct Dispatcher<C: RelayClient> {
    client: Arc<C>,
}

impl<C: RelayClient> Dispatcher<C> {
    /// Creates a dispatcher over the given relay transport.
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Sends one request and returns the structured result.
    ///
    /// Side effects on the workspace: the request is recorded in
    /// history (dedupe-and-promote) before the network call, console
    /// entries are emitted for the request, the response, or the
    /// failure, and the response map entry for the request id is
    /// overwritten. Transport failures come back as a status-0
    /// response; this method never fails.
    pub async fn send(&self, request: &RequestTemplate, workspace: &mut Workspace) -> Response {
        let start = Instant::now();
        let env = workspace.active_environment().cloned();
        let prepared = prepare(request, env.as_ref(), &workspace.cookies);
        let target = prepared.relay.target_url.clone();

        workspace.history.record(request.clone());
        workspace.log(
            LogKind::Request,
            format!("Sending {} to {}", request.method, target),
            Some(json!({
                "headers": prepared.relay.headers,
                "cookies": prepared.cookie_header.clone().unwrap_or_default(),
            })),
        );

        let response = match self.client.forward(prepared.relay).await {
            Ok(relayed) => {
                let response = classify(relayed, elapsed_ms(start));
                workspace.log(
                    LogKind::Response,
                    format!("Received response from {target}"),
                    Some(json!({
                        "status": response.status,
                        "time": response.time,
                        "headers": response.headers,
                    })),
                );
                response
            }
            Err(error) => {
                let time = elapsed_ms(start);
                workspace.log(LogKind::Error, format!("Request failed: {error}"), None);
                Response::transport_error(error.to_string(), time)
            }
        };

        workspace.store_response(request.id.clone(), response.clone());
        response
    }
}

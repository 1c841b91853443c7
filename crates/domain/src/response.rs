//! Response and run-result types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::request::HttpMethod;

/// Classified response payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    /// Body parsed successfully as JSON.
    Json(Value),
    /// Plain text body (including JSON that failed to parse).
    Text(String),
    /// Binary payload, kept as raw bytes for the UI to materialize
    /// (e.g. as an image blob).
    Binary(Vec<u8>),
}

impl ResponseBody {
    /// Returns the serialized length used for the size display.
    #[must_use]
    pub fn serialized_len(&self) -> usize {
        match self {
            Self::Json(value) => serde_json::to_string(value).map_or(0, |s| s.len()),
            Self::Text(text) => text.len(),
            Self::Binary(bytes) => bytes.len(),
        }
    }
}

impl Default for ResponseBody {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// The structured result of dispatching one request.
///
/// `status == 0` signals a transport-level failure (the relay or the
/// origin could not be reached at all), distinct from any HTTP status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code, or 0 for transport failure
    pub status: u16,
    /// Status text (e.g. "OK", or "Error" for transport failure)
    #[serde(rename = "statusText")]
    pub status_text: String,
    /// Elapsed time in milliseconds, measured dispatcher-side
    pub time: u64,
    /// Human-readable size string (e.g. "1.24 KB")
    pub size: String,
    /// Response headers, flattened; duplicate names collapsed
    pub headers: HashMap<String, String>,
    /// Classified payload
    pub data: ResponseBody,
    /// True when the content type indicated an image
    #[serde(rename = "isImage", default)]
    pub is_image: bool,
}

impl Response {
    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Synthesizes the transport-failure response for an error message.
    #[must_use]
    pub fn transport_error(message: impl Into<String>, time: u64) -> Self {
        let message = message.into();
        Self {
            status: 0,
            status_text: "Error".to_string(),
            time,
            size: "0 KB".to_string(),
            headers: HashMap::new(),
            data: ResponseBody::Json(serde_json::json!({ "error": message })),
            is_image: false,
        }
    }
}

/// Formats a payload length as the size string shown in the UI.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn human_size(bytes: usize) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

/// Per-request outcome summary produced by the collection runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// Id of the request that was run
    #[serde(rename = "requestId")]
    pub request_id: String,
    /// Request display name
    pub name: String,
    /// HTTP method used
    pub method: HttpMethod,
    /// Status code, or 0 for transport failure
    pub status: u16,
    /// Status text
    #[serde(rename = "statusText")]
    pub status_text: String,
    /// Elapsed time in milliseconds
    pub time: u64,
    /// True when the status was 2xx
    pub success: bool,
    /// Transport failure message, when status is 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated statistics over a collection run.
///
/// `failed` and `errors` are mutually exclusive: a row counts as
/// failed only when the origin actually responded with a non-2xx
/// status, and as an error when the origin was never reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of requests in the collection
    pub total: usize,
    /// Count of 2xx results
    pub passed: usize,
    /// Count of non-2xx results with a real status
    pub failed: usize,
    /// Count of transport failures (status 0)
    pub errors: usize,
    /// Mean elapsed time, rounded to the nearest millisecond
    #[serde(rename = "avgTime")]
    pub avg_time: u64,
}

impl RunSummary {
    /// Computes summary statistics over completed results.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_results(total: usize, results: &[RunResult]) -> Self {
        let passed = results.iter().filter(|r| r.success).count();
        let errors = results.iter().filter(|r| r.status == 0).count();
        let failed = results
            .iter()
            .filter(|r| !r.success && r.status != 0)
            .count();
        let avg_time = if results.is_empty() {
            0
        } else {
            let sum: u64 = results.iter().map(|r| r.time).sum();
            (sum as f64 / results.len() as f64).round() as u64
        };

        Self {
            total,
            passed,
            failed,
            errors,
            avg_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn result(status: u16, time: u64) -> RunResult {
        RunResult {
            request_id: "r".to_string(),
            name: "r".to_string(),
            method: HttpMethod::Get,
            status,
            status_text: String::new(),
            time,
            success: (200..300).contains(&status),
            error: None,
        }
    }

    #[test]
    fn test_success_range() {
        let mut r = Response::transport_error("boom", 1);
        assert!(!r.is_success());
        r.status = 200;
        assert!(r.is_success());
        r.status = 299;
        assert!(r.is_success());
        r.status = 300;
        assert!(!r.is_success());
    }

    #[test]
    fn test_transport_error_shape() {
        let r = Response::transport_error("connection refused", 42);
        assert_eq!(r.status, 0);
        assert_eq!(r.status_text, "Error");
        assert_eq!(r.size, "0 KB");
        assert!(r.headers.is_empty());
        assert_eq!(
            r.data,
            ResponseBody::Json(serde_json::json!({"error": "connection refused"}))
        );
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(1024), "1.00 KB");
        assert_eq!(human_size(1536), "1.50 KB");
        assert_eq!(human_size(0), "0.00 KB");
    }

    #[test]
    fn test_summary_categories_mutually_exclusive() {
        let results = vec![result(200, 100), result(0, 10), result(404, 50), result(201, 40)];
        let summary = RunSummary::from_results(4, &results);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.avg_time, 50);
    }

    #[test]
    fn test_summary_serde_field_names() {
        let summary = RunSummary::from_results(1, &[result(200, 7)]);
        let json = serde_json::to_value(summary).unwrap_or_default();
        assert_eq!(json["avgTime"], 7);
        assert_eq!(json["passed"], 1);
        assert!(json.get("avg_time").is_none());
    }

    #[test]
    fn test_summary_empty_results() {
        let summary = RunSummary::from_results(3, &[]);
        assert_eq!(summary.avg_time, 0);
        assert_eq!(summary.total, 3);
    }
}

//! Collection runner
//!
//! Runs every request in a collection strictly sequentially through
//! the same resolve → header-build → relay pipeline as the dispatcher,
//! capturing only summary fields. A failing request never aborts the
//! run, and there is no cancellation: once started, a run proceeds to
//! completion.

use std::sync::Arc;
use std::time::Instant;

use reqatlas_domain::{Collection, CookieJar, Environment, RunResult, RunSummary};

use crate::dispatcher::{elapsed_ms, prepare};
use crate::ports::RelayClient;

/// The outcome of a full collection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Per-request results in original collection order.
    pub results: Vec<RunResult>,
    /// Aggregated statistics over the completed results.
    pub summary: RunSummary,
}

/// The sequential multi-request batch executor.
pub struct CollectionRunner<C: RelayClient> {
    client: Arc<C>,
}

impl<C: RelayClient> CollectionRunner<C> {
    /// Creates a runner over the given relay transport.
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Runs every request in collection order.
    ///
    /// Requests run one at a time so per-request timing reflects real
    /// single-connection latency and progress is well-defined. After
    /// each request completes, `on_progress` receives
    /// `(completed / total) * 100`. Transport failures are recorded as
    /// `status = 0` results and the run continues. No history or
    /// response-map mutation happens here; the caller renders the
    /// report.
    #[allow(clippy::cast_precision_loss)]
    pub async fn run(
        &self,
        collection: &Collection,
        env: Option<&Environment>,
        cookies: &CookieJar,
        mut on_progress: impl FnMut(f64) + Send,
    ) -> RunReport {
        let total = collection.requests.len();
        let mut results = Vec::with_capacity(total);

        for (index, request) in collection.requests.iter().enumerate() {
            let start = Instant::now();
            let prepared = prepare(request, env, cookies);

            let result = match self.client.forward(prepared.relay).await {
                Ok(relayed) => RunResult {
                    request_id: request.id.clone(),
                    name: request.name.clone(),
                    method: request.method,
                    status: relayed.status,
                    status_text: relayed.status_text,
                    time: elapsed_ms(start),
                    success: (200..300).contains(&relayed.status),
                    error: None,
                },
                Err(error) => RunResult {
                    request_id: request.id.clone(),
                    name: request.name.clone(),
                    method: request.method,
                    status: 0,
                    status_text: "Error".to_string(),
                    time: elapsed_ms(start),
                    success: false,
                    error: Some(error.to_string()),
                },
            };
            results.push(result);
            on_progress(((index + 1) as f64 / total as f64) * 100.0);
        }

        let summary = RunSummary::from_results(total, &results);
        RunReport { results, summary }
    }
}

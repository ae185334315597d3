//! Prometheus metrics helpers for gistbin.
//!
//! # Usage
//!
//! ```rust,ignore
//! use gistbin_core::metrics::{init_metrics, start_metrics_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let handle = init_metrics();
//!     start_metrics_server(9091, handle).await.unwrap();
//! }
//! ```
//!
//! # Metric Naming Conventions
//!
//! - Prefix: subsystem (`gist_`, `rate_limited_`)
//! - Suffix: `_total` for counters
//! - Labels: only low-cardinality values (`reason`, `result`)

use axum::{Router, routing::get};
use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;

/// Initialize the Prometheus metrics recorder.
///
/// This must be called once at startup before any metrics are recorded.
///
/// # Panics
///
/// Panics if called more than once (the recorder can only be installed once).
pub fn init_metrics() -> PrometheusHandle {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    register_metrics();

    handle
}

/// Start the Prometheus metrics HTTP server.
///
/// Serves `/metrics` on the given port from a background task. The listener
/// is bound before returning so bind failures surface to the caller.
pub async fn start_metrics_server(
    port: u16,
    handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let app = Router::new().route(
        "/metrics",
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Metrics server listening on http://{}/metrics", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "metrics server stopped");
        }
    });

    Ok(())
}

/// Register descriptions for every metric gistbin records.
fn register_metrics() {
    describe_counter!("gist_create_total", "Gists successfully created");
    describe_counter!(
        "gist_create_failures_total",
        "Create requests that did not produce a gist (label: reason)"
    );
    describe_counter!(
        "gist_code_collisions_total",
        "Candidate codes that were already taken in their namespace"
    );
    describe_counter!(
        "gist_lookups_total",
        "Gist lookups by code (label: result = hit, cached, miss, error)"
    );
    describe_counter!(
        "rate_limited_total",
        "Create requests rejected by the per-client rate limiter"
    );
}

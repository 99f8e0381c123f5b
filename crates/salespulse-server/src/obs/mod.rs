//! Lightweight in-process metrics.
//!
//! Metrics are stored as atomics, updated by the request-tracking middleware
//! and the handlers, and rendered by the `/metrics` handler.

pub mod metrics;

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;

pub use metrics::ServerMetrics;

/// Count requests and their latency per matched route.
pub async fn track_requests(State(app): State<AppState>, req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let method = req.method().to_string();

    let metrics = app.metrics();
    metrics.http_in_flight.inc(&[("route", &route)]);
    let started = Instant::now();

    let resp = next.run(req).await;

    metrics.http_in_flight.dec(&[("route", &route)]);
    metrics
        .http_duration
        .observe(&[("route", &route)], started.elapsed());
    let status = resp.status().as_u16().to_string();
    metrics
        .http_requests
        .inc(&[("route", &route), ("method", &method), ("status", &status)]);

    resp
}

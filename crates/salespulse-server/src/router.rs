//! Axum router wiring.
//!
//! Query API under `/upload` and `/metrics/*`, operational endpoints at the
//! root. Request accounting runs as a route layer so `MatchedPath` is set.

use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use salespulse_core::error::Result;

use crate::{
    api::{metrics, upload},
    app_state::AppState,
    obs, ops,
};

pub fn build_router(state: AppState) -> Result<Router> {
    let max_upload = state.cfg().server.max_upload_bytes;
    let origins = state.cfg().server.cors_header_values()?;

    let mut app = Router::new()
        .route("/", get(ops::root))
        .route("/ping", get(ops::ping))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .route("/upload", post(upload::upload_sales_file))
        .route("/metrics/summary", get(metrics::summary))
        .route("/metrics/platform", get(metrics::platform))
        .route("/metrics/brand", get(metrics::brand))
        .route("/metrics/products", get(metrics::products))
        .route("/metrics/time", get(metrics::time))
        .route("/metrics/:category", get(metrics::by_name))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            obs::track_requests,
        ))
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http());

    if !origins.is_empty() {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers(Any),
        );
    }

    Ok(app.with_state(state))
}

//! `GET /metrics/*` handlers.
//!
//! Every handler takes one `Arc` snapshot of the dataset and runs the engine
//! on it. Without a dataset, `summary` answers with an all-zero summary and the
//! other categories answer with the `NoData` body.

use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use salespulse_core::error::SalesError;
use salespulse_core::metrics::SummaryMetrics;
use salespulse_core::{MetricCategory, MetricOptions, MetricReport};

use crate::api::error::ApiError;
use crate::app_state::AppState;

type MetricResult = Result<Json<MetricReport>, ApiError>;

#[derive(Debug, Default, Deserialize)]
pub struct MetricsQuery {
    /// Ranking size for products.
    pub top_n: Option<usize>,
}

pub async fn summary(State(app): State<AppState>) -> MetricResult {
    match compute(&app, MetricCategory::Summary, app.default_metric_options()).await {
        Err(ApiError(SalesError::NoData)) => Ok(Json(MetricReport::Summary(SummaryMetrics::zero()))),
        other => other,
    }
}

pub async fn platform(State(app): State<AppState>) -> MetricResult {
    compute(&app, MetricCategory::Platform, app.default_metric_options()).await
}

pub async fn brand(State(app): State<AppState>) -> MetricResult {
    compute(&app, MetricCategory::Brand, app.default_metric_options()).await
}

pub async fn time(State(app): State<AppState>) -> MetricResult {
    compute(&app, MetricCategory::Time, app.default_metric_options()).await
}

pub async fn products(State(app): State<AppState>, Query(q): Query<MetricsQuery>) -> MetricResult {
    let mut opts = app.default_metric_options();
    if let Some(n) = q.top_n {
        let max = app.cfg().metrics.max_top_n;
        if n > max {
            return Err(SalesError::BadRequest(format!("top_n must not exceed {max}")).into());
        }
        opts.top_n = n;
    }
    compute(&app, MetricCategory::Products, opts).await
}

/// `GET /metrics/:category` for alias names (`brands`, `product`).
pub async fn by_name(
    State(app): State<AppState>,
    Path(name): Path<String>,
    query: Query<MetricsQuery>,
) -> MetricResult {
    match name.parse::<MetricCategory>()? {
        MetricCategory::Summary => summary(State(app)).await,
        MetricCategory::Platform => platform(State(app)).await,
        MetricCategory::Brand => brand(State(app)).await,
        MetricCategory::Time => time(State(app)).await,
        MetricCategory::Products => products(State(app), query).await,
    }
}

async fn compute(app: &AppState, category: MetricCategory, opts: MetricOptions) -> MetricResult {
    let metrics = app.metrics();
    let labels = [("category", category.as_str())];

    let Some(dataset) = app.store().snapshot().await else {
        metrics.no_data_requests.inc(&labels);
        return Err(SalesError::NoData.into());
    };

    let started = Instant::now();
    let report = category.compute(&dataset, &opts);
    metrics.compute_duration.observe(&labels, started.elapsed());

    match report {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            metrics
                .metric_errors
                .inc(&[("category", category.as_str()), ("code", e.client_code().as_str())]);
            tracing::warn!(%category, error = %e, "metric computation failed");
            Err(e.into())
        }
    }
}

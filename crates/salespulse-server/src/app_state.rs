//! Shared application state for the SalesPulse server.
//!
//! Handlers receive the dataset slot through this state (context passing);
//! there is no process-global dataset.

use std::sync::Arc;

use salespulse_core::error::Result;
use salespulse_core::MetricOptions;

use crate::config::AppConfig;
use crate::obs::ServerMetrics;
use crate::store::{DatasetStore, MemoryDatasetStore};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    store: Arc<dyn DatasetStore>,
    metrics: Arc<ServerMetrics>,
}

struct AppStateInner {
    cfg: AppConfig,
}

impl AppState {
    /// Build application state with an empty in-memory dataset slot.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: AppConfig) -> Result<Self> {
        Self::with_store(cfg, Arc::new(MemoryDatasetStore::new()))
    }

    pub fn with_store(cfg: AppConfig, store: Arc<dyn DatasetStore>) -> Result<Self> {
        cfg.validate()?;

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg }),
            store,
            metrics: Arc::new(ServerMetrics::default()),
        })
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.inner.cfg
    }

    pub fn store(&self) -> &dyn DatasetStore {
        self.store.as_ref()
    }

    pub fn metrics(&self) -> Arc<ServerMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Engine options with configured defaults.
    pub fn default_metric_options(&self) -> MetricOptions {
        MetricOptions {
            top_n: self.cfg().metrics.default_top_n,
        }
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }

    pub fn set_draining(&self) {
        self.metrics.set_draining();
    }

    /// Dataset gauges appended to the `/metrics` output.
    pub async fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        let snapshot = self.store.snapshot().await;
        let (loaded, rows, orders) = match &snapshot {
            Some(ds) => (1, ds.row_count() as u64, ds.orders().len() as u64),
            None => (0, 0, 0),
        };
        vec![
            ("salespulse_dataset_loaded", loaded),
            ("salespulse_dataset_rows", rows),
            ("salespulse_dataset_orders", orders),
            ("salespulse_dataset_generation", self.store.generation()),
        ]
    }
}

use serde::Serialize;

use super::series::{ratio, round2};
use crate::dataset::SalesDataset;

/// Headline KPIs over all cleaned orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total_revenue: f64,
    pub total_orders: u64,
    /// Average order value.
    pub aov: f64,
    pub total_units: i64,
    pub avg_items_per_order: f64,
}

impl SummaryMetrics {
    /// All-zero summary, served before the first upload.
    pub fn zero() -> Self {
        Self::default()
    }
}

pub fn summary_metrics(dataset: &SalesDataset) -> SummaryMetrics {
    let orders = dataset.orders();
    let total_revenue: f64 = orders.iter().map(|o| o.revenue).sum();
    let total_units: f64 = orders.iter().map(|o| o.quantity).sum();
    let total_orders = orders.len() as f64;

    SummaryMetrics {
        total_revenue: round2(total_revenue),
        total_orders: orders.len() as u64,
        aov: round2(ratio(total_revenue, total_orders)),
        // Truncates fractional quantities; saturates at the i64 bounds.
        total_units: total_units as i64,
        avg_items_per_order: round2(ratio(total_units, total_orders)),
    }
}

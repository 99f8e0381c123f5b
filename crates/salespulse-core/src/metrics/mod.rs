//! Metrics engine.
//!
//! Five pure functions over a cleaned `SalesDataset`:
//! - `summary_metrics`: totals, AOV, units per order
//! - `platform_metrics`: per-platform revenue, orders, AOV, units per order
//! - `brand_metrics`: brand revenue/units rankings and revenue share
//! - `time_metrics`: monthly revenue with MoM / YoY growth
//! - `product_metrics`: top-N products by revenue and by units
//!
//! Every ratio is guarded with an explicit branch, so results never carry
//! NaN or infinity into JSON.

pub mod brand;
pub mod platform;
pub mod products;
pub mod series;
pub mod summary;
pub mod time;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::dataset::SalesDataset;
use crate::error::{Result, SalesError};

pub use brand::{brand_metrics, BrandMetrics};
pub use platform::{platform_metrics, PlatformMetrics};
pub use products::{product_metrics, ProductMetrics, DEFAULT_TOP_N};
pub use series::Series;
pub use summary::{summary_metrics, SummaryMetrics};
pub use time::{time_metrics, TimeMetrics};

/// Requested metric family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricCategory {
    Summary,
    Platform,
    Brand,
    Products,
    Time,
}

impl MetricCategory {
    pub const ALL: [MetricCategory; 5] = [
        MetricCategory::Summary,
        MetricCategory::Platform,
        MetricCategory::Brand,
        MetricCategory::Products,
        MetricCategory::Time,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetricCategory::Summary => "summary",
            MetricCategory::Platform => "platform",
            MetricCategory::Brand => "brand",
            MetricCategory::Products => "products",
            MetricCategory::Time => "time",
        }
    }

    /// Run the engine for this category.
    pub fn compute(self, dataset: &SalesDataset, opts: &MetricOptions) -> Result<MetricReport> {
        Ok(match self {
            MetricCategory::Summary => MetricReport::Summary(summary_metrics(dataset)),
            MetricCategory::Platform => MetricReport::Platform(platform_metrics(dataset)?),
            MetricCategory::Brand => MetricReport::Brand(brand_metrics(dataset)?),
            MetricCategory::Products => {
                MetricReport::Products(product_metrics(dataset, opts.top_n)?)
            }
            MetricCategory::Time => MetricReport::Time(time_metrics(dataset)?),
        })
    }
}

impl fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricCategory {
    type Err = SalesError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "summary" => Ok(MetricCategory::Summary),
            "platform" => Ok(MetricCategory::Platform),
            "brand" | "brands" => Ok(MetricCategory::Brand),
            "products" | "product" => Ok(MetricCategory::Products),
            "time" => Ok(MetricCategory::Time),
            other => Err(SalesError::BadRequest(format!("unknown metric category: {other}"))),
        }
    }
}

/// Per-request knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricOptions {
    /// Ranking size for `products`.
    pub top_n: usize,
}

impl Default for MetricOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// Result of one category; serializes as the bare metric object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricReport {
    Summary(SummaryMetrics),
    Platform(PlatformMetrics),
    Brand(BrandMetrics),
    Products(ProductMetrics),
    Time(TimeMetrics),
}

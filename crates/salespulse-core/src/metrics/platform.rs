use serde::Serialize;

use super::series::{group_by, ratio, round2, Series};
use crate::dataset::{Dimension, SalesDataset};
use crate::error::Result;

/// Per-platform revenue, order count, AOV and units per order.
/// Every series is keyed by platform in ascending order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformMetrics {
    pub revenue_by_platform: Series<f64>,
    pub orders_by_platform: Series<u64>,
    pub aov_by_platform: Series<f64>,
    pub units_per_order_by_platform: Series<f64>,
}

pub fn platform_metrics(dataset: &SalesDataset) -> Result<PlatformMetrics> {
    let groups = group_by(dataset, Dimension::Platform)?;

    let mut out = PlatformMetrics {
        revenue_by_platform: Series::new(),
        orders_by_platform: Series::new(),
        aov_by_platform: Series::new(),
        units_per_order_by_platform: Series::new(),
    };

    // groups only hold keys with at least one order
    for (platform, g) in groups {
        let orders = g.orders as f64;
        out.revenue_by_platform.push(platform.clone(), round2(g.revenue));
        out.orders_by_platform.push(platform.clone(), g.orders);
        out.aov_by_platform.push(platform.clone(), round2(ratio(g.revenue, orders)));
        out.units_per_order_by_platform.push(platform, round2(ratio(g.units, orders)));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use bytes::Bytes;

    use super::*;
    use crate::loader::load_sales_file;

    #[test]
    fn grouped_by_platform() {
        let csv = "Platform,Quantity,Price\nWeb,2,10\nApp,1,5\nWeb,3,1\nWeb,bad,1\n";
        let ds = load_sales_file("s.csv", Bytes::from(csv)).unwrap();
        let m = platform_metrics(&ds).unwrap();

        assert_eq!(m.revenue_by_platform.keys().collect::<Vec<_>>(), vec!["App", "Web"]);
        assert_eq!(m.revenue_by_platform.get("Web"), Some(&23.0));
        assert_eq!(m.orders_by_platform.get("Web"), Some(&2));
        assert_eq!(m.aov_by_platform.get("Web"), Some(&11.5));
        assert_eq!(m.units_per_order_by_platform.get("Web"), Some(&2.5));
        assert_eq!(m.aov_by_platform.get("App"), Some(&5.0));
    }

    #[test]
    fn missing_platform_column() {
        let ds = load_sales_file("s.csv", Bytes::from("Quantity,Price\n1,1\n")).unwrap();
        let err = platform_metrics(&ds).unwrap_err();
        assert_eq!(err.to_string(), "missing required column: Platform");
    }
}

use serde::Serialize;

use super::series::{group_by, ranked, round2, Series};
use crate::dataset::{Dimension, SalesDataset};
use crate::error::Result;

/// Brand rankings. Revenue and share follow revenue order; units has its own order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandMetrics {
    pub revenue_by_brand: Series<f64>,
    pub units_by_brand: Series<f64>,
    /// Percent of total brand revenue; all 0 when that total is 0.
    pub revenue_share_by_brand: Series<f64>,
}

pub fn brand_metrics(dataset: &SalesDataset) -> Result<BrandMetrics> {
    let groups = group_by(dataset, Dimension::Brand)?;
    let total_revenue: f64 = groups.values().map(|g| g.revenue).sum();

    let mut revenue_order: Vec<(&String, f64)> =
        groups.iter().map(|(k, g)| (k, g.revenue)).collect();
    revenue_order.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut revenue_by_brand = Series::new();
    let mut revenue_share_by_brand = Series::new();
    for (brand, revenue) in revenue_order {
        let share = if total_revenue == 0.0 {
            0.0
        } else {
            revenue / total_revenue * 100.0
        };
        revenue_by_brand.push(brand.clone(), round2(revenue));
        revenue_share_by_brand.push(brand.clone(), round2(share));
    }

    Ok(BrandMetrics {
        revenue_by_brand,
        units_by_brand: ranked(&groups, |g| g.units, None),
        revenue_share_by_brand,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use bytes::Bytes;

    use super::*;
    use crate::loader::load_sales_file;

    #[test]
    fn revenue_and_units_rank_independently() {
        let csv = "Brand,Quantity,Price\nAcme,1,100\nZed,10,2\nAcme,1,50\n";
        let ds = load_sales_file("s.csv", Bytes::from(csv)).unwrap();
        let m = brand_metrics(&ds).unwrap();

        assert_eq!(m.revenue_by_brand.keys().collect::<Vec<_>>(), vec!["Acme", "Zed"]);
        assert_eq!(m.units_by_brand.keys().collect::<Vec<_>>(), vec!["Zed", "Acme"]);
        assert_eq!(m.revenue_by_brand.get("Acme"), Some(&150.0));
        assert_eq!(m.revenue_share_by_brand.get("Acme"), Some(&88.24));
        assert_eq!(m.revenue_share_by_brand.get("Zed"), Some(&11.76));
    }

    #[test]
    fn zero_total_revenue_gives_zero_shares() {
        let csv = "Brand,Quantity,Price\nAcme,0,100\nZed,3,0\n";
        let ds = load_sales_file("s.csv", Bytes::from(csv)).unwrap();
        let m = brand_metrics(&ds).unwrap();
        assert_eq!(m.revenue_share_by_brand.len(), 2);
        assert!(m.revenue_share_by_brand.values().all(|v| *v == 0.0));
    }
}

use serde::Serialize;

use super::series::{group_by, ranked, Series};
use crate::dataset::{Dimension, SalesDataset};
use crate::error::Result;

/// Default size of the product rankings.
pub const DEFAULT_TOP_N: usize = 10;

/// Top products by revenue and, independently, by units sold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductMetrics {
    pub top_products_by_revenue: Series<f64>,
    pub top_products_by_units: Series<f64>,
}

/// Rank products; ties keep ascending product-name order.
pub fn product_metrics(dataset: &SalesDataset, top_n: usize) -> Result<ProductMetrics> {
    let groups = group_by(dataset, Dimension::ProductName)?;
    Ok(ProductMetrics {
        top_products_by_revenue: ranked(&groups, |g| g.revenue, Some(top_n)),
        top_products_by_units: ranked(&groups, |g| g.units, Some(top_n)),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use bytes::Bytes;

    use super::*;
    use crate::loader::load_sales_file;

    const CSV: &str = "Product_Name,Quantity,Price\n\
        Kettle,1,40\n\
        Toaster,2,25\n\
        Mug,12,3\n\
        Kettle,1,40\n\
        Spoon,30,1\n";

    #[test]
    fn top_n_by_revenue_and_units() {
        let ds = load_sales_file("s.csv", Bytes::from(CSV)).unwrap();
        let m = product_metrics(&ds, 2).unwrap();

        assert_eq!(m.top_products_by_revenue.keys().collect::<Vec<_>>(), vec!["Kettle", "Toaster"]);
        assert_eq!(m.top_products_by_revenue.get("Kettle"), Some(&80.0));
        assert_eq!(m.top_products_by_units.keys().collect::<Vec<_>>(), vec!["Spoon", "Mug"]);
    }

    #[test]
    fn top_n_larger_than_groups_returns_all() {
        let ds = load_sales_file("s.csv", Bytes::from(CSV)).unwrap();
        let m = product_metrics(&ds, DEFAULT_TOP_N).unwrap();
        assert_eq!(m.top_products_by_revenue.len(), 4);
    }

    #[test]
    fn top_zero_is_empty() {
        let ds = load_sales_file("s.csv", Bytes::from(CSV)).unwrap();
        let m = product_metrics(&ds, 0).unwrap();
        assert!(m.top_products_by_revenue.is_empty());
        assert!(m.top_products_by_units.is_empty());
    }
}

use serde::Serialize;

use super::series::{group_by, pct_change, round2, Series};
use crate::dataset::{Dimension, SalesDataset};
use crate::error::Result;

/// Periods compared for year-over-year growth.
const YOY_LAG: usize = 12;

/// Monthly revenue and growth, keyed by `Year_Month` ascending.
///
/// Growth compares each period with the one 1 (MoM) or 12 (YoY) positions
/// earlier in the sorted period list. Periods without a prior, and priors of
/// zero revenue, report 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeMetrics {
    pub monthly_revenue: Series<f64>,
    pub mom_growth: Series<f64>,
    pub yoy_growth: Series<f64>,
}

pub fn time_metrics(dataset: &SalesDataset) -> Result<TimeMetrics> {
    let groups = group_by(dataset, Dimension::YearMonth)?;
    let revenue: Vec<(String, f64)> = groups.into_iter().map(|(k, g)| (k, g.revenue)).collect();

    let growth = |lag: usize| -> Series<f64> {
        revenue
            .iter()
            .enumerate()
            .map(|(i, (period, current))| {
                let value = i
                    .checked_sub(lag)
                    .and_then(|p| revenue.get(p))
                    .map_or(0.0, |(_, prior)| pct_change(*prior, *current));
                (period.clone(), round2(value))
            })
            .collect()
    };

    Ok(TimeMetrics {
        mom_growth: growth(1),
        yoy_growth: growth(YOY_LAG),
        monthly_revenue: revenue.iter().map(|(k, v)| (k.clone(), round2(*v))).collect(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use bytes::Bytes;

    use super::*;
    use crate::loader::load_sales_file;

    #[test]
    fn month_over_month_growth() {
        let csv = "Year_Month,Quantity,Price\n2024-02,1,150\n2024-01,1,100\n2024-03,1,0\n2024-04,1,80\n";
        let ds = load_sales_file("s.csv", Bytes::from(csv)).unwrap();
        let m = time_metrics(&ds).unwrap();

        assert_eq!(
            m.monthly_revenue.keys().collect::<Vec<_>>(),
            vec!["2024-01", "2024-02", "2024-03", "2024-04"]
        );
        let mom: Vec<f64> = m.mom_growth.values().copied().collect();
        // first period 0; 0 -> 80 would be infinite and is reported as 0
        assert_eq!(mom, vec![0.0, 50.0, -100.0, 0.0]);
        assert!(m.yoy_growth.values().all(|v| *v == 0.0));
    }

    #[test]
    fn year_over_year_uses_twelve_periods_back() {
        let mut csv = String::from("Year_Month,Quantity,Price\n");
        for month in 1..=12 {
            csv.push_str(&format!("2023-{month:02},1,100\n"));
        }
        csv.push_str("2024-01,1,125\n");

        let ds = load_sales_file("s.csv", Bytes::from(csv)).unwrap();
        let m = time_metrics(&ds).unwrap();
        assert_eq!(m.yoy_growth.get("2024-01"), Some(&25.0));
        assert_eq!(m.yoy_growth.get("2023-12"), Some(&0.0));
        assert_eq!(m.mom_growth.get("2024-01"), Some(&25.0));
    }

    #[test]
    fn growth_from_a_vanishing_prior_is_zero() {
        let csv = "Year_Month,Quantity,Price\n2024-01,1e-300,1e-10\n2024-02,1,1e300\n";
        let ds = load_sales_file("s.csv", Bytes::from(csv)).unwrap();
        let m = time_metrics(&ds).unwrap();

        assert_eq!(m.mom_growth.get("2024-02"), Some(&0.0));
        assert!(m.monthly_revenue.values().all(|v| v.is_finite()));
        let json = serde_json::to_string(&m).unwrap();
        assert!(!json.contains("null"), "{json}");
    }

    #[test]
    fn needs_a_period_column() {
        let ds = load_sales_file("s.csv", Bytes::from("Quantity,Price\n1,1\n")).unwrap();
        assert!(time_metrics(&ds).is_err());
    }
}

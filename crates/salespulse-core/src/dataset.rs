//! Sales data model: raw tables from the loader and the cleaned dataset.
//!
//! `SalesDataset::from_table` is the only way to build a dataset. It resolves
//! the well-known columns, coerces `Quantity`/`Price` to numbers, drops rows
//! where either is invalid or their product overflows, and derives
//! `Order_Revenue` once, so every metric reads the same cleaned orders.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{Result, SalesError};

pub const COL_PLATFORM: &str = "Platform";
pub const COL_BRAND: &str = "Brand";
pub const COL_PRODUCT_NAME: &str = "Product_Name";
pub const COL_QUANTITY: &str = "Quantity";
pub const COL_PRICE: &str = "Price";
pub const COL_ORDER_DATE: &str = "Order_Date";
pub const COL_YEAR_MONTH: &str = "Year_Month";

/// One cell of an uploaded table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    /// Build a cell from CSV/spreadsheet text; blank text is `Empty`.
    pub fn from_text(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }

    /// Numeric coercion. Anything that is not a finite number is `None`.
    pub fn as_number(&self) -> Option<f64> {
        let v = match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Empty | Cell::Date(_) => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Grouping key for this cell, `None` when blank.
    pub fn as_key(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            Cell::Number(n) => Some(n.to_string()),
            Cell::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }
}

/// Header + rows as produced by the loader, before any cleaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    /// Position of a column by exact (trimmed) header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.trim() == name)
    }
}

/// Grouping dimensions understood by the metrics engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Platform,
    Brand,
    ProductName,
    YearMonth,
}

impl Dimension {
    /// Column name reported when the dimension is missing.
    pub fn column(self) -> &'static str {
        match self {
            Dimension::Platform => COL_PLATFORM,
            Dimension::Brand => COL_BRAND,
            Dimension::ProductName => COL_PRODUCT_NAME,
            Dimension::YearMonth => COL_YEAR_MONTH,
        }
    }
}

/// A retained row: valid quantity and price, revenue already derived.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesOrder {
    pub platform: Option<String>,
    pub brand: Option<String>,
    pub product_name: Option<String>,
    /// `YYYY-MM` style period key.
    pub year_month: Option<String>,
    pub quantity: f64,
    pub price: f64,
    /// `quantity * price`.
    pub revenue: f64,
}

impl SalesOrder {
    pub fn key(&self, dim: Dimension) -> Option<&str> {
        match dim {
            Dimension::Platform => self.platform.as_deref(),
            Dimension::Brand => self.brand.as_deref(),
            Dimension::ProductName => self.product_name.as_deref(),
            Dimension::YearMonth => self.year_month.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    platform: Option<usize>,
    brand: Option<usize>,
    product_name: Option<usize>,
    period: Option<PeriodSource>,
    quantity: usize,
    price: usize,
}

#[derive(Debug, Clone, Copy)]
enum PeriodSource {
    YearMonth(usize),
    OrderDate(usize),
}

/// Immutable, cleaned dataset. Shared between requests behind an `Arc`.
#[derive(Debug, Clone)]
pub struct SalesDataset {
    columns: Vec<String>,
    row_count: usize,
    orders: Vec<SalesOrder>,
    has_platform: bool,
    has_brand: bool,
    has_product_name: bool,
    has_period: bool,
}

impl SalesDataset {
    /// Clean a raw table. Fails only when `Quantity` or `Price` is absent.
    pub fn from_table(table: RawTable) -> Result<Self> {
        let required = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| SalesError::MissingColumn(name.to_string()))
        };

        let cols = Columns {
            quantity: required(COL_QUANTITY)?,
            price: required(COL_PRICE)?,
            platform: table.column_index(COL_PLATFORM),
            brand: table.column_index(COL_BRAND),
            product_name: table.column_index(COL_PRODUCT_NAME),
            period: table
                .column_index(COL_YEAR_MONTH)
                .map(PeriodSource::YearMonth)
                .or_else(|| table.column_index(COL_ORDER_DATE).map(PeriodSource::OrderDate)),
        };

        let row_count = table.rows.len();
        let mut orders = Vec::with_capacity(row_count);

        for row in &table.rows {
            let cell = |idx: usize| row.get(idx).unwrap_or(&EMPTY_CELL);
            let key = |idx: Option<usize>| idx.and_then(|i| cell(i).as_key());

            let (Some(quantity), Some(price)) =
                (cell(cols.quantity).as_number(), cell(cols.price).as_number())
            else {
                continue;
            };
            let revenue = quantity * price;
            if !revenue.is_finite() {
                continue;
            }

            let year_month = match cols.period {
                Some(PeriodSource::YearMonth(i)) => year_month_key(cell(i)),
                Some(PeriodSource::OrderDate(i)) => order_date_period(cell(i)),
                None => None,
            };

            orders.push(SalesOrder {
                platform: key(cols.platform),
                brand: key(cols.brand),
                product_name: key(cols.product_name),
                year_month,
                quantity,
                price,
                revenue,
            });
        }

        let dropped = row_count - orders.len();
        if dropped > 0 {
            tracing::debug!(dropped, kept = orders.len(), "dropped rows with invalid Quantity/Price");
        }

        Ok(Self {
            columns: table.columns,
            row_count,
            orders,
            has_platform: cols.platform.is_some(),
            has_brand: cols.brand.is_some(),
            has_product_name: cols.product_name.is_some(),
            has_period: cols.period.is_some(),
        })
    }

    /// Header names as uploaded.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in the uploaded file, before cleaning.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Rows retained after cleaning.
    pub fn orders(&self) -> &[SalesOrder] {
        &self.orders
    }

    pub fn has(&self, dim: Dimension) -> bool {
        match dim {
            Dimension::Platform => self.has_platform,
            Dimension::Brand => self.has_brand,
            Dimension::ProductName => self.has_product_name,
            Dimension::YearMonth => self.has_period,
        }
    }

    pub fn require(&self, dim: Dimension) -> Result<()> {
        if self.has(dim) {
            Ok(())
        } else {
            Err(SalesError::MissingColumn(dim.column().to_string()))
        }
    }
}

fn year_month_key(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Date(d) => Some(d.format("%Y-%m").to_string()),
        other => other.as_key(),
    }
}

fn order_date_period(cell: &Cell) -> Option<String> {
    let date = match cell {
        Cell::Date(d) => *d,
        Cell::Text(s) => parse_date(s.trim())?,
        Cell::Empty | Cell::Number(_) => return None,
    };
    Some(date.format("%Y-%m").to_string())
}

const DATE_LAYOUTS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
const DATETIME_LAYOUTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse the date layouts seen in sales exports.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    for layout in DATE_LAYOUTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, layout) {
            return Some(d);
        }
    }
    for layout in DATETIME_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(dt.date());
        }
    }
    // Bare `YYYY-MM`.
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;

    fn text(s: &str) -> Cell {
        Cell::from_text(s)
    }

    fn table(columns: &[&str], rows: Vec<Vec<Cell>>) -> RawTable {
        RawTable::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    #[test]
    fn numeric_coercion() {
        assert_eq!(text(" 2.5 ").as_number(), Some(2.5));
        assert_eq!(Cell::Number(3.0).as_number(), Some(3.0));
        assert_eq!(text("abc").as_number(), None);
        assert_eq!(text("inf").as_number(), None);
        assert_eq!(text("NaN").as_number(), None);
        assert_eq!(Cell::Empty.as_number(), None);
    }

    #[test]
    fn drops_rows_with_invalid_quantity_or_price() {
        let t = table(
            &["Platform", "Quantity", "Price"],
            vec![
                vec![text("A"), text("2"), text("10")],
                vec![text("A"), text("x"), text("10")],
                vec![text("B"), text("1"), Cell::Empty],
                vec![text("B"), Cell::Number(1.0), Cell::Number(5.0)],
            ],
        );
        let ds = SalesDataset::from_table(t).unwrap();
        assert_eq!(ds.row_count(), 4);
        assert_eq!(ds.orders().len(), 2);
        assert_eq!(ds.orders()[0].revenue, 20.0);
        assert_eq!(ds.orders()[1].revenue, 5.0);
    }

    #[test]
    fn drops_rows_whose_revenue_overflows() {
        let t = table(
            &["Quantity", "Price"],
            vec![
                vec![text("1e200"), text("1e200")],
                vec![text("-1e200"), text("1e200")],
                vec![text("2"), text("3")],
            ],
        );
        let ds = SalesDataset::from_table(t).unwrap();
        assert_eq!(ds.row_count(), 3);
        assert_eq!(ds.orders().len(), 1);
        assert!(ds.orders().iter().all(|o| o.revenue.is_finite()));
        assert_eq!(ds.orders()[0].revenue, 6.0);
    }

    #[test]
    fn short_rows_read_as_empty() {
        let t = table(&["Quantity", "Price", "Brand"], vec![vec![text("1"), text("4")]]);
        let ds = SalesDataset::from_table(t).unwrap();
        assert_eq!(ds.orders().len(), 1);
        assert_eq!(ds.orders()[0].brand, None);
    }

    #[test]
    fn quantity_and_price_are_required() {
        let err = SalesDataset::from_table(table(&["Platform", "Price"], vec![])).unwrap_err();
        assert!(matches!(err, SalesError::MissingColumn(ref c) if c == "Quantity"));
        assert!(err.is_load_error());
    }

    #[test]
    fn optional_dimensions_are_reported() {
        let ds = SalesDataset::from_table(table(&["Quantity", "Price"], vec![])).unwrap();
        assert!(!ds.has(Dimension::Brand));
        let err = ds.require(Dimension::Brand).unwrap_err();
        assert!(matches!(err, SalesError::MissingColumn(ref c) if c == "Brand"));
    }

    #[test]
    fn period_prefers_year_month_column() {
        let t = table(
            &["Quantity", "Price", "Order_Date", "Year_Month"],
            vec![vec![text("1"), text("1"), text("2024-03-15"), text("2024-02")]],
        );
        let ds = SalesDataset::from_table(t).unwrap();
        assert_eq!(ds.orders()[0].year_month.as_deref(), Some("2024-02"));
    }

    #[test]
    fn period_derived_from_order_date() {
        let t = table(
            &["Quantity", "Price", "Order_Date"],
            vec![
                vec![text("1"), text("1"), text("2024-03-15")],
                vec![text("1"), text("1"), text("15/04/2024")],
                vec![text("1"), text("1"), text("2024-05-01 10:30:00")],
                vec![text("1"), text("1"), Cell::Date(NaiveDate::from_ymd_opt(2024, 6, 2).unwrap())],
                vec![text("1"), text("1"), text("not a date")],
            ],
        );
        let ds = SalesDataset::from_table(t).unwrap();
        let periods: Vec<_> = ds.orders().iter().map(|o| o.year_month.clone()).collect();
        assert_eq!(
            periods,
            vec![
                Some("2024-03".to_string()),
                Some("2024-04".to_string()),
                Some("2024-05".to_string()),
                Some("2024-06".to_string()),
                None,
            ]
        );
        assert!(ds.has(Dimension::YearMonth));
    }
}

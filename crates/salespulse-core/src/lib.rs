//! SalesPulse core: sales data model, dataset loader, and the metrics engine.
//!
//! This crate turns an uploaded CSV/spreadsheet into a cleaned `SalesDataset`
//! and derives aggregate metrics from it. It carries no HTTP or async runtime
//! dependencies so the engine can be exercised directly from tests and tools.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed uploads surface as `SalesError` instead of crashing the server.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod dataset;
pub mod error;
pub mod loader;
pub mod metrics;

/// Shared result type.
pub use error::{Result, SalesError};

pub use dataset::{Cell, Dimension, RawTable, SalesDataset, SalesOrder};
pub use loader::{load_sales_file, FileFormat};
pub use metrics::{MetricCategory, MetricOptions, MetricReport};

//! Top-level facade crate for SalesPulse.
//!
//! Re-exports the metrics core and the HTTP server library so users can depend on a single crate.

pub mod core {
    pub use salespulse_core::*;
}

pub mod server {
    pub use salespulse_server::*;
}

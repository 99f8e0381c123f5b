//! Query API: file upload and metric endpoints.

pub mod error;
pub mod metrics;
pub mod upload;

pub use error::{ApiError, NO_DATA_MESSAGE};

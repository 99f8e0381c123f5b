//! Dataset slot.
//!
//! Holds at most one `SalesDataset`. Readers get an `Arc` snapshot and compute
//! without holding any lock; uploads swap the whole `Arc` (last write wins), so
//! a reader never sees a half-written dataset.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use salespulse_core::SalesDataset;

pub use memory::MemoryDatasetStore;

/// Storage for the current dataset. In-memory today; the seam keeps handlers
/// independent of where the dataset lives.
#[async_trait]
pub trait DatasetStore: Send + Sync {
    /// Current dataset, `None` before the first successful upload.
    async fn snapshot(&self) -> Option<Arc<SalesDataset>>;

    /// Replace the dataset wholesale. Returns the previous one.
    async fn replace(&self, dataset: Arc<SalesDataset>) -> Option<Arc<SalesDataset>>;

    /// Number of successful replacements so far.
    fn generation(&self) -> u64;
}

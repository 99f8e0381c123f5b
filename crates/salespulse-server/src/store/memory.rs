use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use salespulse_core::SalesDataset;

use super::DatasetStore;

/// Process-local dataset slot.
#[derive(Default)]
pub struct MemoryDatasetStore {
    slot: RwLock<Option<Arc<SalesDataset>>>,
    generation: AtomicU64,
}

impl MemoryDatasetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DatasetStore for MemoryDatasetStore {
    async fn snapshot(&self) -> Option<Arc<SalesDataset>> {
        self.slot.read().await.clone()
    }

    async fn replace(&self, dataset: Arc<SalesDataset>) -> Option<Arc<SalesDataset>> {
        let prev = self.slot.write().await.replace(dataset);
        self.generation.fetch_add(1, Ordering::Relaxed);
        prev
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use bytes::Bytes;
    use salespulse_core::load_sales_file;

    use super::*;

    fn dataset(rows: &str) -> Arc<SalesDataset> {
        let body = format!("Quantity,Price\n{rows}");
        Arc::new(load_sales_file("s.csv", Bytes::from(body)).unwrap())
    }

    #[tokio::test]
    async fn empty_until_first_replace() {
        let store = MemoryDatasetStore::new();
        assert!(store.snapshot().await.is_none());
        assert_eq!(store.generation(), 0);

        assert!(store.replace(dataset("1,1\n")).await.is_none());
        assert_eq!(store.snapshot().await.unwrap().row_count(), 1);
        assert_eq!(store.generation(), 1);
    }

    #[tokio::test]
    async fn snapshot_survives_replacement() {
        let store = MemoryDatasetStore::new();
        store.replace(dataset("1,1\n")).await;
        let held = store.snapshot().await.unwrap();

        let prev = store.replace(dataset("1,1\n2,2\n")).await.unwrap();
        assert!(Arc::ptr_eq(&prev, &held));
        assert_eq!(held.row_count(), 1);
        assert_eq!(store.snapshot().await.unwrap().row_count(), 2);
    }
}

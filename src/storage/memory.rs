// src/storage/memory.rs
// In-memory ProductStore. Used by --dry-run and by the pipeline tests.

use super::{ProductStore, StoreError};
use crate::product::ProductRecord;
use async_trait::async_trait;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryStore {
    // Index + 1 is the record id, like a SERIAL column
    records: Mutex<Vec<ProductRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Copy of everything stored so far, in insertion order
    #[cfg(test)]
    pub async fn records(&self) -> Vec<ProductRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn insert(&self, record: &ProductRecord) -> Result<i64, StoreError> {
        let mut records = self.records.lock().await;
        records.push(record.clone());
        Ok(records.len() as i64)
    }

    async fn latest(&self, limit: usize) -> Result<Vec<ProductRecord>, StoreError> {
        let records = self.records.lock().await;
        Ok(records.iter().rev().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> ProductRecord {
        ProductRecord {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let store = MemoryStore::new();
        assert_eq!(store.insert(&named("a")).await.unwrap(), 1);
        assert_eq!(store.insert(&named("b")).await.unwrap(), 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_latest_is_newest_first_and_limited() {
        let store = MemoryStore::new();
        for name in ["a", "b", "c"] {
            store.insert(&named(name)).await.unwrap();
        }

        let latest = store.latest(2).await.unwrap();
        let names: Vec<_> = latest.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["c", "b"]);
    }
}

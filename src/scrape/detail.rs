// src/scrape/detail.rs
// =============================================================================
// The detail worker: handles exactly one product link.
//
// Steps:
// 1. Unwrap the link to the canonical detail URL (resolve.rs)
// 2. GET the detail page
// 3. Extract the product fields (extract.rs)
// 4. Insert the record into the store
//
// Every failure here is a soft failure. It is logged and returned to the
// caller, but the category walker never treats it as fatal. There is exactly
// one attempt per product, no retries.
// =============================================================================

use super::extract::extract_html;
use super::fetch::{FetchError, PageFetcher};
use super::resolve::resolve;
use crate::product::ProductRecord;
use crate::storage::{ProductStore, StoreError};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetailError {
    #[error("could not fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    // The record was extracted fine but the store refused it
    #[error("could not store product '{}': {source}", .record.name)]
    Store {
        record: ProductRecord,
        #[source]
        source: StoreError,
    },
}

/// Shared handles one worker needs. Cloned into every spawned task.
#[derive(Clone)]
pub struct DetailWorker {
    fetcher: Arc<dyn PageFetcher>,
    store: Arc<dyn ProductStore>,
}

impl DetailWorker {
    pub fn new(fetcher: Arc<dyn PageFetcher>, store: Arc<dyn ProductStore>) -> Self {
        Self { fetcher, store }
    }

    /// Scrapes one product and stores it.
    ///
    /// On success returns the stored record with its id.
    pub async fn process(&self, raw_reference: &str) -> Result<(ProductRecord, i64), DetailError> {
        let url = resolve(raw_reference);

        let html = match self.fetcher.fetch(&url).await {
            Ok(html) => html,
            Err(source) => {
                tracing::warn!(%url, error = %source, "Error fetching product page");
                return Err(DetailError::Fetch { url, source });
            }
        };

        // Parsing is plain CPU work; the document is dropped before the next await
        let record = extract_html(&html);
        if record.is_empty() {
            // Usually a changed page layout; the empty row is still stored
            tracing::warn!(%url, "No product fields found on detail page");
        }
        tracing::debug!(%url, name = %record.name, price = %record.price, "Extracted product");

        match self.store.insert(&record).await {
            Ok(id) => {
                tracing::info!(id, name = %record.name, "New product inserted");
                Ok((record, id))
            }
            Err(source) => {
                tracing::warn!(%url, error = %source, "Error inserting product into database");
                Err(DetailError::Store { record, source })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::fixture::{detail_page, FixtureSite};
    use crate::storage::MemoryStore;
    use async_trait::async_trait;

    // A store that refuses every write
    struct RejectingStore;

    #[async_trait]
    impl ProductStore for RejectingStore {
        async fn insert(&self, _record: &ProductRecord) -> Result<i64, StoreError> {
            Err(StoreError::Rejected("read-only".to_string()))
        }

        async fn latest(&self, _limit: usize) -> Result<Vec<ProductRecord>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_resolves_fetches_and_stores() {
        let site = Arc::new(FixtureSite::new());
        site.add_page("https://shop.test/item/7", detail_page(7));
        let store = Arc::new(MemoryStore::new());
        let worker = DetailWorker::new(site.clone(), store.clone());

        let (record, id) = worker
            .process("https://ads.test/click?r=https%3A%2F%2Fshop.test%2Fitem%2F7")
            .await
            .unwrap();

        assert_eq!(id, 1);
        assert_eq!(record.name, "Product 7");
        assert_eq!(site.hits("https://shop.test/item/7"), 1);
        assert_eq!(store.records().await, vec![record]);
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_store() {
        let site = Arc::new(FixtureSite::new());
        let store = Arc::new(MemoryStore::new());
        let worker = DetailWorker::new(site, store.clone());

        let result = worker.process("https://shop.test/item/404").await;

        assert!(matches!(result, Err(DetailError::Fetch { .. })));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_store_failure_keeps_record() {
        let site = Arc::new(FixtureSite::new());
        site.add_page("https://shop.test/item/1", detail_page(1));
        let worker = DetailWorker::new(site, Arc::new(RejectingStore));

        match worker.process("https://shop.test/item/1").await {
            Err(DetailError::Store { record, .. }) => assert_eq!(record.name, "Product 1"),
            other => panic!("expected store error, got {other:?}"),
        }
    }
}

// src/storage/mod.rs
// =============================================================================
// Where extracted products end up.
//
// The pipeline only needs two things from a store: append one record, and read
// back the newest N for the CSV snapshot. Postgres is the real backend; the
// in-memory store backs --dry-run and the tests.
//
// Writes from concurrent workers are independent inserts, so implementations
// must be usable from many tasks at once (Send + Sync) without extra locking
// by the caller.
// =============================================================================

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use crate::product::ProductRecord;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store rejected record: {0}")]
    Rejected(String),
}

/// Durable home of product records.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Appends one record and returns its id. No deduplication.
    async fn insert(&self, record: &ProductRecord) -> Result<i64, StoreError>;

    /// The `limit` most recently inserted records, newest first.
    async fn latest(&self, limit: usize) -> Result<Vec<ProductRecord>, StoreError>;
}

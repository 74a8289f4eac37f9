// src/export/mod.rs
// =============================================================================
// The export stage: runs once at the end of a scrape and snapshots the newest
// records into a portable file.
//
// The driver only sees the Exporter trait, so tests can count export calls
// without touching the filesystem.
// =============================================================================

mod snapshot;

pub use snapshot::CsvExporter;

use crate::storage::StoreError;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not read products: {0}")]
    Store(#[from] StoreError),

    #[error("could not write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not write file: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait Exporter: Send + Sync {
    /// Writes the `limit` most recent records. Returns how many were written.
    async fn export_latest(&self, limit: usize) -> Result<usize, ExportError>;
}

// src/export/snapshot.rs
// =============================================================================
// CSV snapshot of the most recent products.
//
// Layout:
//   Name,Description,ImageLink,Price,Rating,StoreName
//   <newest record>
//   <second newest>
//   ...
//
// The header is always written, even when the store is empty, so consumers
// can rely on it.
// =============================================================================

use super::{ExportError, Exporter};
use crate::product::{ProductRecord, CSV_HEADER};
use crate::storage::ProductStore;
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Reads the latest records from a store and writes them to `path`.
pub struct CsvExporter {
    store: Arc<dyn ProductStore>,
    path: PathBuf,
}

impl CsvExporter {
    pub fn new(store: Arc<dyn ProductStore>, path: impl Into<PathBuf>) -> Self {
        Self {
            store,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Exporter for CsvExporter {
    async fn export_latest(&self, limit: usize) -> Result<usize, ExportError> {
        let records = self.store.latest(limit).await?;

        // Render in memory, then hand the bytes to tokio's file API
        let mut buffer = Vec::new();
        write_csv(&records, &mut buffer)?;
        tokio::fs::write(&self.path, buffer).await?;

        tracing::info!(rows = records.len(), path = %self.path.display(), "Exported products to CSV");
        Ok(records.len())
    }
}

/// Writes the header and one row per record to `out`.
fn write_csv<W: Write>(records: &[ProductRecord], out: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.write_record(record.csv_row())?;
    }
    writer.flush()?;
    Ok(())
}

//! Import Service - Batch ingestion use case
//!
//! Streams records from a `RecordSource`, validates and deduplicates them,
//! and flushes fixed-size batches into a `BatchWriter`.

use crate::domain::entities::IngestionStats;
use crate::domain::ports::{BatchWriter, RecordSource, SourceError, StoreError};
use crate::domain::services::{Batch, RecordParser};
use crate::infrastructure::shutdown::ShutdownController;
use std::sync::Arc;

/// Reasons an import run ended early.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("import canceled")]
    Canceled,
    #[error("batch size must be positive")]
    InvalidBatchSize,
    #[error("source error: {0}")]
    Source(#[from] SourceError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// A failed run together with the statistics gathered before it stopped.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct ImportFailure {
    pub stats: IngestionStats,
    #[source]
    pub error: IngestError,
}

impl ImportFailure {
    pub fn is_canceled(&self) -> bool {
        matches!(self.error, IngestError::Canceled)
    }
}

/// Import service - the ingestion driver.
///
/// One run processes the source sequentially:
/// 1. Checks for cancellation
/// 2. Reads and validates one record
/// 3. Adds it to the current batch (dropping in-batch duplicates)
/// 4. Flushes the batch to the store once it is full, before reading on
///
/// At end of stream the remaining records are flushed. Statistics are
/// finalized exactly once on every exit path.
pub struct ImportService {
    writer: Arc<dyn BatchWriter>,
    shutdown: ShutdownController,
}

impl ImportService {
    /// Create a new import service.
    pub fn new(writer: Arc<dyn BatchWriter>, shutdown: ShutdownController) -> Self {
        Self { writer, shutdown }
    }

    /// Import every record of `source` in batches of `batch_size`.
    pub async fn run<S>(
        &self,
        source: &mut S,
        batch_size: usize,
    ) -> Result<IngestionStats, ImportFailure>
    where
        S: RecordSource + ?Sized,
    {
        let mut stats = IngestionStats::start();
        let result = self.ingest(source, batch_size, &mut stats).await;
        stats.finish();

        match result {
            Ok(()) => Ok(stats),
            Err(error) => Err(ImportFailure { stats, error }),
        }
    }

    async fn ingest<S>(
        &self,
        source: &mut S,
        batch_size: usize,
        stats: &mut IngestionStats,
    ) -> Result<(), IngestError>
    where
        S: RecordSource + ?Sized,
    {
        if batch_size == 0 {
            return Err(IngestError::InvalidBatchSize);
        }

        let mut batch = Batch::new(batch_size);
        tracing::info!("starting import, batch_size={}", batch_size);

        loop {
            if self.shutdown.is_shutdown() {
                tracing::warn!(
                    "import canceled, discarding {} unflushed records",
                    batch.len()
                );
                return Err(IngestError::Canceled);
            }

            let fields = match source.next_record().await {
                Ok(Some(fields)) => fields,
                Ok(None) => break,
                Err(SourceError::Malformed(reason)) => {
                    tracing::debug!("skipping malformed record: {}", reason);
                    stats.bad_records += 1;
                    continue;
                }
                Err(e) => {
                    tracing::error!("import aborted: {}", e);
                    return Err(e.into());
                }
            };

            let record = match RecordParser::parse(&fields) {
                Ok(record) => record,
                Err(failure) => {
                    tracing::debug!("skipping record {:?}: {}", fields, failure);
                    stats.bad_records += 1;
                    continue;
                }
            };

            if !batch.try_add(record) {
                stats.duplicated_in_source += 1;
                continue;
            }

            if batch.is_full() {
                self.flush(&mut batch, stats).await?;
            }
        }

        if !batch.is_empty() {
            self.flush(&mut batch, stats).await?;
        }

        tracing::info!("import finished");
        Ok(())
    }

    /// Write the batch to the store and clear it.
    ///
    /// On a store error the batch is left as is and abandoned by the caller.
    async fn flush(&self, batch: &mut Batch, stats: &mut IngestionStats) -> Result<(), IngestError> {
        if self.shutdown.is_shutdown() {
            tracing::warn!("import canceled before flushing {} records", batch.len());
            return Err(IngestError::Canceled);
        }

        let inserted = match self.writer.insert_batch(batch.records()).await {
            Ok(inserted) => inserted,
            Err(e) => {
                tracing::error!("batch of {} rows rejected by store: {}", batch.len(), e);
                return Err(e.into());
            }
        };

        stats.record_flush(batch.len(), inserted);
        tracing::info!("{}/{} rows added to store", inserted, batch.len());
        batch.flush();
        Ok(())
    }
}

//! Batch Writer Port
//!
//! Defines the bulk-write contract the import pipeline flushes batches into.

use crate::domain::entities::GeoRecord;
use crate::domain::ports::StoreError;
use async_trait::async_trait;

/// Idempotent, atomic bulk writer for geo records.
///
/// This is an outbound port. Implementations must satisfy:
/// - a record whose `ip_address` is already stored is skipped and not counted,
/// - a call either applies all of its rows or none of them,
/// - the returned count never exceeds `rows.len()`.
#[async_trait]
pub trait BatchWriter: Send + Sync {
    /// Write a batch and return how many rows were newly inserted.
    async fn insert_batch(&self, rows: &[GeoRecord]) -> Result<u64, StoreError>;
}

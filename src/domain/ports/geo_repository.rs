//! Geo Repository Port
//!
//! Defines the read side of the persistence layer used by the lookup API.

use crate::domain::entities::GeoRecord;
use async_trait::async_trait;

/// Errors raised by persistence adapters.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No row exists for the requested key
    #[error("not found")]
    NotFound,
    /// The underlying database reported an error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// The blocking worker running the query failed
    #[error("store task failed: {0}")]
    Task(String),
}

/// Read access to stored geo records.
#[async_trait]
pub trait GeoRepository: Send + Sync {
    /// Fetch the record stored under `ip_address`.
    ///
    /// Returns `StoreError::NotFound` when there is no such row.
    async fn fetch_one(&self, ip_address: &str) -> Result<GeoRecord, StoreError>;
}

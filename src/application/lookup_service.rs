//! Lookup Service - IP to geolocation use case
//!
//! Validates the requested address and reads the stored record.

use crate::domain::entities::GeoRecord;
use crate::domain::ports::{GeoRepository, StoreError};
use std::net::IpAddr;
use std::sync::Arc;

/// Lookup failures, mapped to HTTP statuses by the inbound adapter.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("invalid IP address: {0}")]
    InvalidIp(String),
    #[error("no geoinfo found for {0}")]
    NotFound(String),
    #[error("store error: {0}")]
    Store(StoreError),
}

/// Lookup service used by the HTTP API.
pub struct LookupService {
    repo: Arc<dyn GeoRepository>,
}

impl LookupService {
    pub fn new(repo: Arc<dyn GeoRepository>) -> Self {
        Self { repo }
    }

    /// Resolve `raw_ip` to its stored record.
    ///
    /// The address is canonicalized first so that e.g. a zero-padded IPv6
    /// form finds the row imported under its short form.
    pub async fn lookup(&self, raw_ip: &str) -> Result<GeoRecord, LookupError> {
        let ip: IpAddr = raw_ip
            .parse()
            .map_err(|_| LookupError::InvalidIp(raw_ip.to_string()))?;
        let key = ip.to_string();

        match self.repo.fetch_one(&key).await {
            Ok(record) => Ok(record),
            Err(StoreError::NotFound) => Err(LookupError::NotFound(key)),
            Err(e) => {
                tracing::error!("fetch_one({}) failed: {}", key, e);
                Err(LookupError::Store(e))
            }
        }
    }
}

//! geolocation Library
//!
//! IP geolocation import pipeline and lookup API. This module exposes the
//! components for use in integration tests and as a library.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::{ImportFailure, ImportService, IngestError, LookupService};
pub use config::load_config;
pub use domain::entities::{GeoRecord, IngestionStats};
pub use domain::ports::{BatchWriter, GeoRepository, RecordSource, SourceError, StoreError};
pub use domain::services::{Batch, RecordParser};

mod batch_writer;
mod geo_repository;
mod record_source;

pub use batch_writer::BatchWriter;
pub use geo_repository::{GeoRepository, StoreError};
pub use record_source::{RecordSource, SourceError};

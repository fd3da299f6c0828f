//! Record Source Port
//!
//! Defines the streaming input of the import pipeline.

use async_trait::async_trait;

/// Errors raised while pulling the next record.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The record itself is corrupt (e.g. not valid UTF-8). Skippable.
    #[error("malformed record: {0}")]
    Malformed(String),
    /// Reading the underlying stream failed. Fatal for the run.
    #[error("read failed: {0}")]
    Read(String),
}

/// Pull-based stream of raw delimited records.
///
/// The header row, if the format has one, is never yielded.
#[async_trait]
pub trait RecordSource: Send {
    /// Read the next record's fields, or `None` at end of stream.
    async fn next_record(&mut self) -> Result<Option<Vec<String>>, SourceError>;
}

//! CSV Record Source
//!
//! Implements RecordSource over any Tokio reader using csv-async.

use crate::domain::ports::{RecordSource, SourceError};
use async_trait::async_trait;
use csv_async::{AsyncReader, AsyncReaderBuilder, ErrorKind, StringRecord};
use std::path::Path;
use tokio::io::AsyncRead;

/// Streaming CSV source.
///
/// The first row is treated as the header and never yielded. Rows with the
/// wrong number of columns are passed through so the parser can reject them;
/// blank lines are skipped by the reader.
pub struct CsvRecordSource<R> {
    reader: AsyncReader<R>,
    record: StringRecord,
}

impl CsvRecordSource<tokio::fs::File> {
    /// Open a CSV file.
    ///
    /// Failing here means nothing was read; callers report it without statistics.
    pub async fn open<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = tokio::fs::File::open(path.as_ref()).await?;
        tracing::info!("starting import from {}", path.as_ref().display());
        Ok(Self::new(file))
    }
}

impl<R> CsvRecordSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        let reader = AsyncReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .create_reader(reader);
        Self {
            reader,
            record: StringRecord::new(),
        }
    }
}

#[async_trait]
impl<R> RecordSource for CsvRecordSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    async fn next_record(&mut self) -> Result<Option<Vec<String>>, SourceError> {
        match self.reader.read_record(&mut self.record).await {
            Ok(true) => Ok(Some(self.record.iter().map(str::to_string).collect())),
            Ok(false) => Ok(None),
            Err(e) => match e.kind() {
                ErrorKind::Io(_) => Err(SourceError::Read(e.to_string())),
                _ => Err(SourceError::Malformed(e.to_string())),
            },
        }
    }
}

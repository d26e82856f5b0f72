//! Sink trait and output errors

use crate::listing::ListingRecord;
use thiserror::Error;

/// Errors that can occur while persisting the dataset
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Existing dataset has no '{0}' column")]
    MissingColumn(&'static str),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// What a flush actually wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Rows appended to the dataset
    pub written: usize,

    /// Records dropped because their URL was already stored
    pub skipped_known: usize,

    /// Whether a header row was written
    pub wrote_header: bool,
}

/// Persistent storage for harvested records
///
/// A sink is flushed once, at the end of a run. Flushing appends; existing
/// content is never rewritten.
pub trait DatasetSink {
    /// Appends `records` to the underlying storage
    fn flush(&self, records: &[ListingRecord]) -> OutputResult<FlushReport>;
}

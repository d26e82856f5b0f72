use crate::listing::ListingRecord;
use std::sync::{Mutex, PoisonError};

/// Run-wide accumulator of valid records
///
/// Fan-out workers append concurrently; the record order is arrival order
/// and carries no meaning.
#[derive(Debug, Default)]
pub struct Dataset {
    records: Mutex<Vec<ListingRecord>>,
}

impl Dataset {
    /// Creates an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one record
    pub fn push(&self, record: ListingRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    /// Number of records collected so far
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no record has been collected
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the dataset and returns its records
    pub fn into_records(self) -> Vec<ListingRecord> {
        self.records
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

//! CSV dataset sink
//!
//! Rows are appended to a single UTF-8 CSV file. The header row is only
//! written when the file is missing or empty, so repeated runs keep one
//! header and accumulate rows underneath it.

use crate::listing::{ListingRecord, COLUMNS};
use crate::output::traits::{DatasetSink, FlushReport, OutputError, OutputResult};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

const URL_COLUMN: &str = "url";

/// Appends records to a CSV file
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
    skip_known_urls: bool,
}

impl CsvSink {
    /// Creates a sink writing to `path`
    ///
    /// With `skip_known_urls`, records whose URL already appears in the file,
    /// or earlier in the same flush, are dropped instead of appended.
    pub fn new(path: impl Into<PathBuf>, skip_known_urls: bool) -> Self {
        Self {
            path: path.into(),
            skip_known_urls,
        }
    }

    /// Path of the CSV file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSink for CsvSink {
    fn flush(&self, records: &[ListingRecord]) -> OutputResult<FlushReport> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let needs_header = !has_content(&self.path)?;
        let mut known = if self.skip_known_urls && !needs_header {
            load_known_urls(&self.path)?
        } else {
            HashSet::new()
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        let mut report = FlushReport::default();
        if needs_header {
            writer.write_record(COLUMNS)?;
            report.wrote_header = true;
        }

        for record in records {
            if self.skip_known_urls && !known.insert(record.url.clone()) {
                report.skipped_known += 1;
                continue;
            }
            writer.serialize(record)?;
            report.written += 1;
        }
        writer.flush()?;

        tracing::info!(
            "Appended {} records to {} ({} already known)",
            report.written,
            self.path.display(),
            report.skipped_known
        );

        Ok(report)
    }
}

/// Returns true if `path` exists and is non-empty
fn has_content(path: &Path) -> OutputResult<bool> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.len() > 0),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Reads the `url` column of an existing dataset
fn load_known_urls(path: &Path) -> OutputResult<HashSet<String>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let index = reader
        .headers()?
        .iter()
        .position(|h| h == URL_COLUMN)
        .ok_or(OutputError::MissingColumn(URL_COLUMN))?;

    let mut known = HashSet::new();
    for row in reader.records() {
        if let Some(url) = row?.get(index) {
            known.insert(url.to_string());
        }
    }

    tracing::debug!("Loaded {} known URLs from {}", known.len(), path.display());
    Ok(known)
}

//! Output module for the harvested dataset
//!
//! This module handles:
//! - Accumulating records from concurrent workers (`Dataset`)
//! - Appending the dataset to a CSV file (`CsvSink`)
//! - Recording and printing run statistics

mod csv_sink;
mod dataset;
pub mod stats;
mod traits;

pub use csv_sink::CsvSink;
pub use dataset::Dataset;
pub use stats::{print_statistics, RunStatistics, TargetSummary};
pub use traits::{DatasetSink, FlushReport, OutputError, OutputResult};

//! Bounded-concurrency fan-out of detail fetches
//!
//! Every URL of a frontier is fetched at most once, with at most `workers`
//! fetches in flight. A failed fetch never affects its siblings; it is
//! logged and counted.

use crate::crawler::fetcher::fetch_detail;
use crate::output::Dataset;
use futures::stream::{self, StreamExt};
use reqwest::Client;

/// Completions between two progress lines
const PROGRESS_INTERVAL: usize = 50;

/// Outcome counts of one fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOutTally {
    pub attempted: usize,
    pub succeeded: usize,
    pub extraction_failures: usize,
    pub fetch_failures: usize,
}

impl FanOutTally {
    /// Fetches that produced no record
    pub fn failed(&self) -> usize {
        self.extraction_failures + self.fetch_failures
    }
}

/// Fetches every URL and appends the valid records to `dataset`
///
/// Records arrive in completion order. `workers` is clamped to at least one.
pub async fn fan_out(
    client: &Client,
    urls: Vec<String>,
    workers: usize,
    dataset: &Dataset,
) -> FanOutTally {
    let total = urls.len();
    let mut tally = FanOutTally::default();

    let mut results = stream::iter(urls)
        .map(|url| async move {
            let result = fetch_detail(client, &url).await;
            (url, result)
        })
        .buffer_unordered(workers.max(1));

    while let Some((url, result)) = results.next().await {
        tally.attempted += 1;

        match result {
            Ok(record) => {
                dataset.push(record);
                tally.succeeded += 1;
            }
            Err(e) if e.is_extraction() => {
                tally.extraction_failures += 1;
                tracing::debug!("Skipping {}: {}", url, e);
            }
            Err(e) => {
                tally.fetch_failures += 1;
                tracing::debug!("Failed to fetch {}: {}", url, e);
            }
        }

        if tally.attempted % PROGRESS_INTERVAL == 0 {
            tracing::info!(
                "Extracted {}/{} detail pages ({} ok, {} failed)",
                tally.attempted,
                total,
                tally.succeeded,
                tally.failed()
            );
        }
    }

    tally
}

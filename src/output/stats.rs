//! Run statistics and the final tally
//!
//! Every (region, filter) target contributes one `TargetSummary`; the run
//! totals are derived from them.

use chrono::{DateTime, Utc};

/// Outcome of one (region, filter) target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSummary {
    /// Listing path of the target
    pub target: String,

    /// Listing pages rendered
    pub pages: u32,

    /// Listing pages that failed to render
    pub failed_pages: u32,

    /// Distinct detail links discovered
    pub links: usize,

    /// Records extracted successfully
    pub succeeded: usize,

    /// Detail pages whose markup did not match
    pub extraction_failures: usize,

    /// Detail pages that could not be fetched
    pub fetch_failures: usize,

    /// Why discovery ended
    pub stop_reason: String,
}

impl TargetSummary {
    /// Detail pages that produced no record
    pub fn failed(&self) -> usize {
        self.extraction_failures + self.fetch_failures
    }
}

/// Statistics for a whole harvest run
#[derive(Debug, Clone)]
pub struct RunStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub targets: Vec<TargetSummary>,

    /// Rows appended by the sink
    pub written: usize,

    /// Records dropped by the sink as already known
    pub skipped_known: usize,
}

impl RunStatistics {
    /// Starts a new run clock
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            targets: Vec::new(),
            written: 0,
            skipped_known: 0,
        }
    }

    /// Stops the run clock
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn record_target(&mut self, summary: TargetSummary) {
        self.targets.push(summary);
    }

    pub fn total_links(&self) -> usize {
        self.targets.iter().map(|t| t.links).sum()
    }

    pub fn total_succeeded(&self) -> usize {
        self.targets.iter().map(|t| t.succeeded).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.targets.iter().map(TargetSummary::failed).sum()
    }

    pub fn total_pages(&self) -> u32 {
        self.targets.iter().map(|t| t.pages).sum()
    }

    /// Wall-clock duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Share of attempted detail pages that produced a record, as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.total_succeeded() + self.total_failed();
        if attempted == 0 {
            return 0.0;
        }
        (self.total_succeeded() as f64 / attempted as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Overview:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(seconds) = stats.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    println!("  Targets: {}", stats.targets.len());
    println!("  Listing pages: {}", stats.total_pages());
    println!("  Links discovered: {}", stats.total_links());
    println!();

    println!("Targets:");
    for target in &stats.targets {
        println!(
            "  {}: {} links, {} ok, {} failed ({} pages, {})",
            target.target,
            target.links,
            target.succeeded,
            target.failed(),
            target.pages,
            target.stop_reason
        );
    }
    println!();

    println!(
        "Records: {} ok, {} failed ({:.1}% success)",
        stats.total_succeeded(),
        stats.total_failed(),
        stats.success_rate()
    );
    println!(
        "Rows written: {} ({} skipped as already known)",
        stats.written, stats.skipped_known
    );
}

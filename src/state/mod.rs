//! State module for tracking crawl progress
//!
//! Each (region, filter) target moves through `CrawlPhase::Discovering`,
//! `CrawlPhase::FanningOut` and `CrawlPhase::Merged`. Nothing carries over
//! from one target to the next except the shared dataset.

mod crawl_phase;

// Re-export main types
pub use crawl_phase::{CrawlPhase, PhaseTracker};

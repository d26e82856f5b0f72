//! Crawler module for listing discovery and detail harvesting
//!
//! This module contains the core harvesting logic, including:
//! - Listing-page link extraction
//! - Paginated link discovery with a stopping policy
//! - Detail-page fetching and bounded fan-out
//! - Overall harvest coordination

mod coordinator;
mod fanout;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::Coordinator;
pub use fanout::{fan_out, FanOutTally};
pub use fetcher::{build_http_client, decode_body, fetch_detail};
pub use frontier::{Discovery, Frontier, FrontierController, StopPolicy, StopReason};
pub use parser::{extract_listing_links, LISTING_LINK_SELECTOR};

use crate::config::{Config, RendererKind};
use crate::output::{CsvSink, RunStatistics};
use crate::render::{BrowserRenderer, HttpRenderer};
use crate::HarvestError;
use std::time::Duration;

/// Runs a complete harvest
///
/// This is the main entry point for starting a run. It will:
/// 1. Open the rendering session selected by `renderer.kind`
/// 2. Discover and harvest every (region, filter) target
/// 3. Append the collected records to the configured CSV file
///
/// # Returns
///
/// * `Ok(RunStatistics)` - Harvest completed, possibly with counted failures
/// * `Err(HarvestError)` - The session could not be created or the flush failed
pub async fn run_harvest(config: &Config) -> Result<RunStatistics, HarvestError> {
    let sink = CsvSink::new(&config.output.path, config.output.skip_known_urls);

    match config.renderer.kind {
        RendererKind::Browser => {
            let renderer = BrowserRenderer::launch(&config.renderer, &config.user_agent.browser).await?;
            let mut coordinator = Coordinator::new(config, renderer)?;
            let result = coordinator.run(&sink).await;
            coordinator.into_renderer().close().await;
            result
        }
        RendererKind::Http => {
            let renderer = HttpRenderer::new(
                &config.user_agent.browser,
                Duration::from_secs(config.crawler.fetch_timeout_secs),
            )?;
            Coordinator::new(config, renderer)?.run(&sink).await
        }
    }
}

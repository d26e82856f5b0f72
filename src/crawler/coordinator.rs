//! Harvest coordinator - main orchestration logic
//!
//! Targets are processed one after another, in configuration order. For each
//! target the coordinator:
//! - Discovers the detail links with the rendering session
//! - Fans the links out to concurrent detail fetches
//! - Merges the valid records into the run-wide dataset
//!
//! The dataset is flushed to the sink once, after the last target.

use crate::config::Config;
use crate::crawler::fanout::fan_out;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::frontier::{FrontierController, StopPolicy};
use crate::output::{Dataset, DatasetSink, RunStatistics, TargetSummary};
use crate::render::{PageRenderer, RenderSettings};
use crate::state::{CrawlPhase, PhaseTracker};
use crate::target::CrawlTarget;
use crate::HarvestError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Main harvest coordinator structure
pub struct Coordinator<R: PageRenderer> {
    renderer: R,
    client: Client,
    base_url: Url,
    targets: Vec<CrawlTarget>,
    settings: RenderSettings,
    policy: StopPolicy,
    workers: usize,
}

impl<R: PageRenderer> Coordinator<R> {
    /// Creates a coordinator that drives `renderer` through the configured targets
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(HarvestError)` - Bad base URL or HTTP client construction failed
    pub fn new(config: &Config, renderer: R) -> Result<Self, HarvestError> {
        let base_url = Url::parse(&config.site.base_url)?;
        let client = build_http_client(
            &config.user_agent.fetch,
            Duration::from_secs(config.crawler.fetch_timeout_secs),
        )?;

        Ok(Self {
            renderer,
            client,
            base_url,
            targets: CrawlTarget::all(&config.site),
            settings: RenderSettings::from_config(&config.renderer, &config.crawler),
            policy: StopPolicy::from_config(&config.crawler),
            workers: config.crawler.workers,
        })
    }

    /// Targets in processing order
    pub fn targets(&self) -> &[CrawlTarget] {
        &self.targets
    }

    /// Runs every target, then flushes the dataset to `sink`
    ///
    /// Page and detail failures are counted in the returned statistics. Only
    /// a fatal renderer error, an invalid phase transition or a sink failure
    /// aborts the run; in that case nothing is flushed.
    pub async fn run(&mut self, sink: &dyn DatasetSink) -> Result<RunStatistics, HarvestError> {
        let mut stats = RunStatistics::start();
        let dataset = Dataset::new();

        tracing::info!("Starting harvest of {} targets", self.targets.len());

        for index in 0..self.targets.len() {
            let target = self.targets[index].clone();
            let summary = self.harvest_target(&target, &dataset).await?;

            tracing::info!(
                "{}: {} links, {} records, {} failed, dataset now holds {}",
                target,
                summary.links,
                summary.succeeded,
                summary.failed(),
                dataset.len()
            );
            stats.record_target(summary);
        }

        let records = dataset.into_records();
        let report = sink.flush(&records)?;
        stats.written = report.written;
        stats.skipped_known = report.skipped_known;
        stats.finish();

        tracing::info!(
            "Harvest completed: {} records from {} links",
            stats.total_succeeded(),
            stats.total_links()
        );

        Ok(stats)
    }

    /// Processes a single target through all three phases
    async fn harvest_target(
        &mut self,
        target: &CrawlTarget,
        dataset: &Dataset,
    ) -> Result<TargetSummary, HarvestError> {
        let mut phase = PhaseTracker::new();

        let discovery = FrontierController::new(
            &mut self.renderer,
            self.base_url.clone(),
            self.settings.clone(),
            self.policy,
        )
        .discover(target)
        .await?;

        phase.advance(CrawlPhase::FanningOut)?;
        let links = discovery.links.len();
        let tally = fan_out(&self.client, discovery.links, self.workers, dataset).await;

        phase.advance(CrawlPhase::Merged)?;

        Ok(TargetSummary {
            target: target.to_string(),
            pages: discovery.pages,
            failed_pages: discovery.failed_pages,
            links,
            succeeded: tally.succeeded,
            extraction_failures: tally.extraction_failures,
            fetch_failures: tally.fetch_failures,
            stop_reason: discovery.stop.to_string(),
        })
    }

    /// Returns the rendering session, ending the coordinator
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

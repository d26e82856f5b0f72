//! Listing-page rendering
//!
//! Discovery drives a single stateful rendering session through the listing
//! pages of one target at a time. The session sits behind `PageRenderer`
//! so that the frontier logic never touches browser details:
//! - `BrowserRenderer`: headless Chrome via chromiumoxide, runs scripts and
//!   clicks the "load more" control
//! - `HttpRenderer`: plain GET of the listing page, no interactions
//!
//! A renderer is owned by one discovery loop and is never shared between
//! concurrent workers.

mod browser;
mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use browser::BrowserRenderer;
pub use http::HttpRenderer;

use crate::config::{CrawlerConfig, RendererConfig};
use crate::RenderError;
use async_trait::async_trait;
use std::time::Duration;

/// A stateful page rendering session
#[async_trait]
pub trait PageRenderer: Send {
    /// Handle to an element that can be clicked
    type Handle: Send;

    /// Loads `url` into the session, replacing the current page
    async fn navigate(&mut self, url: &str) -> Result<(), RenderError>;

    /// Waits up to `timeout` for an actionable element matching `xpath`
    ///
    /// Returns `Ok(None)` when nothing actionable shows up in time.
    async fn find_clickable(
        &mut self,
        xpath: &str,
        timeout: Duration,
    ) -> Result<Option<Self::Handle>, RenderError>;

    /// Clicks a previously found element
    async fn click(&mut self, handle: Self::Handle) -> Result<(), RenderError>;

    /// Returns the current page markup
    async fn content(&mut self) -> Result<String, RenderError>;
}

/// The "load more" interaction run on the first listing page
#[derive(Debug, Clone)]
pub struct ExpandPlan {
    /// XPath of the expand control
    pub xpath: String,

    /// Maximum number of clicks
    pub attempts: u32,

    /// How long to wait for the control to become actionable
    pub wait: Duration,

    /// Pause after each click
    pub settle: Duration,
}

/// Timing and interaction settings for listing pages
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub expand: ExpandPlan,

    /// Pause after loading page 1
    pub first_page_settle: Duration,

    /// Pause after loading any later page
    pub page_settle: Duration,
}

impl RenderSettings {
    /// Builds settings from the renderer and crawler configuration
    pub fn from_config(renderer: &RendererConfig, crawler: &CrawlerConfig) -> Self {
        Self {
            expand: ExpandPlan {
                xpath: renderer.expand_xpath.clone(),
                attempts: crawler.expand_attempts,
                wait: Duration::from_secs(renderer.interaction_timeout_secs),
                settle: Duration::from_millis(renderer.expand_settle_ms),
            },
            first_page_settle: Duration::from_millis(renderer.first_page_settle_ms),
            page_settle: Duration::from_millis(renderer.page_settle_ms),
        }
    }
}

/// Loads one listing page and returns its markup
///
/// When `expand` is given, the expand control is clicked up to
/// `expand.attempts` times. Expansion stops early, without error, as soon as
/// the control is missing or a click fails.
pub async fn render_page<R: PageRenderer + ?Sized>(
    renderer: &mut R,
    url: &str,
    settle: Duration,
    expand: Option<&ExpandPlan>,
) -> Result<String, RenderError> {
    renderer.navigate(url).await?;
    pause(settle).await;

    if let Some(plan) = expand {
        for attempt in 0..plan.attempts {
            let handle = match renderer.find_clickable(&plan.xpath, plan.wait).await {
                Ok(Some(handle)) => handle,
                Ok(None) => {
                    tracing::debug!("Expand control gone after {} clicks on {}", attempt, url);
                    break;
                }
                Err(e) => {
                    tracing::debug!("Expand lookup failed on {}: {}", url, e);
                    break;
                }
            };

            if let Err(e) = renderer.click(handle).await {
                tracing::debug!("Expand click {} failed on {}: {}", attempt + 1, url, e);
                break;
            }
            pause(plan.settle).await;
        }
    }

    renderer.content().await
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

//! Link discovery across the paginated listing of one target
//!
//! Discovery is strictly sequential: page `n + 1` is only rendered once the
//! links of page `n` are merged, because the stopping decision depends on the
//! cumulative frontier. There is no "last page" signal on the site; a page
//! that adds nothing new ends discovery, but only from
//! `min_pages_before_stop` on, so a transiently empty early page does not
//! end it prematurely.

use crate::config::CrawlerConfig;
use crate::crawler::parser::extract_listing_links;
use crate::render::{render_page, PageRenderer, RenderSettings};
use crate::target::CrawlTarget;
use crate::RenderError;
use std::collections::HashSet;
use std::fmt;
use url::Url;

/// Deduplicated set of detail-page URLs for one target
///
/// Membership is by exact URL string. Insertion order is kept only so that
/// truncation is reproducible.
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    seen: HashSet<String>,
    order: Vec<String>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct URLs
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no URL has been merged yet
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns true if `url` is already in the frontier
    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    /// Merges links into the frontier and returns how many were new
    pub fn merge<I>(&mut self, links: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let before = self.order.len();
        for link in links {
            if self.seen.insert(link.clone()) {
                self.order.push(link);
            }
        }
        self.order.len() - before
    }

    /// Consumes the frontier, keeping at most `max` URLs
    pub fn into_truncated(mut self, max: usize) -> Vec<String> {
        self.order.truncate(max);
        self.order
    }
}

/// Why discovery of a target ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The frontier reached `max_links`
    LinkTarget,
    /// The given page added no new links
    NoNewLinks { page: u32 },
    /// The configured page cap was reached
    PageCap { page: u32 },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinkTarget => write!(f, "link target reached"),
            Self::NoNewLinks { page } => write!(f, "no new links on page {}", page),
            Self::PageCap { page } => write!(f, "page cap reached at page {}", page),
        }
    }
}

/// The stopping rule for paginated discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopPolicy {
    /// Frontier size at which discovery ends
    pub max_links: usize,

    /// First page index at which zero novelty ends discovery (at least 2)
    pub min_pages_before_stop: u32,

    /// Optional hard cap on the number of pages
    pub max_pages: Option<u32>,
}

impl StopPolicy {
    /// Builds the policy from crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_links: config.max_links,
            min_pages_before_stop: config.min_pages_before_stop,
            max_pages: (config.max_pages > 0).then_some(config.max_pages),
        }
    }

    /// Decides whether to stop after `page` added `new_links` links,
    /// leaving the frontier at `frontier_len`
    pub fn check(&self, page: u32, new_links: usize, frontier_len: usize) -> Option<StopReason> {
        if frontier_len >= self.max_links {
            return Some(StopReason::LinkTarget);
        }
        if new_links == 0 && page >= self.min_pages_before_stop {
            return Some(StopReason::NoNewLinks { page });
        }
        match self.max_pages {
            Some(cap) if page >= cap => Some(StopReason::PageCap { page }),
            _ => None,
        }
    }
}

/// Outcome of discovering one target
#[derive(Debug, Clone)]
pub struct Discovery {
    /// Distinct detail URLs, at most `max_links` of them
    pub links: Vec<String>,

    /// Listing pages rendered, including failed ones
    pub pages: u32,

    /// Listing pages that failed to render
    pub failed_pages: u32,

    pub stop: StopReason,
}

/// Drives the renderer through the listing pages of a target
///
/// Holds the rendering session exclusively for the duration of discovery.
pub struct FrontierController<'r, R: PageRenderer + ?Sized> {
    renderer: &'r mut R,
    base_url: Url,
    settings: RenderSettings,
    policy: StopPolicy,
}

impl<'r, R: PageRenderer + ?Sized> FrontierController<'r, R> {
    pub fn new(
        renderer: &'r mut R,
        base_url: Url,
        settings: RenderSettings,
        policy: StopPolicy,
    ) -> Self {
        Self {
            renderer,
            base_url,
            settings,
            policy,
        }
    }

    /// Discovers the detail links of `target`
    ///
    /// Page 1 is rendered with the expand interactions, later pages without.
    /// A page that fails to render counts as a page with zero links. Only a
    /// fatal renderer error is returned.
    pub async fn discover(&mut self, target: &CrawlTarget) -> Result<Discovery, RenderError> {
        let mut frontier = Frontier::new();
        let mut failed_pages = 0;
        let mut page = 1;

        let stop = loop {
            let links = match self.load_page(target, page).await {
                Ok(links) => links,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!("{}: page {} failed to render: {}", target, page, e);
                    failed_pages += 1;
                    Vec::new()
                }
            };

            let new_links = frontier.merge(links);
            tracing::info!(
                "{}: crawled {} links (page {}, {} new)",
                target,
                frontier.len(),
                page,
                new_links
            );

            if let Some(reason) = self.policy.check(page, new_links, frontier.len()) {
                break reason;
            }
            page += 1;
        };

        tracing::info!(
            "{}: discovery done with {} links over {} pages ({})",
            target,
            frontier.len(),
            page,
            stop
        );

        Ok(Discovery {
            links: frontier.into_truncated(self.policy.max_links),
            pages: page,
            failed_pages,
            stop,
        })
    }

    async fn load_page(&mut self, target: &CrawlTarget, page: u32) -> Result<Vec<String>, RenderError> {
        let url = target.page_url(self.base_url.as_str(), page);
        let html = if page == 1 {
            render_page(
                &mut *self.renderer,
                &url,
                self.settings.first_page_settle,
                Some(&self.settings.expand),
            )
            .await?
        } else {
            render_page(&mut *self.renderer, &url, self.settings.page_settle, None).await?
        };
        Ok(extract_listing_links(&html, &self.base_url))
    }
}

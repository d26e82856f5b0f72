//! Crawl targets: one (region, filter) pair and the listing URLs it covers
//!
//! The listing path of a target is `{listing-prefix}{region}{filter}`.
//! Page 1 is the bare listing path; page `n >= 2` appends `/p{n}`.

use crate::config::SiteConfig;
use std::fmt;

/// One (region, filter) pair to discover and harvest
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CrawlTarget {
    /// Region slug, e.g. "ha-noi"
    pub region: String,

    /// Filter suffix, "" for the unfiltered listing
    pub filter: String,

    listing_prefix: String,
}

impl CrawlTarget {
    /// Creates a target for the given region and filter suffix
    pub fn new(
        listing_prefix: impl Into<String>,
        region: impl Into<String>,
        filter: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            filter: filter.into(),
            listing_prefix: listing_prefix.into(),
        }
    }

    /// Expands the site configuration into every region × filter pair,
    /// regions outermost, in configuration order
    pub fn all(site: &SiteConfig) -> Vec<Self> {
        site.regions
            .iter()
            .flat_map(|region| {
                site.filters
                    .iter()
                    .map(move |filter| Self::new(&site.listing_prefix, region, filter))
            })
            .collect()
    }

    /// Path of the first listing page, relative to the site root
    pub fn listing_path(&self) -> String {
        format!("{}{}{}", self.listing_prefix, self.region, self.filter)
    }

    /// Absolute URL of the given listing page (1-based)
    pub fn page_url(&self, base_url: &str, page: u32) -> String {
        let base = base_url.trim_end_matches('/');
        if page <= 1 {
            format!("{}{}", base, self.listing_path())
        } else {
            format!("{}{}/p{}", base, self.listing_path(), page)
        }
    }

    /// Returns true if this is the unfiltered listing of its region
    pub fn is_unfiltered(&self) -> bool {
        self.filter.is_empty()
    }
}

impl fmt::Display for CrawlTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.listing_path())
    }
}

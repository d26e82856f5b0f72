use serde::Deserialize;

/// Main configuration structure for Oto-Harvest
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Target site and the regions to crawl on it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SiteConfig {
    /// Scheme and host of the classifieds site, no trailing slash
    pub base_url: String,

    /// Path prefix placed before every region slug
    pub listing_prefix: String,

    /// Region slugs, crawled in this order
    pub regions: Vec<String>,

    /// Sub-path filters applied to every region ("" is the unfiltered listing)
    pub filters: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://oto.com.vn".to_string(),
            listing_prefix: "/mua-ban-xe-".to_string(),
            regions: [
                "da-nang",
                "ha-noi",
                "hcm",
                "hai-phong",
                "bac-ninh",
                "thanh-hoa",
                "nghe-an",
                "binh-duong",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            filters: vec![String::new(), "/f167772165555".to_string()],
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// Maximum number of detail links kept per (region, filter) pair
    pub max_links: usize,

    /// Number of detail pages fetched concurrently
    pub workers: usize,

    /// Per-request timeout for detail pages (seconds)
    pub fetch_timeout_secs: u64,

    /// How many times the "load more" control is clicked on page 1
    pub expand_attempts: u32,

    /// A page without new links only stops discovery from this page index on
    pub min_pages_before_stop: u32,

    /// Hard cap on listing pages per target; 0 disables the cap
    pub max_pages: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_links: 10_000,
            workers: 15,
            fetch_timeout_secs: 10,
            expand_attempts: 3,
            min_pages_before_stop: 3,
            max_pages: 0,
        }
    }
}

/// Which renderer drives listing-page discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Headless Chrome, executes scripts and clicks "load more"
    Browser,
    /// Plain GET of the listing page, no interactions
    Http,
}

/// Rendering session configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RendererConfig {
    pub kind: RendererKind,

    /// XPath of the "load more" control on the first listing page
    pub expand_xpath: String,

    /// How long to wait for the expand control to become actionable (seconds)
    pub interaction_timeout_secs: u64,

    /// Pause after loading page 1 (milliseconds)
    pub first_page_settle_ms: u64,

    /// Pause after loading any later page (milliseconds)
    pub page_settle_ms: u64,

    /// Pause after each expand click (milliseconds)
    pub expand_settle_ms: u64,

    /// Attach to an already running Chrome instead of launching one
    pub remote_debugging_url: Option<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            kind: RendererKind::Browser,
            expand_xpath: "//*[contains(text(),'Hiển thị thêm')]".to_string(),
            interaction_timeout_secs: 10,
            first_page_settle_ms: 1000,
            page_settle_ms: 200,
            expand_settle_ms: 200,
            remote_debugging_url: None,
        }
    }
}

/// User agent strings presented to the site
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct UserAgentConfig {
    /// Used by the rendering session
    pub browser: String,

    /// Used by detail-page fetches
    pub fetch: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            browser: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            fetch: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputConfig {
    /// CSV file the dataset is appended to
    pub path: String,

    /// Drop records whose URL already appears in the output file
    pub skip_known_urls: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "data/raw.csv".to_string(),
            skip_known_urls: false,
        }
    }
}

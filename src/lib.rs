//! Oto-Harvest: a regional classifieds crawler
//!
//! This crate discovers vehicle-for-sale listings region by region, extracts
//! a structured record from every listing detail page, and appends the
//! collected records to a CSV dataset.

pub mod config;
pub mod crawler;
pub mod listing;
pub mod output;
pub mod render;
pub mod state;
pub mod target;

use thiserror::Error;

/// Main error type for Oto-Harvest operations
///
/// Only these errors abort a run. Failures of a single listing page or a
/// single detail page are contained where they happen and counted instead.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Renderer error: {0}")]
    Render(#[from] RenderError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Rendering-session errors
#[derive(Debug, Error)]
pub enum RenderError {
    /// The browser session could not be created. Fatal for the run.
    #[error("Failed to start rendering session: {0}")]
    SessionInit(String),

    #[error("Failed to load {url}: {message}")]
    Navigation { url: String, message: String },

    #[error("Page interaction failed: {0}")]
    Interaction(String),

    #[error("Failed to read rendered content: {0}")]
    Content(String),
}

impl RenderError {
    /// Returns true if the error ends the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::SessionInit(_))
    }
}

/// Detail-page markup did not match the expected structure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("Missing element matching '{0}'")]
    MissingElement(&'static str),

    #[error("Info entry {0} has no label")]
    MissingLabel(usize),

    #[error("Expected at least 7 info entries, found {0}")]
    TooFewEntries(usize),

    #[error("Model year is not an integer: '{0}'")]
    InvalidYear(String),
}

/// Failure of a single detail-page fetch
///
/// Every variant means the same thing to the orchestrator: the URL yields no
/// record. The variants only keep the tally honest.
#[derive(Debug, Error)]
pub enum DetailError {
    #[error("Request failed for {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Extraction failed for {url}: {source}")]
    Extraction { url: String, source: ExtractionError },
}

impl DetailError {
    /// Returns true if the page was fetched but its markup was unusable
    pub fn is_extraction(&self) -> bool {
        matches!(self, Self::Extraction { .. })
    }
}

/// Result type alias for Oto-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use listing::{ArityVariant, ListingRecord};
pub use state::CrawlPhase;
pub use target::CrawlTarget;

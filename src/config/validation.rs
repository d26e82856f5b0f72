use crate::config::types::{Config, CrawlerConfig, OutputConfig, RendererConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_renderer_config(&config.renderer)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the target site, regions and filters
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.regions.is_empty() {
        return Err(ConfigError::Validation(
            "at least one region is required".to_string(),
        ));
    }

    for region in &config.regions {
        validate_region_slug(region)?;
    }

    if config.filters.is_empty() {
        return Err(ConfigError::Validation(
            "at least one filter is required (use \"\" for the unfiltered listing)".to_string(),
        ));
    }

    for filter in &config.filters {
        if !filter.is_empty() && !filter.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "filter '{}' must be empty or start with '/'",
                filter
            )));
        }
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 100, got {}",
            config.workers
        )));
    }

    if config.max_links < 1 {
        return Err(ConfigError::Validation(
            "max-links must be >= 1".to_string(),
        ));
    }

    if config.fetch_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "fetch-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.min_pages_before_stop < 2 {
        return Err(ConfigError::Validation(format!(
            "min-pages-before-stop must be >= 2, got {}",
            config.min_pages_before_stop
        )));
    }

    Ok(())
}

/// Validates renderer configuration
fn validate_renderer_config(config: &RendererConfig) -> Result<(), ConfigError> {
    if config.expand_xpath.trim().is_empty() {
        return Err(ConfigError::Validation(
            "expand-xpath cannot be empty".to_string(),
        ));
    }

    if let Some(remote) = &config.remote_debugging_url {
        Url::parse(remote).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid remote-debugging-url: {}", e))
        })?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates a region slug: lowercase letters, digits and hyphens
fn validate_region_slug(slug: &str) -> Result<(), ConfigError> {
    if slug.is_empty() {
        return Err(ConfigError::Validation(
            "region slug cannot be empty".to_string(),
        ));
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "region '{}' must contain only lowercase letters, digits and hyphens",
            slug
        )));
    }

    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(ConfigError::Validation(format!(
            "region '{}' cannot start or end with '-'",
            slug
        )));
    }

    Ok(())
}

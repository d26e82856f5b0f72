//! Oto-Harvest main entry point
//!
//! This is the command-line interface for the Oto-Harvest listing crawler.

use anyhow::Context;
use clap::Parser;
use oto_harvest::config::{load_config_with_hash, validate, Config};
use oto_harvest::crawler::run_harvest;
use oto_harvest::output::print_statistics;
use oto_harvest::target::CrawlTarget;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Oto-Harvest: a regional classifieds crawler
///
/// Oto-Harvest walks the listing pages of every configured region, fetches
/// each vehicle detail page it finds, and appends the extracted records to
/// a CSV dataset.
#[derive(Parser, Debug)]
#[command(name = "oto-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A regional classifieds crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            let config = Config::default();
            validate(&config).context("Built-in configuration is invalid")?;
            config
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_harvest(&config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("oto_harvest=info,warn"),
            1 => EnvFilter::new("oto_harvest=debug,info"),
            2 => EnvFilter::new("oto_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the settings and every listing URL
fn handle_dry_run(config: &Config) {
    println!("=== Oto-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Regions: {}", config.site.regions.join(", "));

    println!("\nCrawler Configuration:");
    println!("  Max links per target: {}", config.crawler.max_links);
    println!("  Workers: {}", config.crawler.workers);
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout_secs);
    println!("  Expand attempts: {}", config.crawler.expand_attempts);
    println!(
        "  Min pages before stop: {}",
        config.crawler.min_pages_before_stop
    );
    if config.crawler.max_pages > 0 {
        println!("  Max pages per target: {}", config.crawler.max_pages);
    }

    println!("\nRenderer: {:?}", config.renderer.kind);

    println!("\nOutput:");
    println!("  Dataset: {}", config.output.path);
    println!("  Skip known URLs: {}", config.output.skip_known_urls);

    let targets = CrawlTarget::all(&config.site);
    println!("\nTargets ({}):", targets.len());
    for target in &targets {
        println!("  - {}", target.page_url(&config.site.base_url, 1));
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main harvest operation
async fn handle_harvest(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        "Regions: {}, filters: {}, renderer: {:?}",
        config.site.regions.len(),
        config.site.filters.len(),
        config.renderer.kind
    );

    let stats = run_harvest(config).await.context("Harvest failed")?;

    tracing::info!("Harvest completed successfully");
    print_statistics(&stats);
    Ok(())
}

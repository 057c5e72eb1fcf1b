//! Storyharvest main entry point
//!
//! This is the command-line interface for the storyharvest article crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use storyharvest::config::{load_config_with_hash, Config};
use storyharvest::crawler::run_crawl;
use storyharvest::output::write_stories;
use tracing_subscriber::EnvFilter;

/// Storyharvest: a profile-driven article crawler
///
/// Storyharvest walks the paginated article listings described by the
/// configured site profiles, extracts each article's title and body text,
/// and writes the collected stories as a JSON array.
#[derive(Parser, Debug)]
#[command(name = "storyharvest")]
#[command(version)]
#[command(about = "Collects articles from configured sites", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without fetching anything
    #[arg(long)]
    dry_run: bool,

    /// Write the collected stories here instead of the configured path
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    // Run the crawl
    let sink = run_crawl(&config).await?;

    // Persist the collected stories
    let output_path = cli
        .output
        .unwrap_or_else(|| PathBuf::from(&config.output.stories_path));
    write_stories(&output_path, sink.records())
        .with_context(|| format!("failed to write {}", output_path.display()))?;
    tracing::info!("Wrote {} stories to {}", sink.len(), output_path.display());

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("storyharvest=info,warn"),
            1 => EnvFilter::new("storyharvest=debug,info"),
            2 => EnvFilter::new("storyharvest=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Storyharvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Request timeout: {}ms", config.crawler.request_timeout_ms);
    match config.crawler.max_pages_per_site {
        Some(cap) => println!("  Max pages per site: {}", cap),
        None => println!("  Max pages per site: unlimited"),
    }

    println!("\nOutput:");
    println!("  Stories: {}", config.output.stories_path);

    println!("\nSites ({}):", config.sites.len());
    for site in &config.sites {
        println!("  - {} ({})", site.name, site.base_url);
        println!("    delay: {}ms", site.delay_ms);
        println!("    listing: {}", site.listing_selector);
        println!("    links: {}", site.link_selector);
        println!("    title: {}", site.title_selector);
        println!("    content: {}", site.content_selector);
        if !site.exclude_selectors.is_empty() {
            println!("    exclude: {}", site.exclude_selectors.join(", "));
        }
        match &site.pagination_selector {
            Some(selector) => println!("    pagination: {}", selector),
            None => println!("    pagination: (none)"),
        }
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {} site(s)", config.sites.len());
}

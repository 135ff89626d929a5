//! # newsgather
//!
//! A config-driven news-article collector. Each configured source is a
//! data-only site profile (selectors, pagination hints, an article cap)
//! interpreted by one generic engine:
//!
//! 1. **Discovery**: crawl the source's paginated listing pages for unique
//!    article URLs, newest first, up to the per-source cap
//! 2. **Extraction**: fetch each article and extract title, date, and body
//!    with a readability pass, falling back to the profile's CSS selectors
//!    field-by-field
//! 3. **Filtering**: normalize the publication date and apply the run's
//!    temporal policy (unrestricted, today-only, or an explicit range)
//! 4. **Output**: write the aggregated records to a JSON file, atomically,
//!    only if every source produced links
//!
//! Summarization and deduplication of the collected records are external
//! collaborators; this binary's contract with them is the stable, ordered
//! record list it persists.
//!
//! ## Usage
//!
//! ```sh
//! newsgather -c sources.toml -o articles.json --today-only
//! ```

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod dates;
mod discover;
mod extract;
mod fetch;
mod models;
mod orchestrate;
mod outputs;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("newsgather starting up");

    // Parse CLI and validate the temporal policy before touching anything.
    let args = Cli::parse();
    debug!(?args.config, ?args.output, "Parsed CLI arguments");
    let policy = args.temporal_policy()?;
    info!(?policy, "Temporal policy for this run");

    // Fatal configuration errors surface here, before any network call.
    let profiles = config::load_profiles(&args.config)?;

    let client = fetch::build_client()?;
    let today = Local::now().date_naive();

    let articles = orchestrate::scrape_all(&client, &profiles, policy, today).await?;
    info!(count = articles.len(), "Collected articles");

    outputs::json::write_articles(&articles, &args.output).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        articles = articles.len(),
        "Execution complete"
    );

    Ok(())
}

//! Run orchestration across all configured sources.
//!
//! Sources are processed strictly in config order, links within a source in
//! listing order, one fetch at a time. Each extraction outcome is classified:
//! appended, warned-and-skipped (empty or sentinel content), out-of-policy
//! (stop this source's remaining links), or total failure (log and continue).
//!
//! A source whose discovery phase yields zero links fails the entire run.
//! Publishing a partial result that silently omits a whole source is worse
//! than publishing nothing, so the caller writes no output on error.

use crate::config::SiteProfile;
use crate::dates::TemporalPolicy;
use crate::discover::discover;
use crate::extract::extract;
use crate::models::{ArticleRecord, ExtractOutcome};
use chrono::NaiveDate;
use reqwest::Client;
use std::error::Error;
use std::fmt;
use tracing::{error, info, instrument, warn};

/// Run-fatal failure during scraping.
#[derive(Debug)]
pub enum RunError {
    /// A source's discovery phase produced zero links; the run is aborted
    /// and no output is written.
    SourceExhausted { source: String },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::SourceExhausted { source } => {
                write!(f, "no article links discovered for source '{source}'; aborting run")
            }
        }
    }
}

impl Error for RunError {}

/// Scrape every configured source and aggregate the successful records.
///
/// `today` is the reference date for the temporal policy, injected so
/// today-only runs are deterministic under test.
#[instrument(level = "info", skip_all, fields(sources = profiles.len()))]
pub async fn scrape_all(
    client: &Client,
    profiles: &[SiteProfile],
    policy: TemporalPolicy,
    today: NaiveDate,
) -> Result<Vec<ArticleRecord>, RunError> {
    let mut all_articles: Vec<ArticleRecord> = Vec::new();

    for profile in profiles {
        info!(source = %profile.name, "Scraping source");
        let links = discover(client, profile).await;
        if links.is_empty() {
            error!(source = %profile.name, "No article links discovered");
            return Err(RunError::SourceExhausted { source: profile.name.clone() });
        }

        let total = links.len();
        info!(source = %profile.name, count = total, "Scraping discovered articles");
        for (i, link) in links.iter().enumerate() {
            info!(index = i + 1, total, url = %link, "Scraping article");
            match extract(client, profile, link, policy, today).await {
                ExtractOutcome::Article(record) if record.has_content() => {
                    all_articles.push(record);
                }
                ExtractOutcome::Article(_) => {
                    warn!(url = %link, "No content found; skipping article");
                }
                ExtractOutcome::OutOfPolicy => {
                    // Listing order is assumed newest-first; everything after
                    // an out-of-policy article is older still.
                    warn!(
                        source = %profile.name,
                        remaining = total - i - 1,
                        "Out-of-policy date; skipping this source's remaining links"
                    );
                    break;
                }
                ExtractOutcome::Failed => {
                    warn!(url = %link, "Failed to scrape article; continuing");
                }
            }
        }
    }

    info!(count = all_articles.len(), "Aggregated articles from all sources");
    Ok(all_articles)
}

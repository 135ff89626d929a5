//! Atomic JSON persistence for collected articles.
//!
//! Records are serialized as a pretty-printed JSON array in collection order
//! (field order: source, url, date, title, cleaned_text). The file is
//! written to a `.tmp` sibling first and renamed into place, so a crash
//! mid-write never leaves a truncated output file behind.

use crate::models::ArticleRecord;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Serialize the collected articles to `path`, atomically.
///
/// Creates the parent directory if missing. Only called once the discovery
/// phase has succeeded for every source.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = articles.len()))]
pub async fn write_articles(articles: &[ArticleRecord], path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(articles)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json).await?;
    fs::rename(&tmp_path, path).await?;
    info!("Wrote collected articles");

    Ok(())
}

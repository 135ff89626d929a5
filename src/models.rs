//! Data models for collected news articles and extraction outcomes.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ArticleRecord`]: One extracted article, as persisted to JSON
//! - [`ExtractOutcome`]: The classified result of extracting a single URL
//! - Sentinel strings used when a field cannot be located on a page
//!
//! The serde field order of [`ArticleRecord`] is the persisted field order
//! (source, url, date, title, cleaned_text) and must not be reordered.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Placeholder recorded when neither extraction tier locates a title.
pub const TITLE_NOT_FOUND: &str = "Title not found";
/// Placeholder recorded when neither extraction tier locates article content.
pub const CONTENT_NOT_FOUND: &str = "Content not found";
/// Placeholder recorded when the configured date element is missing entirely.
pub const DATE_NOT_FOUND: &str = "Date not found";

/// One fully extracted news article.
///
/// Produced exactly once per successfully fetched URL by the extractor and
/// never mutated afterwards; downstream stages only filter the list or work
/// on copies.
///
/// The `date` field holds either a canonical `dd-mm-YYYY` string, a
/// descriptive parse-failure message, or the [`DATE_NOT_FOUND`] sentinel.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// Name of the configured source this article came from.
    pub source: String,
    /// Absolute URL the article was fetched from.
    pub url: String,
    /// Publication date: canonical `dd-mm-YYYY`, a parse-failure message, or a sentinel.
    pub date: String,
    /// Article headline, or [`TITLE_NOT_FOUND`].
    pub title: String,
    /// Whitespace-collapsed body text, or [`CONTENT_NOT_FOUND`].
    pub cleaned_text: String,
}

impl ArticleRecord {
    /// Whether the record carries usable body text.
    ///
    /// Records whose content is empty or equals the [`CONTENT_NOT_FOUND`]
    /// sentinel are warned about and skipped rather than aggregated.
    pub fn has_content(&self) -> bool {
        !self.cleaned_text.is_empty() && self.cleaned_text != CONTENT_NOT_FOUND
    }
}

/// Classified result of extracting one URL.
///
/// Keeps "the page produced a record", "the date failed the temporal policy",
/// and "the fetch itself failed" distinguishable, so the orchestrator can
/// decide between appending, stopping the source, and moving on.
#[derive(Debug)]
pub enum ExtractOutcome {
    /// Extraction produced a record (its content may still be a sentinel).
    Article(ArticleRecord),
    /// The resolved date failed the run's temporal policy. Sources list
    /// newest-first, so the source's remaining links are also out of policy
    /// and the caller stops the source.
    OutOfPolicy,
    /// The page could not be fetched at all; logged and skipped.
    Failed,
}

/// Remove the records at the given zero-based positions, preserving the
/// order of the survivors.
///
/// This is the contract with the external summarization/deduplication step:
/// it receives the aggregated list and hands back a set of positions to
/// delete. Indexing is against the list exactly as handed off; out-of-range
/// indices are ignored.
pub fn apply_removals(articles: &mut Vec<ArticleRecord>, remove: &HashSet<usize>) {
    let mut idx = 0;
    articles.retain(|_| {
        let keep = !remove.contains(&idx);
        idx += 1;
        keep
    });
}

//! Pagination-aware article link discovery.
//!
//! Crawls a source's paginated listing pages and produces a deduplicated,
//! order-preserving sequence of candidate article URLs, capped at the
//! profile's `max_articles`. Relative hrefs are resolved against the page
//! they appear on, so pagination across path prefixes behaves correctly.
//!
//! Discovery is deliberately infallible: a listing fetch failure ends the
//! crawl and returns whatever was collected so far. The orchestrator decides
//! what an empty result means for the run.

use crate::config::SiteProfile;
use crate::fetch::fetch_page;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};
use url::Url;

static ANY_ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Crawl one source's listing pages and collect unique article URLs.
///
/// Stops when `max_articles` links are collected, the next page cannot be
/// resolved, a page contributes no new links (the repeat-page guard against
/// pagination loops), or a listing fetch fails (partial result).
#[instrument(level = "info", skip_all, fields(source = %profile.name))]
pub async fn discover(client: &Client, profile: &SiteProfile) -> Vec<String> {
    let mut visited: HashSet<String> = HashSet::new();
    let mut collected: Vec<String> = Vec::new();
    let mut pages_visited = 0usize;
    let mut current = Some(profile.homepage.clone());

    while let Some(page_url) = current.take() {
        let Some(body) = fetch_page(client, page_url.as_str()).await else {
            warn!(
                url = %page_url,
                collected = collected.len(),
                "Listing fetch failed; returning partial result"
            );
            break;
        };
        pages_visited += 1;

        let document = Html::parse_document(&body);
        let mut new_links = 0usize;
        for element in document.select(&profile.article_link_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Ok(resolved) = page_url.join(href) else {
                debug!(href, "Skipping unresolvable href");
                continue;
            };
            let resolved = resolved.to_string();
            if profile.skip_urls.iter().any(|skip| skip == &resolved) {
                debug!(url = %resolved, "Skipping denylisted link");
                continue;
            }
            if !visited.insert(resolved.clone()) {
                continue;
            }
            collected.push(resolved);
            new_links += 1;
            if collected.len() >= profile.max_articles {
                info!(
                    count = collected.len(),
                    pages = pages_visited,
                    "Reached max_articles; truncating discovery"
                );
                return collected;
            }
        }

        if new_links == 0 {
            debug!(url = %page_url, "Page contributed no new links; stopping pagination");
            break;
        }

        current = next_page_url(&document, &page_url, profile);
    }

    info!(
        count = collected.len(),
        pages = pages_visited,
        "Indexed article URLs"
    );
    collected
}

/// Resolve the next listing page with the two-tier fallback.
///
/// The configured `next_page_selector` anchor wins; failing that, the first
/// anchor whose visible text contains `link_text_contains`. Neither
/// resolving ends pagination.
fn next_page_url(document: &Html, page_url: &Url, profile: &SiteProfile) -> Option<Url> {
    if let Some(selector) = &profile.next_page_selector {
        if let Some(href) = document
            .select(selector)
            .next()
            .and_then(|el| el.value().attr("href"))
        {
            if let Ok(next) = page_url.join(href) {
                return Some(next);
            }
        }
    }

    if let Some(needle) = &profile.link_text_contains {
        for element in document.select(&ANY_ANCHOR) {
            let text = element.text().collect::<Vec<_>>().join(" ");
            if text.contains(needle.as_str()) {
                if let Some(href) = element.value().attr("href") {
                    if let Ok(next) = page_url.join(href) {
                        return Some(next);
                    }
                }
            }
        }
    }

    None
}

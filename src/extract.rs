//! Two-tier article extraction.
//!
//! The primary tier runs the page through the `readability` content
//! extractor and reads the publish date from document metadata
//! (`article:published_time` and friends). Whatever the primary tier fails
//! to produce is retried field-by-field against the profile's configured
//! selectors on the same fetched markup. A field both tiers miss resolves to
//! a "not found" sentinel, which is distinct from the total failure of the
//! fetch itself.
//!
//! The temporal policy is evaluated as soon as the date is resolved, before
//! any title or content work: one out-of-policy article means the source's
//! remaining (older) links are out of policy too, and the orchestrator stops
//! the source.

use crate::config::SiteProfile;
use crate::dates::{self, TemporalPolicy};
use crate::fetch::fetch_page;
use crate::models::{ArticleRecord, ExtractOutcome, CONTENT_NOT_FOUND, DATE_NOT_FOUND, TITLE_NOT_FOUND};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use std::io::Cursor;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Metadata locations checked for a publish date, in priority order.
static META_DATE_SELECTORS: Lazy<Vec<(Selector, &'static str)>> = Lazy::new(|| {
    vec![
        (Selector::parse(r#"meta[property="article:published_time"]"#).unwrap(), "content"),
        (Selector::parse(r#"meta[itemprop="datePublished"]"#).unwrap(), "content"),
        (Selector::parse(r#"meta[name="date"]"#).unwrap(), "content"),
        (Selector::parse("time[datetime]").unwrap(), "datetime"),
    ]
});

/// Fetch one URL and build an [`ArticleRecord`] from it.
///
/// Returns [`ExtractOutcome::Failed`] when the page cannot be fetched at
/// all, [`ExtractOutcome::OutOfPolicy`] when the resolved date fails the
/// run's temporal policy, and a record otherwise. Field-level misses never
/// fail the extraction; they resolve to sentinels.
#[instrument(level = "info", skip_all, fields(source = %profile.name, %url))]
pub async fn extract(
    client: &Client,
    profile: &SiteProfile,
    url: &str,
    policy: TemporalPolicy,
    today: NaiveDate,
) -> ExtractOutcome {
    let Some(body) = fetch_page(client, url).await else {
        return ExtractOutcome::Failed;
    };
    let Ok(page_url) = Url::parse(url) else {
        warn!("Discovered link is not an absolute URL");
        return ExtractOutcome::Failed;
    };

    // Primary tier. A readability failure demotes every field to the
    // selector fallback; it never aborts the extraction.
    let primary = {
        let mut reader = Cursor::new(body.as_bytes());
        match readability::extractor::extract(&mut reader, &page_url) {
            Ok(product) => Some(product),
            Err(e) => {
                debug!(error = %e, "Primary extraction failed; using selector fallback");
                None
            }
        }
    };

    let document = Html::parse_document(&body);

    let date = resolve_date(&document, profile);
    debug!(%date, "Resolved article date");
    if !policy.admits(&date, today) {
        info!(%date, "Article date out of policy");
        return ExtractOutcome::OutOfPolicy;
    }

    let title = primary
        .as_ref()
        .map(|p| p.title.trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| select_text(&document, &profile.title_selector))
        .unwrap_or_else(|| TITLE_NOT_FOUND.to_string());

    let cleaned_text = primary
        .as_ref()
        .map(|p| collapse_whitespace(&p.text))
        .filter(|t| !t.is_empty())
        .or_else(|| fallback_content(&document, profile))
        .unwrap_or_else(|| CONTENT_NOT_FOUND.to_string());

    ExtractOutcome::Article(ArticleRecord {
        source: profile.name.clone(),
        url: url.to_string(),
        date,
        title,
        cleaned_text,
    })
}

/// Resolve the publication date field: metadata first, then the configured
/// selector, each passed through the normalizer. A missing element or
/// attribute yields the [`DATE_NOT_FOUND`] sentinel; normalizer failures
/// yield their descriptive message.
fn resolve_date(document: &Html, profile: &SiteProfile) -> String {
    let raw = metadata_date(document).or_else(|| selector_date(document, profile));
    match raw {
        Some(text) => match dates::normalize(&text) {
            Ok(canonical) => canonical,
            Err(e) => e.to_string(),
        },
        None => DATE_NOT_FOUND.to_string(),
    }
}

fn metadata_date(document: &Html) -> Option<String> {
    for (selector, attr) in META_DATE_SELECTORS.iter() {
        if let Some(value) = document
            .select(selector)
            .next()
            .and_then(|el| el.value().attr(attr))
        {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

fn selector_date(document: &Html, profile: &SiteProfile) -> Option<String> {
    let element = document.select(&profile.date_selector).next()?;
    let raw = match &profile.date_attribute {
        Some(attr) => element.value().attr(attr)?.to_string(),
        None => element.text().collect::<Vec<_>>().join(" "),
    };
    let raw = raw.trim().to_string();
    if raw.is_empty() { None } else { Some(raw) }
}

fn select_text(document: &Html, selector: &Selector) -> Option<String> {
    let element = document.select(selector).next()?;
    let text = element.text().collect::<Vec<_>>().join(" ");
    let text = collapse_whitespace(&text);
    if text.is_empty() { None } else { Some(text) }
}

/// Concatenate the text of every `content_selector` match with single
/// spaces, then collapse runs of whitespace.
fn fallback_content(document: &Html, profile: &SiteProfile) -> Option<String> {
    let parts: Vec<String> = document
        .select(&profile.content_selector)
        .map(|el| el.text().collect::<Vec<_>>().join(" "))
        .collect();
    if parts.is_empty() {
        return None;
    }
    let joined = collapse_whitespace(&parts.join(" "));
    if joined.is_empty() { None } else { Some(joined) }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_profile(name: &str) -> SiteProfile {
        SiteProfile {
            name: name.to_string(),
            homepage: Url::parse("https://example.com").unwrap(),
            article_link_selector: Selector::parse("a.article").unwrap(),
            next_page_selector: None,
            link_text_contains: None,
            title_selector: Selector::parse("h1.headline").unwrap(),
            date_selector: Selector::parse("span.byline-date").unwrap(),
            date_attribute: None,
            content_selector: Selector::parse("span.part").unwrap(),
            max_articles: 10,
            skip_urls: Vec::new(),
        }
    }

    async fn serve(server: &mut mockito::Server, path: &str, body: &str) -> String {
        server
            .mock("GET", path)
            .with_status(200)
            .with_body(body.to_string())
            .create_async()
            .await;
        format!("{}{}", server.url(), path)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    #[tokio::test]
    async fn test_metadata_date_and_title_fallback() {
        let mut server = mockito::Server::new_async().await;
        // No <title> element, so the primary tier has no title and the
        // configured selector supplies it. The metadata date outranks the
        // visible byline date.
        let url = serve(
            &mut server,
            "/story",
            r#"<html><head>
               <meta property="article:published_time" content="2025-06-10T08:00:00Z">
               </head><body>
               <h1 class="headline">Fallback Headline</h1>
               <span class="byline-date">9th June 2025</span>
               <div><p>First paragraph of the story, long enough to matter.</p>
               <p>Second paragraph with more detail.</p></div>
               </body></html>"#,
        )
        .await;

        let client = crate::fetch::build_client().unwrap();
        let outcome = extract(
            &client,
            &test_profile("example"),
            &url,
            TemporalPolicy::Unrestricted,
            today(),
        )
        .await;

        let ExtractOutcome::Article(record) = outcome else {
            panic!("expected a record");
        };
        assert_eq!(record.date, "10-06-2025");
        assert_eq!(record.title, "Fallback Headline");
        assert!(record.cleaned_text.contains("First paragraph"));
        assert_eq!(record.source, "example");
        assert_eq!(record.url, url);
    }

    #[tokio::test]
    async fn test_all_fields_missing_resolve_to_sentinels() {
        let mut server = mockito::Server::new_async().await;
        let url = serve(&mut server, "/empty", "<html><body></body></html>").await;

        let client = crate::fetch::build_client().unwrap();
        let outcome = extract(
            &client,
            &test_profile("example"),
            &url,
            TemporalPolicy::Unrestricted,
            today(),
        )
        .await;

        let ExtractOutcome::Article(record) = outcome else {
            panic!("expected a record");
        };
        assert_eq!(record.title, TITLE_NOT_FOUND);
        assert_eq!(record.date, DATE_NOT_FOUND);
        assert_eq!(record.cleaned_text, CONTENT_NOT_FOUND);
        assert!(!record.has_content());
    }

    #[tokio::test]
    async fn test_selector_date_normalized() {
        let mut server = mockito::Server::new_async().await;
        let url = serve(
            &mut server,
            "/dated",
            r#"<html><body>
               <span class="byline-date">23rd August 2024 - Breaking</span>
               <span class="part">Body text here.</span>
               </body></html>"#,
        )
        .await;

        let client = crate::fetch::build_client().unwrap();
        let outcome = extract(
            &client,
            &test_profile("example"),
            &url,
            TemporalPolicy::Unrestricted,
            today(),
        )
        .await;

        let ExtractOutcome::Article(record) = outcome else {
            panic!("expected a record");
        };
        assert_eq!(record.date, "23-08-2024");
    }

    #[tokio::test]
    async fn test_date_attribute_read_instead_of_text() {
        let mut server = mockito::Server::new_async().await;
        let url = serve(
            &mut server,
            "/attr-dated",
            r#"<html><body>
               <span class="byline-date" data-published="2025-06-01">last week</span>
               <span class="part">Body.</span>
               </body></html>"#,
        )
        .await;

        let client = crate::fetch::build_client().unwrap();
        let mut profile = test_profile("example");
        profile.date_attribute = Some("data-published".to_string());
        let outcome =
            extract(&client, &profile, &url, TemporalPolicy::Unrestricted, today()).await;

        let ExtractOutcome::Article(record) = outcome else {
            panic!("expected a record");
        };
        assert_eq!(record.date, "01-06-2025");
    }

    #[tokio::test]
    async fn test_content_selector_concatenation() {
        let mut server = mockito::Server::new_async().await;
        let url = serve(
            &mut server,
            "/parts",
            r#"<html><body><span class="part">Part   one.</span><span class="part">Part two.</span></body></html>"#,
        )
        .await;

        let client = crate::fetch::build_client().unwrap();
        let outcome = extract(
            &client,
            &test_profile("example"),
            &url,
            TemporalPolicy::Unrestricted,
            today(),
        )
        .await;

        let ExtractOutcome::Article(record) = outcome else {
            panic!("expected a record");
        };
        // Whichever tier produced it, runs of whitespace are collapsed.
        assert!(record.cleaned_text.contains("Part one."));
        assert!(record.cleaned_text.contains("Part two."));
        assert!(!record.cleaned_text.contains("  "));
    }

    #[tokio::test]
    async fn test_today_only_mismatch_is_out_of_policy() {
        let mut server = mockito::Server::new_async().await;
        let url = serve(
            &mut server,
            "/old",
            r#"<html><head>
               <meta property="article:published_time" content="2025-06-09T12:00:00Z">
               </head><body><span class="part">Old story.</span></body></html>"#,
        )
        .await;

        let client = crate::fetch::build_client().unwrap();
        let outcome = extract(
            &client,
            &test_profile("example"),
            &url,
            TemporalPolicy::TodayOnly,
            today(),
        )
        .await;
        assert!(matches!(outcome, ExtractOutcome::OutOfPolicy));
    }

    #[tokio::test]
    async fn test_range_excludes_outside_date() {
        let mut server = mockito::Server::new_async().await;
        let url = serve(
            &mut server,
            "/july",
            r#"<html><head>
               <meta property="article:published_time" content="2025-07-01T00:00:00Z">
               </head><body><span class="part">July story.</span></body></html>"#,
        )
        .await;

        let client = crate::fetch::build_client().unwrap();
        let policy = TemporalPolicy::Range {
            start: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        };
        let outcome = extract(&client, &test_profile("example"), &url, policy, today()).await;
        assert!(matches!(outcome, ExtractOutcome::OutOfPolicy));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_total_failure() {
        let client = crate::fetch::build_client().unwrap();
        let outcome = extract(
            &client,
            &test_profile("example"),
            "http://127.0.0.1:1/gone",
            TemporalPolicy::Unrestricted,
            today(),
        )
        .await;
        assert!(matches!(outcome, ExtractOutcome::Failed));
    }
}

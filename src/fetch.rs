//! HTTP fetch boundary.
//!
//! All network access goes through [`fetch_page`], which converts timeouts,
//! connection failures, and non-success HTTP statuses into `None` with a
//! warning log. Nothing past this boundary ever sees a network error as a
//! crash; callers treat a missing body as a recoverable, per-URL condition.

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, REFERER};
use std::time::Duration;
use tracing::warn;

/// Fixed per-request timeout. No retries are performed on failure.
const FETCH_TIMEOUT_SECS: u64 = 10;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

/// Build the shared HTTP client used for the whole run.
///
/// Carries a browser-like User-Agent, Accept-Language, and Referer, since
/// several news sites refuse obviously non-browser clients.
pub fn build_client() -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.google.com/"));

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
}

/// Fetch a URL and return its body text, or `None` on any failure.
///
/// A non-2xx status counts as a failure, matching the behavior of treating
/// error pages as unusable rather than parsing their markup.
pub async fn fetch_page(client: &Client, url: &str) -> Option<String> {
    let response = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            warn!(%url, error = %e, "Fetch failed");
            return None;
        }
    };
    let response = match response.error_for_status() {
        Ok(r) => r,
        Err(e) => {
            warn!(%url, error = %e, "Fetch returned error status");
            return None;
        }
    };
    match response.text().await {
        Ok(body) => Some(body),
        Err(e) => {
            warn!(%url, error = %e, "Failed reading response body");
            None
        }
    }
}

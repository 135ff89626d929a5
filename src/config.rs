//! Site-profile configuration loading and validation.
//!
//! Each configured source is a data-only profile interpreted by one generic
//! crawl/extract algorithm; there are no per-site code paths. Profiles are
//! loaded from a TOML file containing an ordered array of `[[sources]]`
//! tables:
//!
//! ```toml
//! [[sources]]
//! name = "example"
//! homepage = "https://example.com/news"
//! article_link_selector = "article h2 a"
//! title_selector = "h1.headline"
//! date_selector = "time"
//! date_attribute = "datetime"
//! content_selector = "div.article-body p"
//! next_page_selector = "a.pagination-next"
//! max_articles = 10
//! ```
//!
//! Every validation failure — unreadable file, no sources, a missing
//! required key, an unparsable selector or homepage URL — is a fatal
//! [`ConfigError`] raised before any network call. Selectors are compiled
//! here exactly once, so the crawl and extraction stages never see a
//! selector parse failure.

use scraper::Selector;
use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::path::Path;
use tracing::info;
use url::Url;

/// Default per-source article cap when `max_articles` is omitted.
const DEFAULT_MAX_ARTICLES: usize = 10;

/// Static description of how to crawl and extract one source.
///
/// Immutable once loaded; read-only to every downstream component.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    /// Unique source name, used as the `source` field of every record.
    pub name: String,
    /// Listing page where link discovery starts.
    pub homepage: Url,
    /// Matches the anchors pointing at articles on a listing page.
    pub article_link_selector: Selector,
    /// Matches the anchor pointing at the next listing page, if the source paginates.
    pub next_page_selector: Option<Selector>,
    /// Fallback next-page resolution: first anchor whose visible text contains this substring.
    pub link_text_contains: Option<String>,
    /// Fallback title selector when the primary extraction tier yields no title.
    pub title_selector: Selector,
    /// Fallback publication-date selector.
    pub date_selector: Selector,
    /// Read this attribute of the date element instead of its text.
    pub date_attribute: Option<String>,
    /// Fallback body selector; all matches are concatenated.
    pub content_selector: Selector,
    /// Hard cap on discovered links for this source.
    pub max_articles: usize,
    /// Exact-match denylist of known non-article links on the listing pages.
    pub skip_urls: Vec<String>,
}

/// Fatal configuration failure, raised before any network activity.
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Unreadable { path: String, message: String },
    /// The config file is not valid TOML.
    Invalid { path: String, message: String },
    /// The config file contains no `[[sources]]` entries.
    NoSources { path: String },
    /// Two sources share the same name.
    DuplicateName { name: String },
    /// A source is missing one of the required keys.
    MissingKey { source: String, key: &'static str },
    /// A selector value failed to compile.
    BadSelector { source: String, key: &'static str, message: String },
    /// The homepage value is not a valid absolute URL.
    BadHomepage { source: String, message: String },
    /// `max_articles` must be a positive integer.
    ZeroMaxArticles { source: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Unreadable { path, message } => {
                write!(f, "config file '{path}' not found or unreadable: {message}")
            }
            ConfigError::Invalid { path, message } => {
                write!(f, "config file '{path}' is not valid TOML: {message}")
            }
            ConfigError::NoSources { path } => {
                write!(f, "config file '{path}' does not define any sources")
            }
            ConfigError::DuplicateName { name } => {
                write!(f, "duplicate source name '{name}'")
            }
            ConfigError::MissingKey { source, key } => {
                write!(f, "source '{source}' missing required key: '{key}'")
            }
            ConfigError::BadSelector { source, key, message } => {
                write!(f, "source '{source}' has an invalid '{key}' selector: {message}")
            }
            ConfigError::BadHomepage { source, message } => {
                write!(f, "source '{source}' has an invalid homepage URL: {message}")
            }
            ConfigError::ZeroMaxArticles { source } => {
                write!(f, "source '{source}': max_articles must be a positive integer")
            }
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    sources: Vec<RawProfile>,
}

#[derive(Debug, Deserialize)]
struct RawProfile {
    name: Option<String>,
    homepage: Option<String>,
    article_link_selector: Option<String>,
    next_page_selector: Option<String>,
    link_text_contains: Option<String>,
    title_selector: Option<String>,
    date_selector: Option<String>,
    date_attribute: Option<String>,
    content_selector: Option<String>,
    max_articles: Option<usize>,
    #[serde(default)]
    skip_urls: Vec<String>,
}

/// Load and validate site profiles from a TOML config file.
///
/// Returns the profiles in file order, or the first [`ConfigError`]
/// encountered.
pub fn load_profiles(path: &Path) -> Result<Vec<SiteProfile>, ConfigError> {
    let display_path = path.display().to_string();
    let raw_text = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
        path: display_path.clone(),
        message: e.to_string(),
    })?;

    let raw: RawConfig = toml::from_str(&raw_text).map_err(|e| ConfigError::Invalid {
        path: display_path.clone(),
        message: e.to_string(),
    })?;

    if raw.sources.is_empty() {
        return Err(ConfigError::NoSources { path: display_path });
    }

    let mut profiles = Vec::with_capacity(raw.sources.len());
    for source in raw.sources {
        let profile = validate_profile(source)?;
        if profiles.iter().any(|p: &SiteProfile| p.name == profile.name) {
            return Err(ConfigError::DuplicateName { name: profile.name });
        }
        profiles.push(profile);
    }

    info!(count = profiles.len(), path = %display_path, "Loaded site profiles");
    Ok(profiles)
}

fn validate_profile(raw: RawProfile) -> Result<SiteProfile, ConfigError> {
    let name = raw
        .name
        .filter(|n| !n.is_empty())
        .ok_or(ConfigError::MissingKey { source: "<unnamed>".to_string(), key: "name" })?;

    let require = |value: Option<String>, key: &'static str| {
        value.filter(|v| !v.is_empty()).ok_or(ConfigError::MissingKey {
            source: name.clone(),
            key,
        })
    };

    let homepage_text = require(raw.homepage, "homepage")?;
    let homepage = Url::parse(&homepage_text).map_err(|e| ConfigError::BadHomepage {
        source: name.clone(),
        message: e.to_string(),
    })?;

    let compile = |value: &str, key: &'static str| {
        Selector::parse(value).map_err(|e| ConfigError::BadSelector {
            source: name.clone(),
            key,
            message: e.to_string(),
        })
    };

    let article_link_selector =
        compile(&require(raw.article_link_selector, "article_link_selector")?, "article_link_selector")?;
    let title_selector = compile(&require(raw.title_selector, "title_selector")?, "title_selector")?;
    let date_selector = compile(&require(raw.date_selector, "date_selector")?, "date_selector")?;
    let content_selector =
        compile(&require(raw.content_selector, "content_selector")?, "content_selector")?;

    let next_page_selector = match raw.next_page_selector.as_deref() {
        Some(s) if !s.is_empty() => Some(compile(s, "next_page_selector")?),
        _ => None,
    };

    let max_articles = raw.max_articles.unwrap_or(DEFAULT_MAX_ARTICLES);
    if max_articles == 0 {
        return Err(ConfigError::ZeroMaxArticles { source: name });
    }

    Ok(SiteProfile {
        name,
        homepage,
        article_link_selector,
        next_page_selector,
        link_text_contains: raw.link_text_contains.filter(|s| !s.is_empty()),
        title_selector,
        date_selector,
        date_attribute: raw.date_attribute.filter(|s| !s.is_empty()),
        content_selector,
        max_articles,
        skip_urls: raw.skip_urls,
    })
}

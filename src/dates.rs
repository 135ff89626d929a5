//! Date normalization and run-level temporal filtering.
//!
//! News sources publish dates in wildly different shapes: ISO timestamps in
//! meta tags, `"23rd August 2024 - Breaking"` in visible bylines, RFC 2822 in
//! the occasional feed leftover. [`normalize`] reconciles them into one
//! canonical `dd-mm-YYYY` string, or reports failure as a value the caller
//! embeds in the record instead of an error that aborts extraction.
//!
//! [`TemporalPolicy`] is the run-level rule deciding which article dates are
//! acceptable. It compares against an injected reference date rather than
//! reading the clock itself, so today-only behavior is deterministic in tests.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt;

/// The canonical publication-date format: day-month-year.
pub const CANONICAL_FORMAT: &str = "%d-%m-%Y";

static ORDINAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})(st|nd|rd|th)").unwrap());

/// Date text that could not be reconciled into a canonical date.
///
/// Carries the original text so the failure can be embedded in the record's
/// date field verbatim. Never propagated past the normalization boundary as
/// a run error.
#[derive(Debug)]
pub struct DateParseError {
    /// The text as it appeared on the page, before any cleanup.
    pub text: String,
}

impl fmt::Display for DateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not parse: {} (no known date format matched)", self.text)
    }
}

impl Error for DateParseError {}

/// Normalize arbitrary date text into canonical `dd-mm-YYYY` form.
///
/// Cleanup before parsing:
/// 1. Ordinal suffixes on day numbers are stripped (`23rd` becomes `23`).
/// 2. The text is truncated at the first dash-like character not immediately
///    followed by a digit, discarding trailing annotations such as
///    `" - Breaking"` while leaving `23-08-2024` intact.
///
/// The remaining text is tried against a chain of candidate formats; if none
/// match, a fuzzy pass keeps only date-like tokens (numbers and month names)
/// and retries. Already-canonical input passes through unchanged.
pub fn normalize(text: &str) -> Result<String, DateParseError> {
    let cleaned = ORDINAL_SUFFIX.replace_all(text, "$1");
    let cleaned = truncate_annotation(&cleaned);
    let cleaned = cleaned.trim();

    if let Some(date) = parse_candidate(cleaned) {
        return Ok(date.format(CANONICAL_FORMAT).to_string());
    }

    let date_tokens = cleaned
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| c == ',' || c == '.'))
        .filter(|t| t.chars().any(|c| c.is_ascii_digit()) || is_month_name(t))
        .collect::<Vec<_>>()
        .join(" ");
    if let Some(date) = parse_candidate(&date_tokens) {
        return Ok(date.format(CANONICAL_FORMAT).to_string());
    }

    Err(DateParseError { text: text.to_string() })
}

/// Cut the text at the first `-` or `–` whose next character is not a digit.
///
/// The regex crate has no lookahead, so this walks characters directly.
fn truncate_annotation(text: &str) -> &str {
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '-' || c == '–' {
            let followed_by_digit = chars
                .peek()
                .map(|(_, next)| next.is_ascii_digit())
                .unwrap_or(false);
            if !followed_by_digit {
                return &text[..i];
            }
        }
    }
    text
}

fn is_month_name(token: &str) -> bool {
    const MONTHS: [&str; 12] = [
        "january", "february", "march", "april", "may", "june", "july", "august", "september",
        "october", "november", "december",
    ];
    let lower = token.to_lowercase();
    if lower.len() < 3 {
        return false;
    }
    MONTHS.iter().any(|m| m.starts_with(&lower) || lower == *m)
}

/// Try one cleaned candidate string against the known date shapes.
fn parse_candidate(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.date_naive());
    }
    const DATETIME_FORMATS: [&str; 3] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%d-%m-%Y %H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }
    const DATE_FORMATS: [&str; 10] = [
        "%Y-%m-%d",
        "%d-%m-%Y",
        "%d/%m/%Y",
        "%d %B %Y",
        "%B %d, %Y",
        "%B %d %Y",
        "%d %b %Y",
        "%b %d, %Y",
        "%b %d %Y",
        "%d.%m.%Y",
    ];
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            return Some(d);
        }
    }
    None
}

/// The run-level rule deciding which article dates are acceptable.
///
/// Exactly one policy applies per run. `TodayOnly` and `Range` are mutually
/// exclusive at the CLI; `Range` is only constructed with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalPolicy {
    /// Every article is acceptable regardless of date.
    Unrestricted,
    /// Only articles dated the reference day are acceptable.
    TodayOnly,
    /// Only articles dated within `[start, end]` (inclusive) are acceptable.
    Range { start: NaiveDate, end: NaiveDate },
}

impl TemporalPolicy {
    /// Decide whether an article's resolved date field passes this policy.
    ///
    /// `date_str` is the record's date field: canonical form, a parse-failure
    /// message, or a "not found" sentinel. `TodayOnly` compares strings
    /// against the canonical rendering of `today`, so a sentinel never
    /// matches and stops the source like any stale date. `Range` admits
    /// dates it cannot parse: a range judgment is impossible for them, and
    /// refusing would discard the source tail on a mere missing byline.
    pub fn admits(&self, date_str: &str, today: NaiveDate) -> bool {
        match self {
            TemporalPolicy::Unrestricted => true,
            TemporalPolicy::TodayOnly => date_str == today.format(CANONICAL_FORMAT).to_string(),
            TemporalPolicy::Range { start, end } => {
                match NaiveDate::parse_from_str(date_str, CANONICAL_FORMAT) {
                    Ok(d) => *start <= d && d <= *end,
                    Err(_) => true,
                }
            }
        }
    }
}

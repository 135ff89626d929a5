//! Command-line interface definitions for newsgather.
//!
//! This module defines the CLI arguments and options using the `clap` crate,
//! including the run-level temporal policy flags. `--today-only` and the
//! `--from-date`/`--to-date` pair are mutually exclusive and validated here,
//! before any network activity.

use crate::dates::{TemporalPolicy, CANONICAL_FORMAT};
use chrono::NaiveDate;
use clap::Parser;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Command-line arguments for the newsgather application.
///
/// # Examples
///
/// ```sh
/// # Collect everything the configured sources list
/// newsgather -c sources.toml -o articles.json
///
/// # Only today's articles
/// newsgather --today-only
///
/// # An explicit date range (inclusive, day-month-year)
/// newsgather --from-date 01-06-2025 --to-date 30-06-2025
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the site-profiles TOML config file
    #[arg(short, long, default_value = "sources.toml")]
    pub config: PathBuf,

    /// Path of the JSON file to write collected articles to
    #[arg(short, long, default_value = "articles.json")]
    pub output: PathBuf,

    /// Keep only articles published today
    #[arg(long, conflicts_with_all = ["from_date", "to_date"])]
    pub today_only: bool,

    /// Start of an inclusive date range, dd-mm-YYYY
    #[arg(long, requires = "to_date")]
    pub from_date: Option<String>,

    /// End of an inclusive date range, dd-mm-YYYY
    #[arg(long, requires = "from_date")]
    pub to_date: Option<String>,
}

/// Invalid temporal-policy flags. Fatal before any crawl begins.
#[derive(Debug)]
pub struct PolicyError(String);

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid temporal policy: {}", self.0)
    }
}

impl Error for PolicyError {}

impl Cli {
    /// Build the run's temporal policy from the parsed flags.
    pub fn temporal_policy(&self) -> Result<TemporalPolicy, PolicyError> {
        if self.today_only {
            return Ok(TemporalPolicy::TodayOnly);
        }
        match (&self.from_date, &self.to_date) {
            (Some(from), Some(to)) => {
                let start = parse_flag_date("--from-date", from)?;
                let end = parse_flag_date("--to-date", to)?;
                if end < start {
                    return Err(PolicyError(format!(
                        "--to-date {to} is before --from-date {from}"
                    )));
                }
                Ok(TemporalPolicy::Range { start, end })
            }
            (None, None) => Ok(TemporalPolicy::Unrestricted),
            // clap's `requires` rejects a lone flag before we get here.
            _ => Err(PolicyError(
                "--from-date and --to-date must be given together".to_string(),
            )),
        }
    }
}

fn parse_flag_date(flag: &str, value: &str) -> Result<NaiveDate, PolicyError> {
    NaiveDate::parse_from_str(value, CANONICAL_FORMAT)
        .map_err(|e| PolicyError(format!("{flag} '{value}' is not a dd-mm-YYYY date: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["newsgather"]);
        assert_eq!(cli.config, PathBuf::from("sources.toml"));
        assert_eq!(cli.output, PathBuf::from("articles.json"));
        assert!(!cli.today_only);
        assert_eq!(cli.temporal_policy().unwrap(), TemporalPolicy::Unrestricted);
    }

    #[test]
    fn test_today_only_policy() {
        let cli = Cli::parse_from(["newsgather", "--today-only"]);
        assert_eq!(cli.temporal_policy().unwrap(), TemporalPolicy::TodayOnly);
    }

    #[test]
    fn test_range_policy() {
        let cli = Cli::parse_from([
            "newsgather",
            "--from-date",
            "01-06-2025",
            "--to-date",
            "30-06-2025",
        ]);
        let policy = cli.temporal_policy().unwrap();
        assert_eq!(
            policy,
            TemporalPolicy::Range {
                start: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            }
        );
    }

    #[test]
    fn test_today_only_conflicts_with_range() {
        let result = Cli::try_parse_from([
            "newsgather",
            "--today-only",
            "--from-date",
            "01-06-2025",
            "--to-date",
            "30-06-2025",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_date_requires_to_date() {
        let result = Cli::try_parse_from(["newsgather", "--from-date", "01-06-2025"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_end_before_start_rejected() {
        let cli = Cli::parse_from([
            "newsgather",
            "--from-date",
            "30-06-2025",
            "--to-date",
            "01-06-2025",
        ]);
        assert!(cli.temporal_policy().is_err());
    }

    #[test]
    fn test_malformed_date_rejected() {
        let cli = Cli::parse_from([
            "newsgather",
            "--from-date",
            "2025-06-01",
            "--to-date",
            "30-06-2025",
        ]);
        let err = cli.temporal_policy().unwrap_err();
        assert!(err.to_string().contains("--from-date"));
    }
}

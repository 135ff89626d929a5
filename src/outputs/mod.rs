//! Output generation for collected articles.
//!
//! Persistence is deliberately thin: the run aggregates records in memory
//! and only this module touches the filesystem, after every source has
//! succeeded.
//!
//! # Submodules
//!
//! - [`json`]: Writes the collected [`ArticleRecord`](crate::models::ArticleRecord)
//!   sequence to a JSON file atomically.

pub mod json;

//! Content retrieval for Scrivener.
//!
//! [`ScraperClient`] fetches human-written descriptive passages from a scraper
//! service over HTTP.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod scraper;

pub use scraper::{ScrapeRequest, ScraperClient};

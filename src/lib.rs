//! Searchlight: a polite single-host site-search engine
//!
//! This crate crawls a single web host under robots.txt constraints, builds
//! an on-disk inverted index of stemmed words and word-bigrams per document,
//! and answers ranked keyword/bigram/wildcard queries using TF-IDF scoring.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod index;
pub mod rank;
pub mod robots;
pub mod text;

use thiserror::Error;

/// Main error type for Searchlight operations
#[derive(Debug, Error)]
pub enum SearchlightError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error for {url}: {source}")]
    Fetch {
        url: String,
        source: crawler::FetchError,
    },

    #[error("Index error: {0}")]
    Index(#[from] index::IndexError),

    #[error("Sitemap parse error: {0}")]
    Sitemap(#[from] robots::SitemapError),

    #[error("Stopword list error: {0}")]
    Stopwords(#[from] text::StopwordError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for Searchlight operations
pub type Result<T> = std::result::Result<T, SearchlightError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use index::InvertedIndex;
pub use rank::{Ranker, SearchHit};
pub use robots::RobotsPolicy;
pub use text::TermFilter;

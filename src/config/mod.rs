//! Configuration module for Searchlight
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use searchlight::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("searchlight.toml")).unwrap();
//! println!("Crawling as: {}", config.crawler.user_agent);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, StopwordConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};

//! Stopword list loading
//!
//! The stopword file is a JSON array of strings, loaded once at startup.

use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading the stopword list
#[derive(Debug, Error)]
pub enum StopwordError {
    #[error("Failed to read stopword file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse stopword JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Loads a stopword set from a JSON array file
///
/// # Arguments
///
/// * `path` - Path to a JSON file containing an array of strings
///
/// # Returns
///
/// * `Ok(HashSet<String>)` - The loaded stopword set
/// * `Err(StopwordError)` - The file could not be read or parsed
pub fn load_stopwords(path: &Path) -> Result<HashSet<String>, StopwordError> {
    let content = std::fs::read_to_string(path)?;
    let words: Vec<String> = serde_json::from_str(&content)?;
    Ok(words.into_iter().collect())
}

//! Term normalization for indexing and querying
//!
//! This module owns the two text-level policies shared by the crawl pipeline
//! and the ranking engine: Snowball stemming (with case normalization) and
//! stopword filtering. Both are held by [`TermFilter`], which is built once
//! at startup and passed into the components that need it.

mod stopwords;

pub use stopwords::{load_stopwords, StopwordError};

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;

/// Stems raw tokens and filters stopwords
///
/// The stopword check runs against the *stemmed* form, so a stopword list
/// containing "the" also suppresses "The" and "THE".
pub struct TermFilter {
    stemmer: Stemmer,
    stopwords: HashSet<String>,
}

impl TermFilter {
    /// Creates a filter over the given stopword set
    pub fn new(stopwords: HashSet<String>) -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
            stopwords,
        }
    }

    /// Creates a filter with an empty stopword set (mainly for tests)
    pub fn without_stopwords() -> Self {
        Self::new(HashSet::new())
    }

    /// Stems a raw token, lowercasing first
    ///
    /// No stopword filtering is applied; this is the form used for query
    /// terms, which are looked up as-is.
    pub fn stem(&self, raw: &str) -> String {
        self.stemmer.stem(&raw.to_lowercase()).into_owned()
    }

    /// Stems a raw token for indexing
    ///
    /// Returns `None` when the token is empty or its stem is a stopword;
    /// such tokens are never written to the index.
    pub fn stem_indexable(&self, raw: &str) -> Option<String> {
        if raw.is_empty() {
            return None;
        }
        let stemmed = self.stem(raw);
        if self.stopwords.contains(&stemmed) {
            None
        } else {
            Some(stemmed)
        }
    }

    /// Stems both halves of a bigram
    ///
    /// Returns `None` when *either* half is a stopword: a bigram is only
    /// indexed if both words independently survive filtering, with no
    /// partial credit for the surviving half.
    pub fn stem_pair(&self, raw1: &str, raw2: &str) -> Option<(String, String)> {
        let first = self.stem_indexable(raw1)?;
        let second = self.stem_indexable(raw2)?;
        Some((first, second))
    }

    /// Checks whether a stemmed term is a stopword
    pub fn is_stopword(&self, stemmed: &str) -> bool {
        self.stopwords.contains(stemmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter_with(words: &[&str]) -> TermFilter {
        TermFilter::new(words.iter().map(|w| w.to_string()).collect())
    }

    #[test]
    fn test_stem_reduces_to_root() {
        let filter = TermFilter::without_stopwords();
        assert_eq!(filter.stem("running"), "run");
        assert_eq!(filter.stem("computers"), "comput");
    }

    #[test]
    fn test_stem_lowercases() {
        let filter = TermFilter::without_stopwords();
        assert_eq!(filter.stem("Running"), "run");
        assert_eq!(filter.stem("CAT"), "cat");
    }

    #[test]
    fn test_stopword_not_indexable() {
        let filter = filter_with(&["the", "a"]);
        assert_eq!(filter.stem_indexable("the"), None);
        assert_eq!(filter.stem_indexable("The"), None);
        assert_eq!(filter.stem_indexable("cat"), Some("cat".to_string()));
    }

    #[test]
    fn test_empty_token_not_indexable() {
        let filter = TermFilter::without_stopwords();
        assert_eq!(filter.stem_indexable(""), None);
    }

    #[test]
    fn test_stem_pair_both_survive() {
        let filter = filter_with(&["the"]);
        assert_eq!(
            filter.stem_pair("computer", "science"),
            Some(("comput".to_string(), "scienc".to_string()))
        );
    }

    #[test]
    fn test_stem_pair_dropped_when_either_is_stopword() {
        let filter = filter_with(&["the", "a"]);
        assert_eq!(filter.stem_pair("the", "cat"), None);
        assert_eq!(filter.stem_pair("cat", "a"), None);
    }

    #[test]
    fn test_query_stem_ignores_stopwords() {
        // Query-side stemming does not filter; absent words simply miss the index.
        let filter = filter_with(&["the"]);
        assert_eq!(filter.stem("the"), "the");
    }
}

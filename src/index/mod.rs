//! Inverted index maintenance
//!
//! This module owns all read/write operations against the index: stemming
//! and stopword filtering on the way in, unigram and bigram occurrence
//! counting with snippet capture, and the lookups the ranking engine reads.

mod schema;
mod store;

pub use schema::{initialize_schema, SCHEMA_SQL};
pub use store::{IndexStats, IndexStore};

use crate::extract::Extraction;
use crate::text::TermFilter;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Errors that can occur during index operations
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Cannot derive database name from URL: {0}")]
    DatabaseName(String),
}

/// Result of indexing one document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOutcome {
    /// The document was tokenized and written to the index
    Indexed { words: usize, bigrams: usize },
    /// The document already had occurrence rows; nothing was written
    AlreadyIndexed,
}

/// The inverted index: storage plus the term pipeline that feeds it
pub struct InvertedIndex {
    store: IndexStore,
    filter: TermFilter,
}

impl InvertedIndex {
    /// Opens (or creates) an index database at the given path
    pub fn open(path: &Path, filter: TermFilter) -> Result<Self, IndexError> {
        Ok(Self {
            store: IndexStore::open(path)?,
            filter,
        })
    }

    /// Creates an in-memory index (for testing)
    pub fn open_in_memory(filter: TermFilter) -> Result<Self, IndexError> {
        Ok(Self {
            store: IndexStore::open_in_memory()?,
            filter,
        })
    }

    /// The underlying storage, for direct reads
    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    /// The term filter shared with the ranking engine
    pub fn filter(&self) -> &TermFilter {
        &self.filter
    }

    /// Records a document row for a URL (created on first fetch attempt)
    pub fn ensure_document(&self, url: &str) -> Result<i64, IndexError> {
        self.store.ensure_url(url)
    }

    /// Indexes one raw word sighting on a document
    ///
    /// The word is stemmed and dropped if the stem is a stopword; otherwise
    /// the word row is created if needed and the occurrence row inserted
    /// (count 1, with the given representative sentence) or incremented.
    pub fn index_word(
        &self,
        url_id: i64,
        raw_word: &str,
        sentence_id: i64,
    ) -> Result<(), IndexError> {
        match self.filter.stem_indexable(raw_word) {
            Some(stemmed) => self.index_stemmed(url_id, &stemmed, sentence_id),
            None => Ok(()),
        }
    }

    fn index_stemmed(&self, url_id: i64, stemmed: &str, sentence_id: i64) -> Result<(), IndexError> {
        let word_id = self.store.ensure_word(stemmed)?;
        self.store.upsert_occurrence(url_id, word_id, sentence_id)
    }

    /// Indexes one adjacent word pair on a document
    ///
    /// Both words are stemmed independently; if either is a stopword the
    /// whole pair is discarded with no partial entry. The key is the stemmed
    /// pair in original order.
    pub fn index_bigram(
        &self,
        url_id: i64,
        raw_word1: &str,
        raw_word2: &str,
        sentence_id: i64,
    ) -> Result<(), IndexError> {
        let (first, second) = match self.filter.stem_pair(raw_word1, raw_word2) {
            Some(pair) => pair,
            None => return Ok(()),
        };
        let word1_id = self.store.ensure_word(&first)?;
        let word2_id = self.store.ensure_word(&second)?;
        self.store
            .upsert_bigram(url_id, word1_id, word2_id, sentence_id)
    }

    /// Indexes a full extraction for a document
    ///
    /// Skips the document entirely when it already has occurrence rows
    /// (idempotent re-crawl). Otherwise indexes every token as a unigram,
    /// every adjacent token pair as a bigram, and attaches the title.
    /// Sentence rows are created lazily, only for sentences that end up
    /// referenced by an occurrence.
    pub fn index_document(
        &self,
        url: &str,
        extraction: &Extraction,
    ) -> Result<IndexOutcome, IndexError> {
        let url_id = self.store.ensure_url(url)?;

        if self.store.has_occurrences(url_id)? {
            return Ok(IndexOutcome::AlreadyIndexed);
        }

        let mut sentence_ids: HashMap<usize, i64> = HashMap::new();
        let mut words = 0usize;
        let mut bigrams = 0usize;

        for token in &extraction.tokens {
            if let Some(stemmed) = self.filter.stem_indexable(&token.word) {
                let sentence_id =
                    self.sentence_id(url_id, token.sentence, extraction, &mut sentence_ids)?;
                self.index_stemmed(url_id, &stemmed, sentence_id)?;
                words += 1;
            }
        }

        for pair in extraction.tokens.windows(2) {
            if self.filter.stem_pair(&pair[0].word, &pair[1].word).is_some() {
                let sentence_id =
                    self.sentence_id(url_id, pair[0].sentence, extraction, &mut sentence_ids)?;
                self.index_bigram(url_id, &pair[0].word, &pair[1].word, sentence_id)?;
                bigrams += 1;
            }
        }

        if let Some(title) = &extraction.title {
            self.store.set_title(url, title)?;
        }

        Ok(IndexOutcome::Indexed { words, bigrams })
    }

    /// Resolves (creating if needed) the sentence row for a token's sentence
    fn sentence_id(
        &self,
        url_id: i64,
        sentence: usize,
        extraction: &Extraction,
        cache: &mut HashMap<usize, i64>,
    ) -> Result<i64, IndexError> {
        if let Some(id) = cache.get(&sentence) {
            return Ok(*id);
        }
        let id = self
            .store
            .ensure_sentence(&extraction.sentences[sentence], url_id)?;
        cache.insert(sentence, id);
        Ok(id)
    }
}

/// Derives the database file path for a crawl target
///
/// The file name is the target's second-level domain label with a `.db`
/// extension: two host labels use the first, more than two use the second.
pub fn database_path(database_dir: &str, target: &str) -> Result<PathBuf, IndexError> {
    let parsed = Url::parse(target).map_err(|e| IndexError::DatabaseName(e.to_string()))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| IndexError::DatabaseName(format!("no host in {}", target)))?;

    let labels: Vec<&str> = host.split('.').collect();
    let name = match labels.len() {
        0 | 1 => labels.first().copied().unwrap_or(host),
        2 => labels[0],
        _ => labels[1],
    };

    Ok(Path::new(database_dir).join(format!("{}.db", name)))
}

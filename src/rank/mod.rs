//! TF-IDF ranking engine
//!
//! Scores indexed documents for a term or bigram and produces a
//! deterministically ordered result list. The formula is fixed:
//! `TF = occurrences / totalWords`, `DF = docsContaining / totalDocs`,
//! `score = TF x (1/DF)`, with zero occurrences or zero document frequency
//! short-circuiting to 0.

use crate::index::{IndexError, InvertedIndex};
use serde::Serialize;

/// One ranked search result
///
/// This is the record shape consumed by whatever boundary layer presents
/// results (CLI today, an HTTP front-end tomorrow).
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub url: String,
    pub title: Option<String>,
    pub tfidf: f64,
    pub sentence: Option<String>,
}

/// Ranking engine over an inverted index
pub struct Ranker<'a> {
    index: &'a InvertedIndex,
}

impl<'a> Ranker<'a> {
    /// Creates a ranker reading from the given index
    pub fn new(index: &'a InvertedIndex) -> Self {
        Self { index }
    }

    /// Answers a raw query string
    ///
    /// Exactly two whitespace-delimited tokens classify the query as a
    /// bigram; any other token count is treated as a single term (queries
    /// with three or more words are not supported as phrases). `wildcard`
    /// switches the final term to a prefix match.
    pub fn query(&self, raw: &str, wildcard: bool) -> Result<Vec<SearchHit>, IndexError> {
        let tokens: Vec<&str> = raw.split_whitespace().collect();

        if tokens.len() == 2 {
            // A bigram with a stopword half was never indexed; mirror that
            // policy on the query side and return nothing.
            match self.index.filter().stem_pair(tokens[0], tokens[1]) {
                Some((first, second)) => {
                    if wildcard {
                        self.bigram_wildcard(&first, &second)
                    } else {
                        self.bigram(&first, &second)
                    }
                }
                None => Ok(Vec::new()),
            }
        } else {
            let stemmed = self.index.filter().stem(raw.trim());
            if wildcard {
                self.wildcard(&stemmed)
            } else {
                self.search_stemmed(&stemmed)
            }
        }
    }

    /// Exact search for a single raw term
    pub fn search(&self, term: &str) -> Result<Vec<SearchHit>, IndexError> {
        self.search_stemmed(&self.index.filter().stem(term))
    }

    /// Exact search for an already-stemmed term
    fn search_stemmed(&self, stemmed: &str) -> Result<Vec<SearchHit>, IndexError> {
        let store = self.index.store();
        let word_id = match store.word_id(stemmed)? {
            Some(id) => id,
            None => return Ok(Vec::new()),
        };

        let mut hits = Vec::new();
        for url_id in store.urls_for_word(word_id)? {
            if let Some(hit) = self.word_hit(url_id, word_id)? {
                hits.push(hit);
            }
        }
        sort_hits(&mut hits);
        Ok(hits)
    }

    /// Prefix search: exact search per matching word, concatenated
    ///
    /// A document legitimately appears once per matched word; results are
    /// not deduplicated, only re-sorted with the standard comparator.
    pub fn wildcard(&self, prefix: &str) -> Result<Vec<SearchHit>, IndexError> {
        let store = self.index.store();
        let mut hits = Vec::new();

        for (word_id, word) in store.words_with_prefix(prefix)? {
            tracing::debug!("Wildcard {} matches {}", prefix, word);
            for url_id in store.urls_for_word(word_id)? {
                if let Some(hit) = self.word_hit(url_id, word_id)? {
                    hits.push(hit);
                }
            }
        }
        sort_hits(&mut hits);
        Ok(hits)
    }

    /// Exact bigram search over an already-stemmed ordered pair
    pub fn bigram(&self, word1: &str, word2: &str) -> Result<Vec<SearchHit>, IndexError> {
        let store = self.index.store();
        let (word1_id, word2_id) = match (store.word_id(word1)?, store.word_id(word2)?) {
            (Some(a), Some(b)) => (a, b),
            _ => return Ok(Vec::new()),
        };

        let mut hits = Vec::new();
        for url_id in store.urls_for_bigram(word1_id, word2_id)? {
            if let Some(hit) = self.bigram_hit(url_id, word1_id, word2_id)? {
                hits.push(hit);
            }
        }
        sort_hits(&mut hits);
        Ok(hits)
    }

    /// Bigram search with a prefix-matched second word
    pub fn bigram_wildcard(
        &self,
        word1: &str,
        prefix2: &str,
    ) -> Result<Vec<SearchHit>, IndexError> {
        let store = self.index.store();
        let mut hits = Vec::new();

        for (_, candidate) in store.words_with_prefix(prefix2)? {
            hits.extend(self.bigram(word1, &candidate)?);
        }
        sort_hits(&mut hits);
        Ok(hits)
    }

    /// TF-IDF for a word on a document
    fn tf_idf(&self, url_id: i64, word_id: i64) -> Result<f64, IndexError> {
        let store = self.index.store();
        let occurrences = store.occurrences(url_id, word_id)?;
        if occurrences == 0 {
            return Ok(0.0);
        }
        self.score(occurrences, store.total_words(url_id)?, store.docs_with_word(word_id)?)
    }

    /// TF-IDF for an ordered pair on a document
    fn bigram_tf_idf(
        &self,
        url_id: i64,
        word1_id: i64,
        word2_id: i64,
    ) -> Result<f64, IndexError> {
        let store = self.index.store();
        let occurrences = store.bigram_occurrences(url_id, word1_id, word2_id)?;
        if occurrences == 0 {
            return Ok(0.0);
        }
        self.score(
            occurrences,
            store.total_words(url_id)?,
            store.docs_with_bigram(word1_id, word2_id)?,
        )
    }

    fn score(&self, occurrences: u64, total_words: u64, docs_with: u64) -> Result<f64, IndexError> {
        let total_docs = self.index.store().doc_count()?;
        if docs_with == 0 || total_docs == 0 || total_words == 0 {
            return Ok(0.0);
        }
        let tf = occurrences as f64 / total_words as f64;
        let df = docs_with as f64 / total_docs as f64;
        Ok(tf * (1.0 / df))
    }

    /// Builds the result record for a (document, word) pair
    fn word_hit(&self, url_id: i64, word_id: i64) -> Result<Option<SearchHit>, IndexError> {
        let store = self.index.store();
        let url = match store.url_name(url_id)? {
            Some(url) => url,
            None => return Ok(None),
        };
        let sentence = match store.occurrence_sentence(url_id, word_id)? {
            Some(id) => store.sentence_text(id)?,
            None => None,
        };
        Ok(Some(SearchHit {
            title: store.title(url_id)?,
            tfidf: self.tf_idf(url_id, word_id)?,
            url,
            sentence,
        }))
    }

    /// Builds the result record for a (document, pair) combination
    fn bigram_hit(
        &self,
        url_id: i64,
        word1_id: i64,
        word2_id: i64,
    ) -> Result<Option<SearchHit>, IndexError> {
        let store = self.index.store();
        let url = match store.url_name(url_id)? {
            Some(url) => url,
            None => return Ok(None),
        };
        let sentence = match store.bigram_sentence(url_id, word1_id, word2_id)? {
            Some(id) => store.sentence_text(id)?,
            None => None,
        };
        Ok(Some(SearchHit {
            title: store.title(url_id)?,
            tfidf: self.bigram_tf_idf(url_id, word1_id, word2_id)?,
            url,
            sentence,
        }))
    }
}

/// Sorts hits by score descending, ties broken by URL string descending
fn sort_hits(hits: &mut [SearchHit]) {
    hits.sort_by(|a, b| b.tfidf.total_cmp(&a.tfidf).then_with(|| b.url.cmp(&a.url)));
}

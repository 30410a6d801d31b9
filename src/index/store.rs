//! SQLite index storage
//!
//! This module provides all reads and writes against the index database.
//! String keys (URL, word) resolve to row ids; absent keys come back as
//! `None` so callers treat missing data uniformly instead of erroring.

use crate::index::schema::initialize_schema;
use crate::index::IndexError;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend for the inverted index
pub struct IndexStore {
    conn: Connection,
}

/// Row counts across the index tables
#[derive(Debug, Clone, Copy)]
pub struct IndexStats {
    pub documents: u64,
    pub words: u64,
    pub occurrences: u64,
    pub bigrams: u64,
    pub sentences: u64,
}

impl IndexStore {
    /// Opens (or creates) an index database at the given path
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(IndexStore)` - Successfully opened database with schema in place
    /// * `Err(IndexError)` - Failed to open or initialize the database
    pub fn open(path: &Path) -> Result<Self, IndexError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory index (for testing)
    pub fn open_in_memory() -> Result<Self, IndexError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    // ===== Documents =====

    /// Inserts a document row if absent, returning its id
    ///
    /// Repeated calls with the same URL are no-ops returning the same id.
    pub fn ensure_url(&self, url: &str) -> Result<i64, IndexError> {
        if let Some(id) = self.url_id(url)? {
            return Ok(id);
        }
        self.conn
            .execute("INSERT INTO urls (name) VALUES (?1)", params![url])?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Resolves a URL to its id, `None` if unknown
    pub fn url_id(&self, url: &str) -> Result<Option<i64>, IndexError> {
        let id = self
            .conn
            .query_row("SELECT id FROM urls WHERE name = ?1", params![url], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(id)
    }

    /// Returns the URL string for a document id
    pub fn url_name(&self, url_id: i64) -> Result<Option<String>, IndexError> {
        let name = self
            .conn
            .query_row("SELECT name FROM urls WHERE id = ?1", params![url_id], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(name)
    }

    /// Returns the title of a document, `None` if unset or unknown
    pub fn title(&self, url_id: i64) -> Result<Option<String>, IndexError> {
        let title = self
            .conn
            .query_row(
                "SELECT title FROM urls WHERE id = ?1",
                params![url_id],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?;
        Ok(title.flatten())
    }

    /// Sets the title for a document, keyed by URL
    pub fn set_title(&self, url: &str, title: &str) -> Result<(), IndexError> {
        self.conn.execute(
            "UPDATE urls SET title = ?1 WHERE name = ?2",
            params![title, url],
        )?;
        Ok(())
    }

    /// Total number of documents
    pub fn doc_count(&self) -> Result<u64, IndexError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM urls", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Words =====

    /// Inserts a word row if absent, returning its id
    pub fn ensure_word(&self, word: &str) -> Result<i64, IndexError> {
        if let Some(id) = self.word_id(word)? {
            return Ok(id);
        }
        self.conn
            .execute("INSERT INTO words (name) VALUES (?1)", params![word])?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Resolves a stemmed word to its id, `None` if unknown
    pub fn word_id(&self, word: &str) -> Result<Option<i64>, IndexError> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM words WHERE name = ?1",
                params![word],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    /// Returns the word string for a word id
    pub fn word_name(&self, word_id: i64) -> Result<Option<String>, IndexError> {
        let name = self
            .conn
            .query_row(
                "SELECT name FROM words WHERE id = ?1",
                params![word_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(name)
    }

    /// Finds every word whose name starts with the given prefix
    ///
    /// SQLite `LIKE` is case-insensitive for ASCII, so the match is
    /// re-checked with `starts_with` to keep the prefix case-sensitive.
    pub fn words_with_prefix(&self, prefix: &str) -> Result<Vec<(i64, String)>, IndexError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM words WHERE substr(name, 1, ?1) = ?2 ORDER BY id")?;

        let rows = stmt
            .query_map(params![prefix.chars().count() as i64, prefix], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows
            .into_iter()
            .filter(|(_, name)| name.starts_with(prefix))
            .collect())
    }

    // ===== Sentences =====

    /// Inserts a sentence row if absent for this document, returning its id
    pub fn ensure_sentence(&self, sentence: &str, url_id: i64) -> Result<i64, IndexError> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM sentences WHERE sentence = ?1 AND url_id = ?2",
                params![sentence, url_id],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }

        self.conn.execute(
            "INSERT INTO sentences (sentence, url_id) VALUES (?1, ?2)",
            params![sentence, url_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Returns the text of a sentence by id
    pub fn sentence_text(&self, sentence_id: i64) -> Result<Option<String>, IndexError> {
        let text = self
            .conn
            .query_row(
                "SELECT sentence FROM sentences WHERE id = ?1",
                params![sentence_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(text)
    }

    // ===== Unigram occurrences =====

    /// Whether the document has any unigram occurrence rows
    ///
    /// Used by the pipeline to skip re-indexing an already-indexed document.
    pub fn has_occurrences(&self, url_id: i64) -> Result<bool, IndexError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM frequency WHERE url_id = ?1)",
            params![url_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Records one sighting of a word on a document
    ///
    /// Inserts a row with occurrences=1 and the representative sentence on
    /// first sight; increments the count on repeats, leaving the sentence
    /// reference unchanged (first-seen sentence is sticky).
    pub fn upsert_occurrence(
        &self,
        url_id: i64,
        word_id: i64,
        sentence_id: i64,
    ) -> Result<(), IndexError> {
        let hits: Option<i64> = self
            .conn
            .query_row(
                "SELECT occurrences FROM frequency WHERE url_id = ?1 AND word_id = ?2",
                params![url_id, word_id],
                |row| row.get(0),
            )
            .optional()?;

        match hits {
            None => {
                self.conn.execute(
                    "INSERT INTO frequency (occurrences, url_id, word_id, sentence_id) VALUES (1, ?1, ?2, ?3)",
                    params![url_id, word_id, sentence_id],
                )?;
            }
            Some(hits) => {
                self.conn.execute(
                    "UPDATE frequency SET occurrences = ?1 WHERE url_id = ?2 AND word_id = ?3",
                    params![hits + 1, url_id, word_id],
                )?;
            }
        }
        Ok(())
    }

    /// Number of times a word occurs on a document (0 if absent)
    pub fn occurrences(&self, url_id: i64, word_id: i64) -> Result<u64, IndexError> {
        let hits: Option<i64> = self
            .conn
            .query_row(
                "SELECT occurrences FROM frequency WHERE url_id = ?1 AND word_id = ?2",
                params![url_id, word_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(hits.unwrap_or(0) as u64)
    }

    /// Total indexed word count for a document (sum of occurrence counts)
    pub fn total_words(&self, url_id: i64) -> Result<u64, IndexError> {
        let total: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(occurrences), 0) FROM frequency WHERE url_id = ?1",
            params![url_id],
            |row| row.get(0),
        )?;
        Ok(total as u64)
    }

    /// Number of documents containing a word
    pub fn docs_with_word(&self, word_id: i64) -> Result<u64, IndexError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM frequency WHERE word_id = ?1",
            params![word_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Ids of every document containing a word
    pub fn urls_for_word(&self, word_id: i64) -> Result<Vec<i64>, IndexError> {
        let mut stmt = self
            .conn
            .prepare("SELECT url_id FROM frequency WHERE word_id = ?1")?;
        let ids = stmt
            .query_map(params![word_id], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    /// Representative sentence id for a (document, word) occurrence
    pub fn occurrence_sentence(
        &self,
        url_id: i64,
        word_id: i64,
    ) -> Result<Option<i64>, IndexError> {
        let id = self
            .conn
            .query_row(
                "SELECT sentence_id FROM frequency WHERE url_id = ?1 AND word_id = ?2",
                params![url_id, word_id],
                |row| row.get::<_, Option<i64>>(0),
            )
            .optional()?;
        Ok(id.flatten())
    }

    // ===== Bigram occurrences =====

    /// Records one sighting of an ordered word pair on a document
    ///
    /// Same insert-or-increment semantics as unigram occurrences; the key is
    /// the stemmed pair in original order.
    pub fn upsert_bigram(
        &self,
        url_id: i64,
        word1_id: i64,
        word2_id: i64,
        sentence_id: i64,
    ) -> Result<(), IndexError> {
        let hits: Option<i64> = self
            .conn
            .query_row(
                "SELECT occurrences FROM bigrams WHERE url_id = ?1 AND word1_id = ?2 AND word2_id = ?3",
                params![url_id, word1_id, word2_id],
                |row| row.get(0),
            )
            .optional()?;

        match hits {
            None => {
                self.conn.execute(
                    "INSERT INTO bigrams (occurrences, url_id, word1_id, word2_id, sentence_id) VALUES (1, ?1, ?2, ?3, ?4)",
                    params![url_id, word1_id, word2_id, sentence_id],
                )?;
            }
            Some(hits) => {
                self.conn.execute(
                    "UPDATE bigrams SET occurrences = ?1 WHERE url_id = ?2 AND word1_id = ?3 AND word2_id = ?4",
                    params![hits + 1, url_id, word1_id, word2_id],
                )?;
            }
        }
        Ok(())
    }

    /// Number of times an ordered pair occurs on a document (0 if absent)
    pub fn bigram_occurrences(
        &self,
        url_id: i64,
        word1_id: i64,
        word2_id: i64,
    ) -> Result<u64, IndexError> {
        let hits: Option<i64> = self
            .conn
            .query_row(
                "SELECT occurrences FROM bigrams WHERE url_id = ?1 AND word1_id = ?2 AND word2_id = ?3",
                params![url_id, word1_id, word2_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(hits.unwrap_or(0) as u64)
    }

    /// Number of documents containing an ordered pair
    pub fn docs_with_bigram(&self, word1_id: i64, word2_id: i64) -> Result<u64, IndexError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM bigrams WHERE word1_id = ?1 AND word2_id = ?2",
            params![word1_id, word2_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Ids of every document containing an ordered pair
    pub fn urls_for_bigram(&self, word1_id: i64, word2_id: i64) -> Result<Vec<i64>, IndexError> {
        let mut stmt = self
            .conn
            .prepare("SELECT url_id FROM bigrams WHERE word1_id = ?1 AND word2_id = ?2")?;
        let ids = stmt
            .query_map(params![word1_id, word2_id], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    /// Representative sentence id for a (document, pair) occurrence
    pub fn bigram_sentence(
        &self,
        url_id: i64,
        word1_id: i64,
        word2_id: i64,
    ) -> Result<Option<i64>, IndexError> {
        let id = self
            .conn
            .query_row(
                "SELECT sentence_id FROM bigrams WHERE url_id = ?1 AND word1_id = ?2 AND word2_id = ?3",
                params![url_id, word1_id, word2_id],
                |row| row.get::<_, Option<i64>>(0),
            )
            .optional()?;
        Ok(id.flatten())
    }

    // ===== Statistics =====

    /// Row counts for the stats report
    pub fn stats(&self) -> Result<IndexStats, IndexError> {
        let count = |table: &str| -> Result<u64, IndexError> {
            let n: i64 =
                self.conn
                    .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                        row.get(0)
                    })?;
            Ok(n as u64)
        };

        Ok(IndexStats {
            documents: count("urls")?,
            words: count("words")?,
            occurrences: count("frequency")?,
            bigrams: count("bigrams")?,
            sentences: count("sentences")?,
        })
    }
}

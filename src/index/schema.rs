//! Database schema definitions
//!
//! This module contains the SQL schema for the inverted index database.

/// SQL schema for the index database
pub const SCHEMA_SQL: &str = r#"
-- Crawled documents, keyed by URL
CREATE TABLE IF NOT EXISTS urls (
    id INTEGER NOT NULL PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    title TEXT
);

-- Stemmed terms
CREATE TABLE IF NOT EXISTS words (
    id INTEGER NOT NULL PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

-- Representative snippets, unique per (text, document)
CREATE TABLE IF NOT EXISTS sentences (
    id INTEGER NOT NULL PRIMARY KEY,
    sentence TEXT NOT NULL,
    url_id INTEGER NOT NULL REFERENCES urls(id),
    UNIQUE(sentence, url_id)
);

-- Unigram occurrences per (document, word)
CREATE TABLE IF NOT EXISTS frequency (
    id INTEGER NOT NULL PRIMARY KEY,
    url_id INTEGER NOT NULL REFERENCES urls(id),
    word_id INTEGER NOT NULL REFERENCES words(id),
    sentence_id INTEGER REFERENCES sentences(id),
    occurrences INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_frequency_url ON frequency(url_id);
CREATE INDEX IF NOT EXISTS idx_frequency_word ON frequency(word_id);

-- Ordered adjacent word pairs per document
CREATE TABLE IF NOT EXISTS bigrams (
    id INTEGER NOT NULL PRIMARY KEY,
    url_id INTEGER NOT NULL REFERENCES urls(id),
    word1_id INTEGER NOT NULL REFERENCES words(id),
    word2_id INTEGER NOT NULL REFERENCES words(id),
    sentence_id INTEGER REFERENCES sentences(id),
    occurrences INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_bigrams_url ON bigrams(url_id);
CREATE INDEX IF NOT EXISTS idx_bigrams_pair ON bigrams(word1_id, word2_id);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

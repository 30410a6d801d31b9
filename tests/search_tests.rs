//! End-to-end search tests
//!
//! Crawl a mock site, then exercise the ranking engine against the index
//! the crawl produced.

use searchlight::config::{Config, CrawlerConfig, OutputConfig, StopwordConfig};
use searchlight::crawler::crawl_site;
use searchlight::rank::Ranker;
use searchlight::text::TermFilter;
use searchlight::InvertedIndex;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config() -> Config {
    Config {
        crawler: CrawlerConfig {
            user_agent: "testbot".to_string(),
            default_delay_ms: 10,
            session_timeout_ms: 300,
        },
        output: OutputConfig {
            database_dir: ".".to_string(),
        },
        stopwords: StopwordConfig {
            path: "unused-in-tests.json".to_string(),
        },
    }
}

/// Crawls a two-page mock site and returns the populated index
async fn crawled_index() -> Arc<Mutex<InvertedIndex>> {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "Sitemap: {}/sitemap.xml\nUser-agent: *\nAllow: /",
            base
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<urlset><url><loc>{}/a</loc></url><url><loc>{}/b</loc></url></urlset>",
            base, base
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><head><title>Alpha</title></head><body><p>zebra walrus walrus</p></body></html>",
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><head><title>Beta</title></head><body><p>zebra quokka</p></body></html>",
        ))
        .mount(&server)
        .await;

    let index = Arc::new(Mutex::new(
        InvertedIndex::open_in_memory(TermFilter::without_stopwords()).unwrap(),
    ));

    let summary = crawl_site(&test_config(), Arc::clone(&index), &format!("{}/", base))
        .await
        .expect("crawl failed");
    assert_eq!(summary.indexed, 2);

    index
}

#[tokio::test]
async fn test_exact_search_ranks_by_tfidf() {
    let index = crawled_index().await;
    let index = index.lock().unwrap();
    let ranker = Ranker::new(&index);

    // "zebra" occurs once in each page; page B has fewer total words, so
    // its term frequency (and score) is higher.
    let hits = ranker.query("zebra", false).unwrap();
    assert_eq!(hits.len(), 2);
    assert!(hits[0].url.ends_with("/b"));
    assert!(hits[1].url.ends_with("/a"));
    assert!(hits[0].tfidf > hits[1].tfidf);

    assert_eq!(hits[0].title, Some("Beta".to_string()));
    assert_eq!(hits[0].sentence, Some("zebra quokka".to_string()));
}

#[tokio::test]
async fn test_term_only_on_one_page() {
    let index = crawled_index().await;
    let index = index.lock().unwrap();
    let ranker = Ranker::new(&index);

    let hits = ranker.query("quokka", false).unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].url.ends_with("/b"));
}

#[tokio::test]
async fn test_unmatched_term_is_empty() {
    let index = crawled_index().await;
    let index = index.lock().unwrap();
    let ranker = Ranker::new(&index);

    assert!(ranker.query("aardvark", false).unwrap().is_empty());
}

#[tokio::test]
async fn test_bigram_query_end_to_end() {
    let index = crawled_index().await;
    let index = index.lock().unwrap();
    let ranker = Ranker::new(&index);

    let hits = ranker.query("zebra walrus", false).unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].url.ends_with("/a"));
    assert!(hits[0].tfidf > 0.0);

    // The reversed pair was never adjacent in that order.
    assert!(ranker.query("walrus zebra", false).unwrap().is_empty());
}

#[tokio::test]
async fn test_wildcard_query_end_to_end() {
    let index = crawled_index().await;
    let index = index.lock().unwrap();
    let ranker = Ranker::new(&index);

    let hits = ranker.query("wal", true).unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].url.ends_with("/a"));
}

#[tokio::test]
async fn test_bigram_wildcard_query_end_to_end() {
    let index = crawled_index().await;
    let index = index.lock().unwrap();
    let ranker = Ranker::new(&index);

    let hits = ranker.query("zebra wal", true).unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].url.ends_with("/a"));
}

#[tokio::test]
async fn test_ordering_stable_across_runs() {
    let index = crawled_index().await;
    let index = index.lock().unwrap();
    let ranker = Ranker::new(&index);

    let first = ranker.query("zebra", false).unwrap();
    for _ in 0..5 {
        let again = ranker.query("zebra", false).unwrap();
        let urls: Vec<&str> = again.iter().map(|h| h.url.as_str()).collect();
        let expected: Vec<&str> = first.iter().map(|h| h.url.as_str()).collect();
        assert_eq!(urls, expected);
    }
}

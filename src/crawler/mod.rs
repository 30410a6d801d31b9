//! Crawl pipeline: robots discovery, sessions, and orchestration
//!
//! This module turns a seed URL into indexed documents:
//! - fetch and parse robots.txt for the target host
//! - expand `Sitemap:` directives into a target list (falling back to the
//!   seed itself when no sitemap exists)
//! - run one crawl session per target, sequentially, each with its own
//!   fixed time budget

mod fetcher;
mod session;

pub use fetcher::{build_http_client, fetch_page, fetch_robots, fetch_sitemap, FetchError};
pub use session::{
    CrawlSession, DownloadRequest, DownloadResult, ExtractResult, SessionReport,
};

use crate::config::Config;
use crate::index::InvertedIndex;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

/// Totals across all sessions of one crawl
#[derive(Debug, Default, Clone, Copy)]
pub struct CrawlSummary {
    pub targets: usize,
    pub indexed: usize,
    pub skipped: usize,
    pub denied: usize,
}

/// Crawls a site: robots, sitemap expansion, then one session per target
///
/// Sessions run sequentially and share no delay state; each gets a fresh
/// quiescence budget.
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `index` - The inverted index receiving writes
/// * `seed` - The crawl target URL
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Per-outcome session totals
/// * `Err(SearchlightError)` - The seed URL is invalid or the HTTP client
///   could not be built
pub async fn crawl_site(
    config: &Config,
    index: Arc<Mutex<InvertedIndex>>,
    seed: &str,
) -> crate::Result<CrawlSummary> {
    let seed_url = Url::parse(seed)?;
    let client = build_http_client(&config.crawler.user_agent)?;
    let default_delay = Duration::from_millis(config.crawler.default_delay_ms);
    let timeout = Duration::from_millis(config.crawler.session_timeout_ms);

    let policy = Arc::new(fetch_robots(&client, &seed_url, default_delay).await);

    // Expand sitemap directives into the target list.
    let mut targets: Vec<String> = Vec::new();
    for sitemap_url in policy.sitemaps() {
        match fetch_sitemap(&client, sitemap_url).await {
            Ok(locs) => {
                tracing::info!("Sitemap {} lists {} URLs", sitemap_url, locs.len());
                targets.extend(locs);
            }
            Err(e) => {
                tracing::warn!("Skipping sitemap {}: {}", sitemap_url, e);
            }
        }
    }
    if targets.is_empty() {
        targets.push(seed.to_string());
    }

    let mut summary = CrawlSummary {
        targets: targets.len(),
        ..Default::default()
    };

    for target in &targets {
        let session = CrawlSession::new(
            client.clone(),
            Arc::clone(&policy),
            Arc::clone(&index),
            config.crawler.user_agent.clone(),
            timeout,
        );

        let report = session.run(target).await;
        if report.indexed {
            summary.indexed += 1;
        }
        if report.skipped {
            summary.skipped += 1;
        }
        if report.denied {
            summary.denied += 1;
        }
    }

    tracing::info!(
        "Crawl finished: {} targets, {} indexed, {} skipped, {} denied",
        summary.targets,
        summary.indexed,
        summary.skipped,
        summary.denied
    );

    Ok(summary)
}

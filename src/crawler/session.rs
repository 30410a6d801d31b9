//! One crawl session: download, extract, index for a single target URL
//!
//! A session is a select-style control loop over three bounded queues
//! (download requests, download results, extraction results) guarded by a
//! single quiescence timer. The timer is armed once at session start and
//! never extended: when it fires the loop exits, and results from any
//! in-flight download are dropped with the channels rather than drained.

use crate::crawler::fetcher::fetch_page;
use crate::extract::{extract, Extraction};
use crate::index::{IndexOutcome, InvertedIndex};
use crate::robots::RobotsPolicy;
use reqwest::Client;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// Capacity of each session queue
const QUEUE_DEPTH: usize = 64;

/// Request to download one URL
#[derive(Debug)]
pub struct DownloadRequest {
    pub url: String,
}

/// Downloaded bytes for one URL
#[derive(Debug)]
pub struct DownloadResult {
    pub url: String,
    pub body: Vec<u8>,
}

/// Extraction output for one URL
#[derive(Debug)]
pub struct ExtractResult {
    pub url: String,
    pub extraction: Extraction,
}

/// What happened during one session
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionReport {
    /// The target was rejected by robots rules before any fetch
    pub denied: bool,
    /// A download completed within the session budget
    pub downloaded: bool,
    /// The document was written to the index
    pub indexed: bool,
    /// The document already had occurrence rows and was skipped
    pub skipped: bool,
    /// Hyperlinks seen during extraction (reported, never re-enqueued)
    pub hyperlinks_seen: usize,
}

/// A single crawl session with its own time budget and fetch lock
pub struct CrawlSession {
    client: Client,
    policy: Arc<RobotsPolicy>,
    index: Arc<Mutex<InvertedIndex>>,
    user_agent: String,
    timeout: Duration,
    /// Serializes downloads within this session; held across the politeness
    /// sleep and the GET so fetches are strictly one at a time.
    fetch_lock: Arc<tokio::sync::Mutex<()>>,
}

impl CrawlSession {
    /// Creates a session
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client
    /// * `policy` - Robots rules for the target host
    /// * `index` - The inverted index receiving writes
    /// * `user_agent` - Agent token for robots rule lookup
    /// * `timeout` - Fixed quiescence budget for the whole session
    pub fn new(
        client: Client,
        policy: Arc<RobotsPolicy>,
        index: Arc<Mutex<InvertedIndex>>,
        user_agent: String,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            policy,
            index,
            user_agent,
            timeout,
            fetch_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Runs the session for one target URL
    ///
    /// The loop consumes whichever queue is ready next and exits exactly
    /// when the deadline elapses, regardless of outstanding work.
    pub async fn run(&self, target: &str) -> SessionReport {
        let mut report = SessionReport::default();

        if !self.policy.is_allowed(target, &self.user_agent) {
            tracing::info!("{} disallowed by robots.txt", target);
            report.denied = true;
            return report;
        }

        let (dl_req_tx, mut dl_req_rx) = mpsc::channel::<DownloadRequest>(QUEUE_DEPTH);
        let (dl_res_tx, mut dl_res_rx) = mpsc::channel::<DownloadResult>(QUEUE_DEPTH);
        let (ex_res_tx, mut ex_res_rx) = mpsc::channel::<ExtractResult>(QUEUE_DEPTH);

        if dl_req_tx
            .try_send(DownloadRequest {
                url: target.to_string(),
            })
            .is_err()
        {
            tracing::error!("Could not queue download request for {}", target);
            return report;
        }

        // Fixed deadline: computed once, never extended by activity.
        let deadline = tokio::time::Instant::now() + self.timeout;

        loop {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => {
                    tracing::debug!("Session deadline reached for {}", target);
                    break;
                }

                Some(request) = dl_req_rx.recv() => {
                    self.spawn_download(request, dl_res_tx.clone());
                }

                Some(result) = dl_res_rx.recv() => {
                    report.downloaded = true;
                    tracing::debug!("Extracting {} ({} bytes)", result.url, result.body.len());
                    let extraction = extract(&result.body);
                    if ex_res_tx
                        .try_send(ExtractResult {
                            url: result.url,
                            extraction,
                        })
                        .is_err()
                    {
                        tracing::warn!("Extraction queue full; dropping result");
                    }
                }

                Some(extracted) = ex_res_rx.recv() => {
                    self.index_result(&extracted, &mut report);
                }
            }
        }

        report
    }

    /// Spawns the download worker for one request
    ///
    /// The worker acquires the session fetch lock, records the document row
    /// (created on first fetch attempt), sleeps the politeness delay,
    /// performs the GET, and releases the lock after the body is read.
    /// Fetch failures are logged and skipped; the session keeps draining.
    fn spawn_download(&self, request: DownloadRequest, results: mpsc::Sender<DownloadResult>) {
        let client = self.client.clone();
        let delay = self.policy.delay(&self.user_agent);
        let lock = Arc::clone(&self.fetch_lock);
        let index = Arc::clone(&self.index);

        tokio::spawn(async move {
            let _guard = lock.lock().await;

            {
                let index = index.lock().unwrap();
                if let Err(e) = index.ensure_document(&request.url) {
                    tracing::warn!("Could not record document {}: {}", request.url, e);
                }
            }

            tokio::time::sleep(delay).await;

            match fetch_page(&client, &request.url).await {
                Ok(body) => {
                    // If the session has already timed out the receiver is
                    // gone and this result is dropped.
                    let _ = results
                        .send(DownloadResult {
                            url: request.url,
                            body,
                        })
                        .await;
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", request.url, e);
                }
            }
        });
    }

    /// Indexes one extraction result, skipping already-indexed documents
    fn index_result(&self, extracted: &ExtractResult, report: &mut SessionReport) {
        report.hyperlinks_seen = extracted.extraction.hyperlinks.len();
        // Discovered hyperlinks are deliberately not re-enqueued: this is a
        // single-hop crawl driven by the sitemap or seed list.

        let index = self.index.lock().unwrap();
        match index.index_document(&extracted.url, &extracted.extraction) {
            Ok(IndexOutcome::Indexed { words, bigrams }) => {
                report.indexed = true;
                tracing::info!(
                    "Indexed {} ({} words, {} bigrams)",
                    extracted.url,
                    words,
                    bigrams
                );
            }
            Ok(IndexOutcome::AlreadyIndexed) => {
                report.skipped = true;
                tracing::info!("{} already indexed, skipping", extracted.url);
            }
            Err(e) => {
                tracing::warn!("Index write failed for {}: {}", extracted.url, e);
            }
        }
    }
}

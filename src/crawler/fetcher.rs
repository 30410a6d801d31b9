//! HTTP fetching for the crawl pipeline
//!
//! This module builds the shared HTTP client and performs the three kinds of
//! fetch the crawler needs: pages, robots.txt, and sitemap documents.

use crate::robots::{parse_sitemap, RobotsPolicy};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors from a single fetch operation
///
/// All of these are transient from the session's point of view: the affected
/// URL is skipped and the session continues.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Builds the HTTP client used for every fetch
///
/// # Arguments
///
/// * `user_agent` - The agent token sent as the User-Agent header
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body as raw bytes
///
/// Non-2xx responses and body-read failures are both fetch errors; the
/// caller logs and skips the URL.
pub async fn fetch_page(client: &Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }
    Ok(response.bytes().await?.to_vec())
}

/// Fetches and parses robots.txt for the crawl target's host
///
/// Any failure (unreachable host, non-200, unreadable body) yields a
/// permissive policy with a warning; the crawl proceeds without rules.
pub async fn fetch_robots(client: &Client, target: &Url, default_delay: Duration) -> RobotsPolicy {
    let robots_url = match target.join("/robots.txt") {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!("Cannot derive robots.txt URL from {}: {}", target, e);
            return RobotsPolicy::permissive(default_delay);
        }
    };

    match fetch_page(client, robots_url.as_str()).await {
        Ok(body) => {
            tracing::debug!("Fetched robots.txt from {}", robots_url);
            RobotsPolicy::parse(&String::from_utf8_lossy(&body), default_delay)
        }
        Err(e) => {
            tracing::warn!("Could not fetch {}: {}; allowing all", robots_url, e);
            RobotsPolicy::permissive(default_delay)
        }
    }
}

/// Fetches a sitemap document and returns its location URLs
pub async fn fetch_sitemap(client: &Client, url: &str) -> crate::Result<Vec<String>> {
    let body = fetch_page(client, url)
        .await
        .map_err(|source| crate::SearchlightError::Fetch {
            url: url.to_string(),
            source,
        })?;
    Ok(parse_sitemap(&String::from_utf8_lossy(&body))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client("searchlight");
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_page_non_200_is_error() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_http_client("searchlight").unwrap();
        let result = fetch_page(&client, &format!("{}/missing", server.uri())).await;
        assert!(matches!(result, Err(FetchError::Status(404))));
    }

    #[tokio::test]
    async fn test_fetch_robots_missing_is_permissive() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_http_client("searchlight").unwrap();
        let target = Url::parse(&server.uri()).unwrap();
        let policy = fetch_robots(&client, &target, Duration::from_millis(100)).await;
        assert!(policy.is_allowed("/anything", "searchlight"));
    }
}

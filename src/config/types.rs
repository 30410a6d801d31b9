use serde::Deserialize;

/// Main configuration structure for Searchlight
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
    pub stopwords: StopwordConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Agent token used for robots.txt group lookup and the HTTP User-Agent
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Politeness delay before each fetch when robots.txt gives none (milliseconds)
    #[serde(rename = "default-delay-ms", default = "default_delay_ms")]
    pub default_delay_ms: u64,

    /// Fixed quiescence budget per crawl session (milliseconds)
    #[serde(rename = "session-timeout-ms", default = "default_session_timeout_ms")]
    pub session_timeout_ms: u64,
}

fn default_delay_ms() -> u64 {
    100
}

fn default_session_timeout_ms() -> u64 {
    1000
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory that receives the per-site SQLite database file
    #[serde(rename = "database-dir")]
    pub database_dir: String,
}

/// Stopword list configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StopwordConfig {
    /// Path to a JSON array of stopwords
    pub path: String,
}

use serde::Deserialize;
use std::time::Duration;

/// Browser-identifying user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main configuration structure for Corpus-Crawler
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Persistent store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FetcherConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout for link discovery fetches (seconds)
    #[serde(default = "default_crawl_timeout")]
    pub crawl_timeout_secs: u64,

    /// Timeout for content scraping fetches (seconds)
    #[serde(default = "default_scrape_timeout")]
    pub scrape_timeout_secs: u64,
}

impl FetcherConfig {
    pub fn crawl_timeout(&self) -> Duration {
        Duration::from_secs(self.crawl_timeout_secs)
    }

    pub fn scrape_timeout(&self) -> Duration {
        Duration::from_secs(self.scrape_timeout_secs)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            crawl_timeout_secs: default_crawl_timeout(),
            scrape_timeout_secs: default_scrape_timeout(),
        }
    }
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// Depth budget used when a request does not supply one
    #[serde(default = "default_depth")]
    pub default_depth: u32,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            default_depth: default_depth(),
        }
    }
}

/// HTTP API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

fn default_database_path() -> String {
    "./corpus.db".to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_crawl_timeout() -> u64 {
    30
}

fn default_scrape_timeout() -> u64 {
    60
}

fn default_depth() -> u32 {
    1
}

fn default_bind_address() -> String {
    "0.0.0.0:5000".to_string()
}

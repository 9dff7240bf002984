//! Corpus-Crawler: a link-frontier crawler and text scraper
//!
//! This crate discovers links from a seed page, queues them in a persistent
//! frontier, and extracts readable text from content pages. Link-graph
//! metadata and scraped text are both persisted for downstream indexing or
//! corpus building.

pub mod api;
pub mod config;
pub mod crawler;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Corpus-Crawler operations
///
/// `Transport` and `Extraction` are per-item failures: they are recorded on
/// the link or task being worked and never abort a multi-item invocation.
/// `Validation` and `System` abort the invocation that raised them.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("{0}")]
    Validation(String),

    #[error("Request error: {message}")]
    Transport { url: String, message: String },

    #[error("Processing error: {message}")]
    Extraction { url: String, message: String },

    #[error("System error: {0}")]
    System(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CrawlError {
    /// Returns true if this error belongs to a single link or task
    pub fn is_item_failure(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Extraction { .. })
    }

    /// Returns true if this error should be reported to the caller as a bad request
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid address in config: {0}")]
    InvalidAddress(String),
}

/// Result type alias for Corpus-Crawler operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEngine, CrawlOutcome, CrawlRequest, HttpFetcher, PageFetcher};
pub use output::{realtime_stats, RealtimeStats};
pub use storage::{SqliteStorage, Storage};
pub use url::{has_text_hint, is_likely_text_content, is_syntactically_valid, is_wiki_url};

//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `PageFetcher` transport trait
//! - Link extraction and content extraction from HTML
//! - The frontier-driven crawl loop and bulk content processing

mod content;
mod fetcher;
mod frontier;
mod links;
mod processor;

#[cfg(test)]
mod testing;

pub use content::{extract_content, ExtractedContent, UNKNOWN_TITLE};
pub use fetcher::{build_http_client, FetchedPage, HttpFetcher, PageFetcher};
pub use frontier::{
    CrawlEngine, CrawlOutcome, CrawlRequest, CrawlStats, CrawlStatus, CrawlStep,
    DEFAULT_CRAWL_TIMEOUT, DEFAULT_SCRAPE_TIMEOUT,
};
pub use links::{extract_links, ExtractedLinks};
pub use processor::{ProcessAllResult, ProcessDetail, ProcessStatus};

use crate::config::Config;
use crate::storage::{open_storage, SqliteStorage};
use crate::CrawlError;
use std::path::Path;

/// Builds an engine over the configured SQLite store and HTTP transport
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlEngine)` - Store opened and client built
/// * `Err(CrawlError)` - Store or client initialization failed
pub fn build_engine(config: &Config) -> Result<CrawlEngine<SqliteStorage, HttpFetcher>, CrawlError> {
    let storage = open_storage(Path::new(&config.storage.database_path))?;
    let fetcher = HttpFetcher::new(&config.fetcher)?;

    Ok(CrawlEngine::new(storage, fetcher)
        .with_timeouts(config.fetcher.crawl_timeout(), config.fetcher.scrape_timeout()))
}

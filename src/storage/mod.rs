//! Storage module for persisting crawl data
//!
//! This module handles all database operations for the crawler. Four logical
//! collections are kept:
//! - the link frontier (`LinkEntry`)
//! - append-only crawl snapshots (`CrawlSnapshot`)
//! - the content processing queue (`ContentTask`)
//! - scraped documents (`ScrapedDocument`)

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::CrawlError;

use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(CrawlError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, CrawlError> {
    Ok(SqliteStorage::new(path)?)
}

/// Source tag recorded on a content task created for the seed page itself
pub const SEED_SOURCE: &str = "seed_url";

/// Source tag used when a record carries no known source
pub const UNKNOWN_SOURCE: &str = "unknown";

/// A URL in the crawl frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    pub id: i64,
    pub url: String,
    pub discovered_at: String,
    pub crawled: bool,
    pub crawled_at: Option<String>,
    pub depth: u32,
    pub source_url: Option<String>,
    pub error: Option<String>,
}

/// Fields supplied when a URL is first discovered
#[derive(Debug, Clone)]
pub struct NewLinkEntry {
    pub url: String,
    pub depth: u32,
    pub source_url: Option<String>,
}

/// A URL waiting in (or done with) the content processing queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTask {
    pub id: i64,
    pub url: String,
    pub created_at: String,
    pub processed: bool,
    pub processed_at: Option<String>,
    pub source_url: Option<String>,
    pub looks_like_content: bool,
    pub depth: u32,
    pub error: Option<String>,
}

/// Fields supplied when a URL is queued for content processing
#[derive(Debug, Clone)]
pub struct NewContentTask {
    pub url: String,
    pub source_url: Option<String>,
    pub looks_like_content: bool,
    pub depth: u32,
}

/// Audit record of one crawl-of-a-page event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSnapshot {
    pub id: i64,
    pub source_url: String,
    pub discovered_links: Vec<String>,
    pub crawled_at: String,
    pub depth: u32,
}

/// Extracted text of one processed content task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedDocument {
    pub id: i64,
    pub content: String,
    pub url: String,
    pub scraped_at: String,
    /// Row id of the content task this document was produced from
    pub task_id: i64,
    pub source_url: Option<String>,
    pub depth: u32,
    pub title: String,
}

/// Fields supplied when a scraped document is stored
#[derive(Debug, Clone)]
pub struct NewScrapedDocument {
    pub content: String,
    pub url: String,
    pub task_id: i64,
    pub source_url: Option<String>,
    pub depth: u32,
    pub title: String,
}

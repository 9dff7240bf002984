//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{
    ContentTask, CrawlSnapshot, LinkEntry, NewContentTask, NewLinkEntry, NewScrapedDocument,
    ScrapedDocument,
};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// URL uniqueness is exact string match. The `insert_*_if_absent` methods
/// must be atomic: two callers racing on the same URL create one record.
pub trait Storage {
    // ===== Frontier Links =====

    /// Counts every frontier entry
    fn count_links(&self) -> StorageResult<u64>;

    /// Counts frontier entries with the given crawled flag
    fn count_links_by_crawled(&self, crawled: bool) -> StorageResult<u64>;

    /// Inserts a new frontier entry unless one exists for the URL
    ///
    /// Returns true if a record was created.
    fn insert_link_if_absent(&mut self, link: &NewLinkEntry) -> StorageResult<bool>;

    /// Gets a frontier entry by URL
    fn get_link_by_url(&self, url: &str) -> StorageResult<Option<LinkEntry>>;

    /// Finds the uncrawled entry for an exact URL
    fn find_uncrawled_link_by_url(&self, url: &str) -> StorageResult<Option<LinkEntry>>;

    /// Finds the first uncrawled entry at a depth
    fn find_uncrawled_link_at_depth(&self, depth: u32) -> StorageResult<Option<LinkEntry>>;

    /// Finds the first uncrawled entry at any depth
    fn find_any_uncrawled_link(&self) -> StorageResult<Option<LinkEntry>>;

    /// Marks a frontier entry crawled, recording an error if one occurred
    fn mark_link_crawled(&mut self, link_id: i64, error: Option<&str>) -> StorageResult<()>;

    /// Lists every frontier URL in discovery order
    fn list_link_urls(&self) -> StorageResult<Vec<String>>;

    // ===== Crawl Snapshots =====

    /// Appends a snapshot of the links discovered on one page
    fn insert_snapshot(
        &mut self,
        source_url: &str,
        discovered_links: &[String],
        depth: u32,
    ) -> StorageResult<i64>;

    /// Gets every snapshot taken of a page, oldest first
    fn get_snapshots_for(&self, source_url: &str) -> StorageResult<Vec<CrawlSnapshot>>;

    /// Counts all snapshots
    fn count_snapshots(&self) -> StorageResult<u64>;

    // ===== Content Tasks =====

    /// Inserts a new content task unless one exists for the URL
    ///
    /// Returns true if a record was created.
    fn insert_task_if_absent(&mut self, task: &NewContentTask) -> StorageResult<bool>;

    /// Gets a content task by URL
    fn get_task_by_url(&self, url: &str) -> StorageResult<Option<ContentTask>>;

    /// Lists every unprocessed task in creation order
    fn pending_tasks(&self) -> StorageResult<Vec<ContentTask>>;

    /// Marks a content task processed, recording an error if one occurred
    fn mark_task_processed(&mut self, task_id: i64, error: Option<&str>) -> StorageResult<()>;

    /// Counts every content task
    fn count_tasks(&self) -> StorageResult<u64>;

    /// Counts content tasks with the given processed flag
    fn count_tasks_by_processed(&self, processed: bool) -> StorageResult<u64>;

    // ===== Scraped Documents =====

    /// Stores a scraped document and returns its id
    fn insert_document(&mut self, document: &NewScrapedDocument) -> StorageResult<i64>;

    /// Gets a scraped document by id
    fn get_document(&self, document_id: i64) -> StorageResult<ScrapedDocument>;

    /// Counts all scraped documents
    fn count_documents(&self) -> StorageResult<u64>;

    /// Lists the text content of every scraped document
    fn list_document_contents(&self) -> StorageResult<Vec<String>>;
}

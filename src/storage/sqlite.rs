//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{
    ContentTask, CrawlSnapshot, LinkEntry, NewContentTask, NewLinkEntry, NewScrapedDocument,
    ScrapedDocument,
};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const LINK_COLUMNS: &str =
    "id, url, discovered_at, crawled, crawled_at, depth, source_url, error";

const TASK_COLUMNS: &str =
    "id, url, created_at, processed, processed_at, source_url, looks_like_content, depth, error";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn count(&self, sql: &str, params: impl rusqlite::Params) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(sql, params, |row| row.get(0))?;
        Ok(count as u64)
    }

    fn find_link(
        &self,
        filter: &str,
        params: impl rusqlite::Params,
    ) -> StorageResult<Option<LinkEntry>> {
        let sql = format!(
            "SELECT {} FROM links WHERE {} ORDER BY id ASC LIMIT 1",
            LINK_COLUMNS, filter
        );
        let link = self
            .conn
            .query_row(&sql, params, link_from_row)
            .optional()?;
        Ok(link)
    }
}

fn link_from_row(row: &Row<'_>) -> rusqlite::Result<LinkEntry> {
    Ok(LinkEntry {
        id: row.get(0)?,
        url: row.get(1)?,
        discovered_at: row.get(2)?,
        crawled: row.get(3)?,
        crawled_at: row.get(4)?,
        depth: row.get(5)?,
        source_url: row.get(6)?,
        error: row.get(7)?,
    })
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<ContentTask> {
    Ok(ContentTask {
        id: row.get(0)?,
        url: row.get(1)?,
        created_at: row.get(2)?,
        processed: row.get(3)?,
        processed_at: row.get(4)?,
        source_url: row.get(5)?,
        looks_like_content: row.get(6)?,
        depth: row.get(7)?,
        error: row.get(8)?,
    })
}

impl Storage for SqliteStorage {
    // ===== Frontier Links =====

    fn count_links(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM links", [])
    }

    fn count_links_by_crawled(&self, crawled: bool) -> StorageResult<u64> {
        self.count(
            "SELECT COUNT(*) FROM links WHERE crawled = ?1",
            params![crawled],
        )
    }

    fn insert_link_if_absent(&mut self, link: &NewLinkEntry) -> StorageResult<bool> {
        let now = Utc::now().to_rfc3339();
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO links (url, discovered_at, crawled, depth, source_url)
             VALUES (?1, ?2, 0, ?3, ?4)",
            params![link.url, now, link.depth, link.source_url],
        )?;
        Ok(inserted > 0)
    }

    fn get_link_by_url(&self, url: &str) -> StorageResult<Option<LinkEntry>> {
        self.find_link("url = ?1", params![url])
    }

    fn find_uncrawled_link_by_url(&self, url: &str) -> StorageResult<Option<LinkEntry>> {
        self.find_link("crawled = 0 AND url = ?1", params![url])
    }

    fn find_uncrawled_link_at_depth(&self, depth: u32) -> StorageResult<Option<LinkEntry>> {
        self.find_link("crawled = 0 AND depth = ?1", params![depth])
    }

    fn find_any_uncrawled_link(&self) -> StorageResult<Option<LinkEntry>> {
        self.find_link("crawled = 0", [])
    }

    fn mark_link_crawled(&mut self, link_id: i64, error: Option<&str>) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE links SET crawled = 1, crawled_at = ?1, error = ?2 WHERE id = ?3",
            params![now, error, link_id],
        )?;
        if updated == 0 {
            return Err(StorageError::NotFound(format!("Link ID {}", link_id)));
        }
        Ok(())
    }

    fn list_link_urls(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT url FROM links ORDER BY id ASC")?;
        let urls = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(urls)
    }

    // ===== Crawl Snapshots =====

    fn insert_snapshot(
        &mut self,
        source_url: &str,
        discovered_links: &[String],
        depth: u32,
    ) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        let links_json = serde_json::to_string(discovered_links)?;
        self.conn.execute(
            "INSERT INTO crawl_snapshots (source_url, discovered_links, crawled_at, depth)
             VALUES (?1, ?2, ?3, ?4)",
            params![source_url, links_json, now, depth],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_snapshots_for(&self, source_url: &str) -> StorageResult<Vec<CrawlSnapshot>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, source_url, discovered_links, crawled_at, depth
             FROM crawl_snapshots WHERE source_url = ?1 ORDER BY id ASC",
        )?;

        let rows = stmt
            .query_map(params![source_url], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, u32>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut snapshots = Vec::with_capacity(rows.len());
        for (id, source_url, links_json, crawled_at, depth) in rows {
            snapshots.push(CrawlSnapshot {
                id,
                source_url,
                discovered_links: serde_json::from_str(&links_json)?,
                crawled_at,
                depth,
            });
        }

        Ok(snapshots)
    }

    fn count_snapshots(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM crawl_snapshots", [])
    }

    // ===== Content Tasks =====

    fn insert_task_if_absent(&mut self, task: &NewContentTask) -> StorageResult<bool> {
        let now = Utc::now().to_rfc3339();
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO content_tasks
             (url, created_at, processed, source_url, looks_like_content, depth)
             VALUES (?1, ?2, 0, ?3, ?4, ?5)",
            params![
                task.url,
                now,
                task.source_url,
                task.looks_like_content,
                task.depth
            ],
        )?;
        Ok(inserted > 0)
    }

    fn get_task_by_url(&self, url: &str) -> StorageResult<Option<ContentTask>> {
        let sql = format!("SELECT {} FROM content_tasks WHERE url = ?1", TASK_COLUMNS);
        let task = self
            .conn
            .query_row(&sql, params![url], task_from_row)
            .optional()?;
        Ok(task)
    }

    fn pending_tasks(&self) -> StorageResult<Vec<ContentTask>> {
        let sql = format!(
            "SELECT {} FROM content_tasks WHERE processed = 0 ORDER BY id ASC",
            TASK_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let tasks = stmt
            .query_map([], task_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    fn mark_task_processed(&mut self, task_id: i64, error: Option<&str>) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE content_tasks SET processed = 1, processed_at = ?1, error = ?2 WHERE id = ?3",
            params![now, error, task_id],
        )?;
        if updated == 0 {
            return Err(StorageError::NotFound(format!("Task ID {}", task_id)));
        }
        Ok(())
    }

    fn count_tasks(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM content_tasks", [])
    }

    fn count_tasks_by_processed(&self, processed: bool) -> StorageResult<u64> {
        self.count(
            "SELECT COUNT(*) FROM content_tasks WHERE processed = ?1",
            params![processed],
        )
    }

    // ===== Scraped Documents =====

    fn insert_document(&mut self, document: &NewScrapedDocument) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO scraped_documents
             (content, url, scraped_at, task_id, source_url, depth, title)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                document.content,
                document.url,
                now,
                document.task_id,
                document.source_url,
                document.depth,
                document.title
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_document(&self, document_id: i64) -> StorageResult<ScrapedDocument> {
        let document = self
            .conn
            .query_row(
                "SELECT id, content, url, scraped_at, task_id, source_url, depth, title
                 FROM scraped_documents WHERE id = ?1",
                params![document_id],
                |row| {
                    Ok(ScrapedDocument {
                        id: row.get(0)?,
                        content: row.get(1)?,
                        url: row.get(2)?,
                        scraped_at: row.get(3)?,
                        task_id: row.get(4)?,
                        source_url: row.get(5)?,
                        depth: row.get(6)?,
                        title: row.get(7)?,
                    })
                },
            )
            .optional()?;

        document.ok_or_else(|| StorageError::NotFound(format!("Document ID {}", document_id)))
    }

    fn count_documents(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM scraped_documents", [])
    }

    fn list_document_contents(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT content FROM scraped_documents ORDER BY id ASC")?;
        let contents = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(contents)
    }
}

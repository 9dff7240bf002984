//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Corpus-Crawler database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Crawl frontier: every discovered URL
CREATE TABLE IF NOT EXISTS links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    discovered_at TEXT NOT NULL,
    crawled INTEGER NOT NULL DEFAULT 0,
    crawled_at TEXT,
    depth INTEGER NOT NULL DEFAULT 0,
    source_url TEXT,
    error TEXT
);

CREATE INDEX IF NOT EXISTS idx_links_crawled_depth ON links(crawled, depth);

-- Append-only audit of crawl events
CREATE TABLE IF NOT EXISTS crawl_snapshots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_url TEXT NOT NULL,
    discovered_links TEXT NOT NULL,
    crawled_at TEXT NOT NULL,
    depth INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_crawl_snapshots_source ON crawl_snapshots(source_url);

-- Content processing queue
CREATE TABLE IF NOT EXISTS content_tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL,
    processed INTEGER NOT NULL DEFAULT 0,
    processed_at TEXT,
    source_url TEXT,
    looks_like_content INTEGER NOT NULL DEFAULT 0,
    depth INTEGER NOT NULL DEFAULT 0,
    error TEXT
);

CREATE INDEX IF NOT EXISTS idx_content_tasks_processed ON content_tasks(processed);

-- Extracted page text
CREATE TABLE IF NOT EXISTS scraped_documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content TEXT NOT NULL,
    url TEXT NOT NULL,
    scraped_at TEXT NOT NULL,
    task_id INTEGER NOT NULL REFERENCES content_tasks(id),
    source_url TEXT,
    depth INTEGER NOT NULL DEFAULT 0,
    title TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_scraped_documents_task ON scraped_documents(task_id);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

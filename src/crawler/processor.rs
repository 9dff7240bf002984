//! Bulk content processing
//!
//! Drains the content task queue: each pending task is fetched, its text
//! extracted and stored as a scraped document. Failures are recorded on the
//! task and never stop the run.

use crate::crawler::content::{extract_content, ExtractedContent};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::frontier::CrawlEngine;
use crate::storage::{ContentTask, NewScrapedDocument, Storage, UNKNOWN_SOURCE};
use crate::url::is_wiki_url;
use crate::CrawlError;
use serde::Serialize;
use std::time::Duration;

/// Overall status of a processing run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    Complete,
}

/// Outcome of processing one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessDetail {
    Success {
        link: String,
        content_length: usize,
        title: String,
        content_id: i64,
    },
    #[serde(rename = "error")]
    Failure { link: String, error: String },
}

/// Tallies and per-task outcomes of a processing run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessAllResult {
    pub status: ProcessStatus,
    pub total_unprocessed: usize,
    pub processed: usize,
    pub success: usize,
    pub failed: usize,
    pub details: Vec<ProcessDetail>,
}

impl ProcessAllResult {
    fn empty() -> Self {
        Self {
            status: ProcessStatus::Complete,
            total_unprocessed: 0,
            processed: 0,
            success: 0,
            failed: 0,
            details: Vec::new(),
        }
    }

    /// Human-readable summary of the run
    pub fn message(&self) -> String {
        if self.total_unprocessed == 0 {
            "No unprocessed links found".to_string()
        } else {
            format!(
                "Processed {} links ({} success, {} failed)",
                self.processed, self.success, self.failed
            )
        }
    }
}

impl<S: Storage, F: PageFetcher> CrawlEngine<S, F> {
    /// Processes every task pending at the start of the call
    ///
    /// Tasks queued while the run is in progress are left for the next run.
    pub async fn process_all_links(&mut self) -> Result<ProcessAllResult, CrawlError> {
        let pending = self.storage.pending_tasks()?;

        if pending.is_empty() {
            tracing::info!("No unprocessed links found");
            return Ok(ProcessAllResult::empty());
        }

        tracing::info!("Processing {} pending links", pending.len());

        let mut result = ProcessAllResult {
            total_unprocessed: pending.len(),
            ..ProcessAllResult::empty()
        };

        for task in &pending {
            let detail = self.process_task(task).await?;
            match detail {
                ProcessDetail::Success { .. } => result.success += 1,
                ProcessDetail::Failure { .. } => result.failed += 1,
            }
            result.details.push(detail);
            result.processed += 1;

            if result.processed % 10 == 0 {
                tracing::info!(
                    "Progress: {}/{} links processed",
                    result.processed,
                    result.total_unprocessed
                );
            }
        }

        tracing::info!("{}", result.message());
        Ok(result)
    }

    /// Scrapes one task; per-item failures become a `Failure` detail
    async fn process_task(&mut self, task: &ContentTask) -> Result<ProcessDetail, CrawlError> {
        tracing::debug!("Processing {}", task.url);

        let scraped = scrape(&self.fetcher, &task.url, self.scrape_timeout).await;
        let content = match scraped {
            Ok(content) => content,
            Err(e) if e.is_item_failure() => {
                let error = e.to_string();
                tracing::warn!("Failed to process {}: {}", task.url, error);
                self.storage.mark_task_processed(task.id, Some(&error))?;
                return Ok(ProcessDetail::Failure {
                    link: task.url.clone(),
                    error,
                });
            }
            Err(e) => return Err(e),
        };

        let content_length = content.text.chars().count();
        let content_id = self.storage.insert_document(&NewScrapedDocument {
            content: content.text,
            url: task.url.clone(),
            task_id: task.id,
            source_url: Some(
                task.source_url
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
            ),
            depth: task.depth,
            title: content.title.clone(),
        })?;
        self.storage.mark_task_processed(task.id, None)?;

        Ok(ProcessDetail::Success {
            link: task.url.clone(),
            content_length,
            title: content.title,
            content_id,
        })
    }
}

async fn scrape<F: PageFetcher>(
    fetcher: &F,
    url: &str,
    timeout: Duration,
) -> Result<ExtractedContent, CrawlError> {
    let page = fetcher.fetch(url, timeout).await?;
    page.ensure_parseable()?;
    Ok(extract_content(&page.body, is_wiki_url(url)))
}

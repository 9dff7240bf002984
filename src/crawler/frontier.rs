//! Crawl engine - link frontier management and depth-bounded traversal
//!
//! This module contains the crawl loop that coordinates:
//! - Seeding the frontier when it is empty
//! - Selecting the next uncrawled entry for each depth iteration
//! - Fetching pages and extracting their links
//! - Recording discovered links and queueing content tasks

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::links::{extract_links, ExtractedLinks};
use crate::storage::{
    LinkEntry, NewContentTask, NewLinkEntry, Storage, SEED_SOURCE, UNKNOWN_SOURCE,
};
use crate::url::{has_text_hint, is_syntactically_valid, is_wiki_url};
use crate::CrawlError;
use serde::Serialize;
use std::time::Duration;

/// Fetch timeout used while discovering links
pub const DEFAULT_CRAWL_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch timeout used while scraping content
pub const DEFAULT_SCRAPE_TIMEOUT: Duration = Duration::from_secs(60);

/// Parameters of one crawl invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    /// Seed URL, only honored when the frontier is empty
    pub url: Option<String>,
    /// Maximum number of crawl steps
    pub depth: u32,
}

impl CrawlRequest {
    /// A request that seeds an empty frontier
    pub fn seed(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: Some(url.into()),
            depth,
        }
    }

    /// A request that continues from existing frontier entries
    pub fn resume(depth: u32) -> Self {
        Self { url: None, depth }
    }
}

/// Frontier and content-queue counts after a crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    pub links_to_crawl: u64,
    pub links_crawled: u64,
    pub links_to_scrape: u64,
    pub links_scraped: u64,
}

/// How a crawl invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CrawlStatus {
    /// Every step of the depth budget ran
    Completed,
    /// No uncrawled entry remained at the given iteration
    Exhausted { depth: u32 },
}

/// Result of crawling a single frontier entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlStep {
    pub url: String,
    pub depth: u32,
    pub links_found: usize,
    pub links_added_to_crawl: usize,
    pub links_added_to_process: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CrawlStep {
    fn failed(entry: &LinkEntry, error: String) -> Self {
        Self {
            url: entry.url.clone(),
            depth: entry.depth,
            links_found: 0,
            links_added_to_crawl: 0,
            links_added_to_process: 0,
            error: Some(error),
        }
    }
}

/// Result of a crawl invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlOutcome {
    pub status: CrawlStatus,
    pub depth_budget: u32,
    pub steps: Vec<CrawlStep>,
    pub stats: CrawlStats,
}

impl CrawlOutcome {
    /// Human-readable summary of how the crawl ended
    pub fn message(&self) -> String {
        match self.status {
            CrawlStatus::Completed => {
                format!("Crawling completed for {} depth levels", self.depth_budget)
            }
            CrawlStatus::Exhausted { depth } => {
                format!("No more links to crawl at depth {}", depth)
            }
        }
    }
}

/// Crawl engine owning the frontier store and the page transport
pub struct CrawlEngine<S, F> {
    pub(super) storage: S,
    pub(super) fetcher: F,
    pub(super) crawl_timeout: Duration,
    pub(super) scrape_timeout: Duration,
}

impl<S: Storage, F: PageFetcher> CrawlEngine<S, F> {
    /// Creates an engine with the default fetch timeouts
    pub fn new(storage: S, fetcher: F) -> Self {
        Self {
            storage,
            fetcher,
            crawl_timeout: DEFAULT_CRAWL_TIMEOUT,
            scrape_timeout: DEFAULT_SCRAPE_TIMEOUT,
        }
    }

    /// Overrides the link-discovery and content-scraping timeouts
    pub fn with_timeouts(mut self, crawl_timeout: Duration, scrape_timeout: Duration) -> Self {
        self.crawl_timeout = crawl_timeout;
        self.scrape_timeout = scrape_timeout;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Runs up to `request.depth` crawl steps over the frontier
    ///
    /// A supplied URL seeds the frontier only when it is empty; otherwise it
    /// is ignored and crawling resumes from existing uncrawled entries.
    /// Fetch and extraction failures are recorded on the entry and do not
    /// stop the crawl. Storage failures abort it.
    pub async fn recursive_crawl(
        &mut self,
        request: CrawlRequest,
    ) -> Result<CrawlOutcome, CrawlError> {
        let seed = self.seed_if_empty(request.url.as_deref())?;
        let depth_budget = request.depth;

        tracing::info!(
            "Starting crawl with depth budget {}{}",
            depth_budget,
            seed.as_deref()
                .map(|url| format!(" from seed {}", url))
                .unwrap_or_default()
        );

        let mut steps = Vec::new();

        for iteration in 0..depth_budget {
            let candidate = match self.select_candidate(iteration, seed.as_deref())? {
                Some(entry) => entry,
                None => {
                    tracing::info!("No more links to crawl at depth {}", iteration);
                    return Ok(CrawlOutcome {
                        status: CrawlStatus::Exhausted { depth: iteration },
                        depth_budget,
                        steps,
                        stats: self.crawl_stats()?,
                    });
                }
            };

            let step = self.crawl_entry(&candidate).await?;
            steps.push(step);
        }

        let stats = self.crawl_stats()?;
        tracing::info!(
            "Crawl finished: {} steps, {} links pending, {} crawled",
            steps.len(),
            stats.links_to_crawl,
            stats.links_crawled
        );

        Ok(CrawlOutcome {
            status: CrawlStatus::Completed,
            depth_budget,
            steps,
            stats,
        })
    }

    /// Counts frontier entries and content tasks by state
    pub fn crawl_stats(&self) -> Result<CrawlStats, CrawlError> {
        Ok(CrawlStats {
            links_to_crawl: self.storage.count_links_by_crawled(false)?,
            links_crawled: self.storage.count_links_by_crawled(true)?,
            links_to_scrape: self.storage.count_tasks_by_processed(false)?,
            links_scraped: self.storage.count_tasks_by_processed(true)?,
        })
    }

    /// Inserts the seed at depth 0 if the frontier is empty
    ///
    /// Returns the seed URL when one was inserted. Validation happens
    /// before any write.
    fn seed_if_empty(&mut self, url: Option<&str>) -> Result<Option<String>, CrawlError> {
        if self.storage.count_links()? > 0 {
            if let Some(url) = url {
                tracing::info!("Frontier is not empty, ignoring seed {}", url);
            }
            return Ok(None);
        }

        let url = url.ok_or_else(|| {
            CrawlError::Validation(
                "URL is required in the POST body for the first crawl.".to_string(),
            )
        })?;

        if !is_syntactically_valid(url) {
            return Err(CrawlError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }

        self.storage.insert_link_if_absent(&NewLinkEntry {
            url: url.to_string(),
            depth: 0,
            source_url: None,
        })?;
        tracing::info!("Seeded frontier with {}", url);

        Ok(Some(url.to_string()))
    }

    /// Picks the entry to crawl in one iteration
    ///
    /// Order: the seed on the first iteration, then an entry whose depth
    /// equals the iteration index, then any uncrawled entry.
    fn select_candidate(
        &self,
        iteration: u32,
        seed: Option<&str>,
    ) -> Result<Option<LinkEntry>, CrawlError> {
        let preferred = match seed {
            Some(url) if iteration == 0 => self.storage.find_uncrawled_link_by_url(url)?,
            _ => self.storage.find_uncrawled_link_at_depth(iteration)?,
        };

        match preferred {
            Some(entry) => Ok(Some(entry)),
            None => Ok(self.storage.find_any_uncrawled_link()?),
        }
    }

    /// Crawls one frontier entry and records what it links to
    async fn crawl_entry(&mut self, entry: &LinkEntry) -> Result<CrawlStep, CrawlError> {
        let is_wiki = is_wiki_url(&entry.url);
        tracing::debug!("Crawling {} at depth {}", entry.url, entry.depth);

        let fetched = fetch_links(&self.fetcher, &entry.url, self.crawl_timeout, is_wiki).await;
        let links = match fetched {
            Ok(links) => links,
            Err(e) if e.is_item_failure() => {
                let message = e.to_string();
                tracing::warn!("Failed to crawl {}: {}", entry.url, message);
                self.storage.mark_link_crawled(entry.id, Some(&message))?;
                return Ok(CrawlStep::failed(entry, message));
            }
            Err(e) => return Err(e),
        };

        self.storage
            .insert_snapshot(&entry.url, &links.links, entry.depth)?;

        let child_depth = entry.depth.saturating_add(1);
        let mut links_added_to_crawl = 0;
        let mut links_added_to_process = 0;

        for link in &links.links {
            let inserted = self.storage.insert_link_if_absent(&NewLinkEntry {
                url: link.clone(),
                depth: child_depth,
                source_url: Some(entry.url.clone()),
            })?;
            if inserted {
                links_added_to_crawl += 1;
            }

            let looks_like_content = is_wiki || has_text_hint(link);
            if looks_like_content {
                let queued = self.storage.insert_task_if_absent(&NewContentTask {
                    url: link.clone(),
                    source_url: Some(entry.url.clone()),
                    looks_like_content,
                    depth: child_depth,
                })?;
                if queued {
                    links_added_to_process += 1;
                }
            }
        }

        self.storage.mark_link_crawled(entry.id, None)?;
        self.ensure_task_for(entry, is_wiki)?;

        tracing::debug!(
            "Crawled {}: {} links, {} new in frontier, {} queued for processing",
            entry.url,
            links.count(),
            links_added_to_crawl,
            links_added_to_process
        );

        Ok(CrawlStep {
            url: entry.url.clone(),
            depth: entry.depth,
            links_found: links.count(),
            links_added_to_crawl,
            links_added_to_process,
            error: None,
        })
    }

    /// Queues a crawled entry for content processing if it is not queued yet
    fn ensure_task_for(&mut self, entry: &LinkEntry, is_wiki: bool) -> Result<(), CrawlError> {
        let source_url = if entry.depth == 0 {
            SEED_SOURCE.to_string()
        } else {
            entry
                .source_url
                .clone()
                .unwrap_or_else(|| UNKNOWN_SOURCE.to_string())
        };

        self.storage.insert_task_if_absent(&NewContentTask {
            url: entry.url.clone(),
            source_url: Some(source_url),
            looks_like_content: is_wiki || has_text_hint(&entry.url),
            depth: entry.depth,
        })?;

        Ok(())
    }
}

/// Fetches a page and extracts its qualifying links
///
/// Links resolve against the requested URL, not the post-redirect one.
async fn fetch_links<F: PageFetcher>(
    fetcher: &F,
    url: &str,
    timeout: Duration,
    is_wiki: bool,
) -> Result<ExtractedLinks, CrawlError> {
    let page = fetcher.fetch(url, timeout).await?;
    page.ensure_parseable()?;
    Ok(extract_links(&page.body, url, is_wiki))
}

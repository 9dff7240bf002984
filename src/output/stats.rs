//! Statistics generation from the crawl database
//!
//! This module provides functionality for extracting and displaying
//! frontier, queue and corpus statistics from the storage layer.

use crate::storage::Storage;
use crate::CrawlError;
use serde::Serialize;

/// Point-in-time rollup of the frontier, task queue and scraped corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RealtimeStats {
    /// Every frontier URL in discovery order
    #[serde(rename = "Links")]
    pub links: Vec<String>,

    #[serde(rename = "Frontier_Links")]
    pub total_frontier_links: u64,

    #[serde(rename = "Crawled_Links")]
    pub crawled_links: u64,

    /// Total content tasks, processed or not
    #[serde(rename = "Total_Number_of_Links")]
    pub total_number_of_links: u64,

    #[serde(rename = "Pending_Links")]
    pub pending_links: u64,

    /// Number of scraped documents
    #[serde(rename = "Scrapped_Links")]
    pub scrapped_links: u64,

    #[serde(rename = "Total_Words_Scrapped")]
    pub total_words_scrapped: u64,
}

/// Loads statistics from storage
///
/// Read-only; the word total counts whitespace-delimited tokens across
/// every scraped document.
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(RealtimeStats)` - Successfully loaded statistics
/// * `Err(CrawlError)` - Failed to query statistics
pub fn realtime_stats<S: Storage + ?Sized>(storage: &S) -> Result<RealtimeStats, CrawlError> {
    let links = storage.list_link_urls()?;

    let total_words_scrapped = storage
        .list_document_contents()?
        .iter()
        .map(|content| content.split_whitespace().count() as u64)
        .sum();

    Ok(RealtimeStats {
        total_frontier_links: links.len() as u64,
        links,
        crawled_links: storage.count_links_by_crawled(true)?,
        total_number_of_links: storage.count_tasks()?,
        pending_links: storage.count_tasks_by_processed(false)?,
        scrapped_links: storage.count_documents()?,
        total_words_scrapped,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &RealtimeStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Frontier:");
    println!("  Total links discovered: {}", stats.total_frontier_links);
    println!("  Links crawled: {}", stats.crawled_links);
    println!(
        "  Links waiting to crawl: {}",
        stats.total_frontier_links.saturating_sub(stats.crawled_links)
    );
    println!();

    println!("Content Queue:");
    println!("  Total queued links: {}", stats.total_number_of_links);
    println!("  Pending links: {}", stats.pending_links);
    println!();

    println!("Corpus:");
    println!("  Scraped documents: {}", stats.scrapped_links);
    println!("  Total words: {}", stats.total_words_scrapped);

    let processed = stats
        .total_number_of_links
        .saturating_sub(stats.pending_links);
    let success_rate = if processed > 0 {
        (stats.scrapped_links as f64 / processed as f64) * 100.0
    } else {
        0.0
    };

    println!();
    println!(
        "Success Rate: {:.1}% ({} / {} processed links scraped)",
        success_rate, stats.scrapped_links, processed
    );
}

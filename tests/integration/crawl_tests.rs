//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test the full
//! crawl, process and stats cycle end-to-end against an on-disk database.

use corpus_crawler::config::Config;
use corpus_crawler::crawler::{
    build_engine, CrawlEngine, CrawlRequest, CrawlStatus, FetchedPage, PageFetcher,
    ProcessDetail,
};
use corpus_crawler::storage::{SqliteStorage, Storage};
use corpus_crawler::{realtime_stats, CrawlError};
use std::future::Future;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration storing its database in `dir`
fn create_test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.storage.database_path = dir
        .path()
        .join("corpus.db")
        .to_string_lossy()
        .into_owned();
    config.fetcher.crawl_timeout_secs = 5;
    config.fetcher.scrape_timeout_secs = 5;
    config
}

/// Mounts an HTML page on the mock server
async fn mount_page(server: &MockServer, page_path: &str, title: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!(
                    "<html><head><title>{}</title></head><body>{}</body></html>",
                    title, body
                ))
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_process_and_stats_cycle() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        "Home",
        r#"<a href="/blog/one">One</a> <a href="/blog/two">Two</a> <a href="/p/x">X</a>
           <a href="/logo.png">Logo</a> <a href="mailto:me@example.com">Mail</a>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/blog/one",
        "First Post",
        r#"<p>The first post has some words.</p><a href="/">Home</a>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/blog/two",
        "Second Post",
        r#"<p>Another post.</p><a href="/blog/one">One</a>"#,
    )
    .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&dir);
    let mut engine = build_engine(&config).expect("Failed to build engine");

    let seed = format!("{}/", base_url);
    let outcome = engine
        .recursive_crawl(CrawlRequest::seed(&seed, 3))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.status, CrawlStatus::Completed);
    assert_eq!(outcome.steps.len(), 3);
    assert!(outcome.steps.iter().all(|step| step.error.is_none()));
    assert_eq!(outcome.steps[0].url, seed);
    assert_eq!(outcome.steps[0].links_found, 3);

    // /p/x is in the frontier but never crawled and has no content hint
    assert_eq!(outcome.stats.links_crawled, 3);
    assert_eq!(outcome.stats.links_to_crawl, 1);
    assert_eq!(outcome.stats.links_to_scrape, 3);

    let result = engine
        .process_all_links()
        .await
        .expect("Processing failed");
    assert_eq!(result.total_unprocessed, 3);
    assert_eq!(result.success, 3);
    assert_eq!(result.failed, 0);

    let titles: Vec<_> = result
        .details
        .iter()
        .filter_map(|detail| match detail {
            ProcessDetail::Success { title, .. } => Some(title.as_str()),
            ProcessDetail::Failure { .. } => None,
        })
        .collect();
    assert!(titles.contains(&"Home"));
    assert!(titles.contains(&"First Post"));
    assert!(titles.contains(&"Second Post"));

    let stats = realtime_stats(engine.storage()).expect("Failed to load stats");
    assert_eq!(stats.links.len(), 4);
    assert_eq!(stats.total_number_of_links, 3);
    assert_eq!(stats.pending_links, 0);
    assert_eq!(stats.scrapped_links, 3);
    assert!(stats.total_words_scrapped > 10);
}

#[tokio::test]
async fn test_failed_fetch_is_recorded_and_processing_continues() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        "Home",
        r#"<a href="/blog/gone">Gone</a><a href="/blog/ok">Ok</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/blog/gone"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/blog/ok", "Ok", "<p>Fine</p>").await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut engine = build_engine(&create_test_config(&dir)).expect("Failed to build engine");

    engine
        .recursive_crawl(CrawlRequest::seed(format!("{}/", base_url), 1))
        .await
        .expect("Crawl failed");

    let result = engine
        .process_all_links()
        .await
        .expect("Processing failed");
    assert_eq!(result.processed, 3);
    assert_eq!(result.success, 2);
    assert_eq!(result.failed, 1);

    let gone = engine
        .storage()
        .get_task_by_url(&format!("{}/blog/gone", base_url))
        .expect("Failed to query task")
        .expect("Task missing");
    assert!(gone.processed);
    let error = gone.error.expect("Error not recorded");
    assert!(error.starts_with("Request error:"), "{}", error);
    assert!(error.contains("500"), "{}", error);

    // Terminal tasks are not retried
    let again = engine
        .process_all_links()
        .await
        .expect("Processing failed");
    assert_eq!(again.processed, 0);
}

#[tokio::test]
async fn test_failed_crawl_marks_entry_and_continues() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        "Home",
        r#"<a href="/blog/missing">Missing</a><a href="/blog/here">Here</a>"#,
    )
    .await;
    mount_page(&mock_server, "/blog/here", "Here", "<p>Present</p>").await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut engine = build_engine(&create_test_config(&dir)).expect("Failed to build engine");

    let outcome = engine
        .recursive_crawl(CrawlRequest::seed(format!("{}/", base_url), 3))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.steps.len(), 3);
    assert_eq!(outcome.stats.links_to_crawl, 0);
    assert_eq!(outcome.stats.links_crawled, 3);

    let missing = engine
        .storage()
        .get_link_by_url(&format!("{}/blog/missing", base_url))
        .expect("Failed to query link")
        .expect("Link missing");
    assert!(missing.crawled);
    assert!(missing.error.expect("Error not recorded").contains("404"));

    // Seed plus both children; the failed page was queued when discovered
    assert_eq!(engine.storage().count_tasks().expect("Failed to count"), 3);
}

#[tokio::test]
async fn test_resume_ignores_new_seed_across_restarts() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        "Home",
        r#"<a href="/article/next">Next</a>"#,
    )
    .await;
    mount_page(&mock_server, "/article/next", "Next", "<p>Next page</p>").await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&dir);

    {
        let mut engine = build_engine(&config).expect("Failed to build engine");
        engine
            .recursive_crawl(CrawlRequest::seed(format!("{}/", base_url), 1))
            .await
            .expect("Crawl failed");
    }

    let mut engine = build_engine(&config).expect("Failed to reopen engine");
    let other = format!("{}/other", base_url);
    let outcome = engine
        .recursive_crawl(CrawlRequest::seed(&other, 1))
        .await
        .expect("Resume failed");

    assert_eq!(outcome.steps.len(), 1);
    assert_eq!(outcome.steps[0].url, format!("{}/article/next", base_url));
    assert_eq!(outcome.steps[0].depth, 1);
    assert!(engine
        .storage()
        .get_link_by_url(&other)
        .expect("Failed to query link")
        .is_none());
}

#[tokio::test]
async fn test_first_crawl_without_url_is_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut engine = build_engine(&create_test_config(&dir)).expect("Failed to build engine");

    let result = engine.recursive_crawl(CrawlRequest::resume(2)).await;

    assert!(matches!(result, Err(CrawlError::Validation(_))));
    assert_eq!(engine.storage().count_links().expect("Failed to count"), 0);
}

/// Serves canned wiki pages, which a loopback mock server cannot impersonate
struct WikiFixture;

const RUST_ARTICLE: &str = "https://en.wikipedia.org/wiki/Rust_(programming_language)";

impl PageFetcher for WikiFixture {
    fn fetch(
        &self,
        url: &str,
        _timeout: Duration,
    ) -> impl Future<Output = Result<FetchedPage, CrawlError>> + Send {
        let result = if url == RUST_ARTICLE {
            Ok(FetchedPage::html(
                url,
                r#"<html><head><title>Rust (programming language) - Wikipedia</title></head><body>
                    <div id="mw-navigation"><a href="/wiki/Main_Page">Main page</a></div>
                    <div id="mw-content-text"><div class="mw-parser-output">
                        <table class="infobox"><tr><td>Designed by Graydon Hoare</td></tr></table>
                        <p>Rust is a <a href="/wiki/Systems_programming">systems</a> language.</p>
                        <h2>History</h2>
                        <p>It began in <a href="/wiki/Mozilla">Mozilla</a>.</p>
                        <ul>
                            <li><a href="/wiki/Special:BookSources">Sources</a></li>
                            <li><a href="/wiki/File:Logo.svg">Logo</a></li>
                            <li><a href="/w/index.php?title=Rust&amp;action=edit">edit</a></li>
                        </ul>
                        <div class="navbox"><a href="/wiki/Template:Languages">Languages</a></div>
                    </div></div>
                </body></html>"#,
            ))
        } else {
            Err(CrawlError::Transport {
                url: url.to_string(),
                message: format!("HTTP 404 for {}", url),
            })
        };

        std::future::ready(result)
    }
}

#[tokio::test]
async fn test_wiki_crawl_and_scrape() {
    let storage = SqliteStorage::new_in_memory().expect("Failed to open storage");
    let mut engine = CrawlEngine::new(storage, WikiFixture);

    let outcome = engine
        .recursive_crawl(CrawlRequest::seed(RUST_ARTICLE, 1))
        .await
        .expect("Crawl failed");

    let step = &outcome.steps[0];
    assert_eq!(step.links_found, 2);
    assert_eq!(step.links_added_to_process, 2);

    let storage = engine.storage();
    for article in ["Systems_programming", "Mozilla"] {
        let url = format!("https://en.wikipedia.org/wiki/{}", article);
        let task = storage
            .get_task_by_url(&url)
            .expect("Failed to query task")
            .expect("Task missing");
        assert!(task.looks_like_content);
        assert_eq!(task.depth, 1);
    }
    assert!(storage
        .get_link_by_url("https://en.wikipedia.org/wiki/Main_Page")
        .expect("Failed to query link")
        .is_none());

    let result = engine
        .process_all_links()
        .await
        .expect("Processing failed");
    assert_eq!(result.success, 1);
    assert_eq!(result.failed, 2);

    let content_id = result
        .details
        .iter()
        .find_map(|detail| match detail {
            ProcessDetail::Success { content_id, .. } => Some(*content_id),
            ProcessDetail::Failure { .. } => None,
        })
        .expect("No successful scrape");

    let document = engine
        .storage()
        .get_document(content_id)
        .expect("Document missing");
    assert_eq!(
        document.content,
        "# Rust (programming language) - Wikipedia\n\n\
         Rust is a systems language.\n\n\
         ## History\n\n\
         It began in Mozilla."
    );
    assert_eq!(document.source_url.as_deref(), Some("seed_url"));
}

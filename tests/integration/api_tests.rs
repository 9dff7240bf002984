//! Integration tests for the HTTP API
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`;
//! pages are served by a wiremock mock server.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use corpus_crawler::api::{router, AppState};
use corpus_crawler::config::FetcherConfig;
use corpus_crawler::crawler::{CrawlEngine, HttpFetcher};
use corpus_crawler::storage::SqliteStorage;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a router over a fresh database file; keep the directory alive
fn test_router() -> (Router, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("corpus.db");

    let storage = SqliteStorage::new(&db_path).expect("Failed to open storage");
    let stats_reader = SqliteStorage::new(&db_path).expect("Failed to open stats reader");
    let fetcher = HttpFetcher::new(&FetcherConfig::default()).expect("Failed to build fetcher");

    let state = AppState::new(CrawlEngine::new(storage, fetcher), stats_reader, 1);
    (router(state), dir)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = serde_json::from_slice(&bytes).expect("Body is not JSON");
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

#[tokio::test]
async fn test_first_crawl_without_url_is_bad_request() {
    let (app, _dir) = test_router();

    let (status, body) = send(&app, post_json("/recursive-crawl", json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(
        body["message"],
        "URL is required in the POST body for the first crawl."
    );
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_invalid_seed_is_bad_request() {
    let (app, _dir) = test_router();

    let (status, body) = send(
        &app,
        post_json("/recursive-crawl", json!({"url": "nope", "depth": 2})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid URL format: nope");
}

#[tokio::test]
async fn test_empty_body_is_treated_as_no_url() {
    let (app, _dir) = test_router();

    let request = Request::builder()
        .method("POST")
        .uri("/recursive-crawl")
        .body(Body::empty())
        .expect("Failed to build request");
    let (status, _) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_crawl_process_and_stats_over_http() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r#"<html><head><title>Home</title></head><body>
                        <a href="/news/today">Today</a>
                    </body></html>"#,
                )
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/news/today"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    "<html><head><title>Today</title></head><body><p>Nothing happened.</p></body></html>",
                )
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let (app, _dir) = test_router();
    let seed = format!("{}/", mock_server.uri());

    let (status, body) = send(
        &app,
        post_json("/recursive-crawl", json!({"url": seed, "depth": "1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Crawling completed for 1 depth levels");
    assert_eq!(body["stats"]["links_crawled"], 1);
    assert_eq!(body["stats"]["links_to_crawl"], 1);
    assert_eq!(body["stats"]["links_to_scrape"], 2);
    assert_eq!(body["steps"][0]["links_found"], 1);

    let (status, body) = send(&app, post_json("/process-all-links", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "complete");
    assert_eq!(body["results"]["processed"], 2);
    assert_eq!(body["results"]["success"], 2);
    assert_eq!(body["results"]["details"][0]["status"], "success");

    let (status, body) = send(&app, get("/realtime-stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["Links"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["data"]["Total_Number_of_Links"], 2);
    assert_eq!(body["data"]["Scrapped_Links"], 2);
    assert_eq!(body["data"]["Pending_Links"], 0);
    assert!(body["data"]["Total_Words_Scrapped"].as_u64().unwrap_or(0) > 0);

    // The frontier is seeded, so a new URL is ignored and the next entry is crawled
    let (status, body) = send(
        &app,
        post_json(
            "/recursive-crawl",
            json!({"url": "https://elsewhere.test/", "depth": 2}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "info");
    assert_eq!(body["message"], "No more links to crawl at depth 1");
    assert_eq!(body["steps"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_process_with_empty_queue() {
    let (app, _dir) = test_router();

    let (status, body) = send(&app, post_json("/process-all-links", json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "complete");
    assert_eq!(body["message"], "No unprocessed links found");
    assert_eq!(body["results"]["processed"], 0);
}

#[tokio::test]
async fn test_stats_on_empty_store() {
    let (app, _dir) = test_router();

    let (status, body) = send(&app, get("/realtime-stats")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["Links"], json!([]));
    assert_eq!(body["data"]["Total_Words_Scrapped"], 0);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (app, _dir) = test_router();

    let request = Request::builder()
        .method("POST")
        .uri("/recursive-crawl")
        .header("content-type", "application/json")
        .body(Body::from("{\"url\": "))
        .expect("Failed to build request");
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert!(body["message"]
        .as_str()
        .is_some_and(|message| message.contains("Invalid JSON body")));
}

#[tokio::test]
async fn test_stats_answer_while_crawl_is_running() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><head><title>Slow</title></head><body></body></html>")
                .insert_header("content-type", "text/html")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let (app, _dir) = test_router();
    let seed = format!("{}/", mock_server.uri());

    let crawl = tokio::spawn({
        let app = app.clone();
        let request = post_json("/recursive-crawl", json!({"url": seed, "depth": 1}));
        async move { send(&app, request).await }
    });

    // Let the crawl seed the frontier and start waiting on the slow page
    tokio::time::sleep(Duration::from_millis(500)).await;

    let started = Instant::now();
    let (status, body) =
        tokio::time::timeout(Duration::from_secs(1), send(&app, get("/realtime-stats")))
            .await
            .expect("Stats blocked behind the running crawl");
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["Links"], json!([seed]));
    assert_eq!(body["data"]["Crawled_Links"], 0);

    let (status, body) = crawl.await.expect("Crawl task panicked");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["stats"]["links_crawled"], 1);
}

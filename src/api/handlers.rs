use super::{timestamp, ApiError, AppState};
use crate::crawler::{CrawlRequest, CrawlStats, CrawlStatus, CrawlStep, PageFetcher, ProcessAllResult};
use crate::output::{realtime_stats as load_realtime_stats, RealtimeStats};
use crate::storage::Storage;
use crate::CrawlError;
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body accepted by `POST /recursive-crawl`
#[derive(Debug, Default, Deserialize)]
pub struct CrawlBody {
    pub url: Option<String>,
    /// Integer or numeric string
    pub depth: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct CrawlResponse {
    pub status: &'static str,
    pub message: String,
    pub stats: CrawlStats,
    pub steps: Vec<CrawlStep>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub status: &'static str,
    pub message: String,
    pub results: ProcessAllResult,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub status: &'static str,
    pub data: RealtimeStats,
    pub timestamp: String,
}

/// Reads a depth budget from a JSON value
///
/// Integers and numeric strings are accepted; fractions are truncated and
/// negatives clamp to zero. Anything else yields `default`.
pub fn parse_depth(value: Option<&Value>, default: u32) -> u32 {
    let parsed = match value {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|f| f.trunc() as i64)),
        Some(Value::String(text)) => text.trim().parse::<i64>().ok(),
        _ => None,
    };

    match parsed {
        Some(depth) => depth.clamp(0, i64::from(u32::MAX)) as u32,
        None => default,
    }
}

/// An empty body is treated as `{}`
fn parse_crawl_body(body: &[u8]) -> Result<CrawlBody, CrawlError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CrawlBody::default());
    }

    serde_json::from_slice(body)
        .map_err(|e| CrawlError::Validation(format!("Invalid JSON body: {}", e)))
}

pub async fn recursive_crawl<S, F>(
    State(state): State<AppState<S, F>>,
    body: Bytes,
) -> Result<Json<CrawlResponse>, ApiError>
where
    S: Storage + Send + 'static,
    F: PageFetcher + 'static,
{
    let body = parse_crawl_body(&body)?;
    let request = CrawlRequest {
        url: body.url,
        depth: parse_depth(body.depth.as_ref(), state.default_depth),
    };

    let outcome = {
        let mut engine = state.engine.lock().await;
        engine.recursive_crawl(request).await?
    };

    let status = match outcome.status {
        CrawlStatus::Completed => "success",
        CrawlStatus::Exhausted { .. } => "info",
    };

    Ok(Json(CrawlResponse {
        status,
        message: outcome.message(),
        stats: outcome.stats,
        steps: outcome.steps,
        timestamp: timestamp(),
    }))
}

pub async fn process_all_links<S, F>(
    State(state): State<AppState<S, F>>,
) -> Result<Json<ProcessResponse>, ApiError>
where
    S: Storage + Send + 'static,
    F: PageFetcher + 'static,
{
    let results = {
        let mut engine = state.engine.lock().await;
        engine.process_all_links().await?
    };

    Ok(Json(ProcessResponse {
        status: "complete",
        message: results.message(),
        results,
        timestamp: timestamp(),
    }))
}

pub async fn realtime_stats<S, F>(
    State(state): State<AppState<S, F>>,
) -> Result<Json<StatsResponse>, ApiError>
where
    S: Storage + Send + 'static,
    F: PageFetcher + 'static,
{
    let data = {
        let reader = state.stats_reader.lock().await;
        load_realtime_stats(&*reader)?
    };

    Ok(Json(StatsResponse {
        status: "success",
        data,
        timestamp: timestamp(),
    }))
}

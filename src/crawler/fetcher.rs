//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with a browser-identifying user agent
//! - GET requests with a per-call timeout
//! - Error classification into transport failures

use crate::config::FetcherConfig;
use crate::CrawlError;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

/// Content types that are never parsed as documents
const BINARY_CONTENT_TYPES: &[&str] = &[
    "image/",
    "audio/",
    "video/",
    "application/pdf",
    "application/zip",
    "application/octet-stream",
];

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL that was requested
    pub url: String,
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value
    pub content_type: Option<String>,
    /// Page body content
    pub body: String,
}

impl FetchedPage {
    /// Builds a page from an HTML body, as served with a 200 status
    pub fn html(url: &str, body: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            final_url: url.to_string(),
            status_code: 200,
            content_type: Some("text/html; charset=utf-8".to_string()),
            body: body.into(),
        }
    }

    /// Rejects bodies that cannot hold a parseable document
    ///
    /// Missing and text-like content types are accepted.
    pub fn ensure_parseable(&self) -> Result<(), CrawlError> {
        let content_type = match &self.content_type {
            Some(content_type) => content_type.to_ascii_lowercase(),
            None => return Ok(()),
        };

        if BINARY_CONTENT_TYPES
            .iter()
            .any(|binary| content_type.starts_with(binary))
        {
            return Err(CrawlError::Extraction {
                url: self.url.clone(),
                message: format!("unsupported content type {}", content_type),
            });
        }

        Ok(())
    }
}

/// The transport the crawler uses to retrieve pages
///
/// Implementations must return `CrawlError::Transport` for network failures,
/// timeouts, and non-2xx responses.
pub trait PageFetcher: Send + Sync {
    fn fetch(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<FetchedPage, CrawlError>> + Send;
}

/// Fetcher backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a client built from the given configuration
    pub fn new(config: &FetcherConfig) -> Result<Self, CrawlError> {
        let client = build_http_client(config).map_err(|e| {
            CrawlError::System(format!("failed to build HTTP client: {}", e))
        })?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<FetchedPage, CrawlError>> + Send {
        let request = self.client.get(url).timeout(timeout);
        let url = url.to_string();

        async move {
            let response = request
                .send()
                .await
                .map_err(|e| classify_error(&url, timeout, e))?;

            let status = response.status();
            let final_url = response.url().to_string();

            if !status.is_success() {
                return Err(CrawlError::Transport {
                    message: format!("HTTP {} for {}", status.as_u16(), url),
                    url,
                });
            }

            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            let body = response
                .text()
                .await
                .map_err(|e| classify_error(&url, timeout, e))?;

            Ok(FetchedPage {
                url,
                final_url,
                status_code: status.as_u16(),
                content_type,
                body,
            })
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed with reqwest's default policy. The timeout set
/// here is an upper bound; each fetch applies its own.
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    let upper_bound = config.crawl_timeout().max(config.scrape_timeout());

    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(upper_bound)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

fn classify_error(url: &str, timeout: Duration, error: reqwest::Error) -> CrawlError {
    let message = if error.is_timeout() {
        format!("timed out after {}s fetching {}", timeout.as_secs(), url)
    } else if error.is_connect() {
        format!("connection failed for {}: {}", url, error)
    } else {
        error.to_string()
    };

    CrawlError::Transport {
        url: url.to_string(),
        message,
    }
}

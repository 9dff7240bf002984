//! In-memory page transport for engine tests

use crate::crawler::fetcher::{FetchedPage, PageFetcher};
use crate::CrawlError;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

/// Serves fixed HTML bodies by exact URL; anything else is a 404
#[derive(Debug, Default)]
pub struct FixtureFetcher {
    pages: HashMap<String, FetchedPage>,
    requests: Mutex<Vec<String>>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages
            .insert(url.to_string(), FetchedPage::html(url, html));
        self
    }

    pub fn with_content_type(mut self, url: &str, content_type: &str) -> Self {
        let mut page = FetchedPage::html(url, "");
        page.content_type = Some(content_type.to_string());
        self.pages.insert(url.to_string(), page);
        self
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl PageFetcher for FixtureFetcher {
    fn fetch(
        &self,
        url: &str,
        _timeout: Duration,
    ) -> impl Future<Output = Result<FetchedPage, CrawlError>> + Send {
        self.requests.lock().unwrap().push(url.to_string());

        let result = match self.pages.get(url) {
            Some(page) => Ok(page.clone()),
            None => Err(CrawlError::Transport {
                url: url.to_string(),
                message: format!("HTTP 404 for {}", url),
            }),
        };

        std::future::ready(result)
    }
}

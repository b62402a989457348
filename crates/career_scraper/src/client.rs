//! HTTP side of the scraper.
//!
//! The core only needs two things from the network: the body of a profile
//! page and whether a candidate profile URL exists. Both sit behind
//! [`CareerClient`]; [`HttpCareerClient`] is the reqwest implementation and
//! [`ReplayClient`] serves canned pages from memory.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::config::ScraperConfig;
use crate::error::{CareerError, Result};

// ── Client trait ──────────────────────────────────────────────────────────────

#[async_trait]
pub trait CareerClient: Send + Sync {
    /// Page body, non-success status is an error.
    async fn fetch_page(&self, url: &str) -> Result<String>;

    /// `true` on a success status. Transport failures are errors.
    async fn probe(&self, url: &str) -> Result<bool>;
}

// ── reqwest ───────────────────────────────────────────────────────────────────

pub struct HttpCareerClient {
    client: reqwest::Client,
}

impl HttpCareerClient {
    pub fn new(config: &ScraperConfig) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-GB,en;q=0.5"),
        );

        Self {
            client: reqwest::Client::builder()
                .default_headers(headers)
                .user_agent(config.user_agent.as_str())
                .timeout(config.timeout)
                .gzip(true)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }
}

#[async_trait]
impl CareerClient for HttpCareerClient {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CareerError::HttpStatus { url: url.to_string(), status: status.as_u16() });
        }

        Ok(resp.text().await?)
    }

    async fn probe(&self, url: &str) -> Result<bool> {
        let status = self.client.get(url).send().await?.status();
        debug!("probe {} -> {}", url, status);
        Ok(status.is_success())
    }
}

// ── In-memory ─────────────────────────────────────────────────────────────────

/// Serves registered pages, 404 for everything else. Every requested URL is
/// recorded in order.
#[derive(Default)]
pub struct ReplayClient {
    pages: HashMap<String, (u16, String)>,
    requests: Mutex<Vec<String>>,
}

impl ReplayClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), (200, body.into()));
        self
    }

    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.pages.insert(url.into(), (status, String::new()));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn lookup(&self, url: &str) -> (u16, String) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        self.pages.get(url).cloned().unwrap_or((404, String::new()))
    }
}

#[async_trait]
impl CareerClient for ReplayClient {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        match self.lookup(url) {
            (status, body) if (200..300).contains(&status) => Ok(body),
            (status, _) => Err(CareerError::HttpStatus { url: url.to_string(), status }),
        }
    }

    async fn probe(&self, url: &str) -> Result<bool> {
        let (status, _) = self.lookup(url);
        Ok((200..300).contains(&status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replay_serves_registered_pages_and_records_requests() {
        let client = ReplayClient::new()
            .with_page("http://x/a", "<html>a</html>")
            .with_status("http://x/b", 500);

        assert_eq!(client.fetch_page("http://x/a").await.unwrap(), "<html>a</html>");
        assert!(matches!(
            client.fetch_page("http://x/b").await,
            Err(CareerError::HttpStatus { status: 500, .. })
        ));
        assert!(!client.probe("http://x/missing").await.unwrap());
        assert!(client.probe("http://x/a").await.unwrap());

        assert_eq!(
            client.requests(),
            vec!["http://x/a", "http://x/b", "http://x/missing", "http://x/a"]
        );
    }
}

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

/// Fetches one page of HTML by URL. The pipeline only ever talks to this
/// seam, so tests can substitute a deterministic stub.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = "ShorewatchBot/0.1";

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request failed for {url}"))?
            .error_for_status()
            .with_context(|| format!("Non-success status from {url}"))?;

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read body from {url}"))?;

        info!(url, bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

//! Upstream page retrieval.
//!
//! Thin wrapper around a blocking HTTP client. The client is built once
//! from configuration and shared across requests; it is the only component
//! with timeout semantics.

use crate::config::FetchConfig;
use anyhow::{Context, Result};
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced when retrieving an upstream page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL `{0}`")]
    InvalidUrl(String),

    #[error("request to `{0}` failed")]
    Request(String, #[source] reqwest::Error),

    #[error("`{url}` returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Blocking HTTP client for upstream documents.
pub struct PageFetcher {
    client: reqwest::blocking::Client,
}

impl PageFetcher {
    /// Build a client with the configured timeout and user agent.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// Fetch the raw body of `url`.
    ///
    /// Only http(s) URLs are accepted. Non-success upstream statuses are
    /// reported as errors rather than passed through.
    pub fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed =
            url::Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        let response = self
            .client
            .get(parsed)
            .send()
            .map_err(|e| FetchError::Request(url.to_string(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .map_err(|e| FetchError::Request(url.to_string(), e))
    }
}

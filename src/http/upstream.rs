//! Upstream open-data API client.
//!
//! # Responsibilities
//! - One unauthenticated GET per inbound request
//! - Bounded connect and total timeouts
//! - Decode the body as a JSON array of records

use std::time::{Duration, Instant};

use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::transform::Record;

/// Errors from the outbound fetch.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request to {url} timed out")]
    Timeout { url: Url },

    #[error("upstream request to {url} failed: {source}")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("upstream {url} returned status {status}")]
    Status { url: Url, status: StatusCode },

    #[error("upstream {url} returned a body that is not a JSON array of records: {source}")]
    MalformedBody {
        url: Url,
        #[source]
        source: serde_json::Error,
    },
}

/// Client for the upstream dataset API.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// GET `url` and decode the records.
    pub async fn fetch_records(&self, url: Url) -> Result<Vec<Record>, UpstreamError> {
        let start = Instant::now();
        tracing::debug!(url = %url, "Fetching upstream records");

        let result = self.fetch(url).await;
        let outcome = match &result {
            Ok(_) => "ok",
            Err(UpstreamError::Timeout { .. }) => "timeout",
            Err(UpstreamError::Request { .. }) => "network",
            Err(UpstreamError::Status { .. }) => "status",
            Err(UpstreamError::MalformedBody { .. }) => "malformed",
        };
        metrics::record_upstream(outcome, start);
        result
    }

    async fn fetch(&self, url: Url) -> Result<Vec<Record>, UpstreamError> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| request_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status { url, status });
        }

        let body = response.bytes().await.map_err(|e| request_error(&url, e))?;
        let records: Vec<Record> =
            serde_json::from_slice(&body).map_err(|source| UpstreamError::MalformedBody {
                url: url.clone(),
                source,
            })?;

        tracing::debug!(url = %url, records = records.len(), "Upstream records received");
        Ok(records)
    }
}

fn request_error(url: &Url, source: reqwest::Error) -> UpstreamError {
    if source.is_timeout() {
        UpstreamError::Timeout { url: url.clone() }
    } else {
        UpstreamError::Request {
            url: url.clone(),
            source,
        }
    }
}

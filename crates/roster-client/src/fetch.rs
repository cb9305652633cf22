//! Page fetching over HTTP.
//!
//! # Purpose
//! Issues exactly one request per call and normalizes responses into typed
//! [`PageEnvelope`]s. Retries, de-duplication, and staleness are not handled
//! here — that is the query cache's job.
use crate::config::ClientConfig;
use crate::error::FetchError;
use async_trait::async_trait;
use roster_common::{Record, RecordDraft};
use serde::{Deserialize, Serialize};

pub(crate) const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// One fetched batch of records plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEnvelope {
    pub data: Vec<Record>,
    pub page_number: u32,
    pub total_count: u64,
    pub total_pages: u32,
    pub has_next_page: bool,
}

impl PageEnvelope {
    /// Build an envelope, deriving `total_pages` and `has_next_page` from the
    /// reported total. `page_number` is 1-based. The page count saturates so
    /// an oversized reported total cannot wrap it.
    pub fn new(data: Vec<Record>, page_number: u32, total_count: u64, page_size: u32) -> Self {
        let total_pages = u32::try_from(total_count.div_ceil(u64::from(page_size.max(1))))
            .unwrap_or(u32::MAX);
        Self {
            data,
            page_number,
            total_count,
            total_pages,
            has_next_page: page_number < total_pages,
        }
    }
}

/// Seam between the loader/coordinator and the transport. The query cache
/// wraps implementations of this trait and implements it itself.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, page_number: u32) -> Result<PageEnvelope, FetchError>;
    async fn create_record(&self, draft: &RecordDraft) -> Result<Record, FetchError>;
}

/// HTTP implementation of [`PageFetcher`] against the userd REST contract.
pub struct HttpPageFetcher {
    http: reqwest::Client,
    api_url: String,
    page_size: u32,
    fallback_total_count: u64,
}

impl HttpPageFetcher {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
            fallback_total_count: config.fallback_total_count,
        })
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.api_url)
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, page_number: u32) -> Result<PageEnvelope, FetchError> {
        let response = self
            .http
            .get(self.users_url())
            .query(&[("_page", page_number), ("_limit", self.page_size)])
            .send()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            metrics::counter!("roster_client_fetch_errors_total", "kind" => "status").increment(1);
            return Err(FetchError::Network(format!(
                "status {status} fetching page {page_number}"
            )));
        }
        // An absent or unparseable header means the total is unknown; the
        // fallback keeps has_next_page true for early pages.
        let total_count = response
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(self.fallback_total_count);
        let data: Vec<Record> = response.json().await.map_err(|err| {
            metrics::counter!("roster_client_fetch_errors_total", "kind" => "parse").increment(1);
            FetchError::Parse(err.to_string())
        })?;
        metrics::counter!("roster_client_pages_fetched_total").increment(1);
        Ok(PageEnvelope::new(
            data,
            page_number,
            total_count,
            self.page_size,
        ))
    }

    async fn create_record(&self, draft: &RecordDraft) -> Result<Record, FetchError> {
        let response = self
            .http
            .post(self.users_url())
            .json(draft)
            .send()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Network(format!("status {status} creating record")));
        }
        response
            .json()
            .await
            .map_err(|err| FetchError::Parse(err.to_string()))
    }
}

//! Query-level caching in front of a [`PageFetcher`].
//!
//! # Purpose
//! The data-fetching collaborator: de-duplicates concurrent fetches of the
//! same page, retries a failed fetch once, serves cached pages inside the
//! staleness window, and lazily evicts pages unused past the GC window.
//!
//! # Design notes
//! A per-page async mutex serializes callers of the same page; the second
//! caller wakes to find the first caller's freshly cached envelope instead
//! of issuing its own request. Expiry is checked on access — no background
//! sweeper.
use crate::config::ClientConfig;
use crate::error::FetchError;
use crate::fetch::{PageEnvelope, PageFetcher};
use async_trait::async_trait;
use roster_common::{Record, RecordDraft};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

#[derive(Debug)]
struct CacheSlot {
    envelope: PageEnvelope,
    fetched_at: Instant,
    last_used: Instant,
}

pub struct QueryCache {
    fetcher: Arc<dyn PageFetcher>,
    entries: RwLock<HashMap<u32, CacheSlot>>,
    // One guard per page number; guards are never removed, which is bounded
    // by the number of distinct pages a session touches.
    guards: Mutex<HashMap<u32, Arc<Mutex<()>>>>,
    retry_limit: u32,
    stale_after: Duration,
    gc_after: Duration,
}

impl QueryCache {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &ClientConfig) -> Self {
        Self {
            fetcher,
            entries: RwLock::new(HashMap::new()),
            guards: Mutex::new(HashMap::new()),
            retry_limit: config.retry_limit,
            stale_after: config.stale_after,
            gc_after: config.gc_after,
        }
    }

    pub async fn cached_pages(&self) -> usize {
        self.entries.read().await.len()
    }

    async fn guard_for(&self, page_number: u32) -> Arc<Mutex<()>> {
        let mut guards = self.guards.lock().await;
        guards.entry(page_number).or_default().clone()
    }

    /// GC-sweep, then return the cached envelope if it is still fresh,
    /// touching its last-used stamp.
    async fn fresh_entry(&self, page_number: u32) -> Option<PageEnvelope> {
        let mut entries = self.entries.write().await;
        let gc_after = self.gc_after;
        entries.retain(|_, slot| slot.last_used.elapsed() < gc_after);
        let slot = entries.get_mut(&page_number)?;
        if slot.fetched_at.elapsed() >= self.stale_after {
            return None;
        }
        slot.last_used = Instant::now();
        metrics::counter!("roster_client_query_cache_hits_total").increment(1);
        Some(slot.envelope.clone())
    }

    async fn fetch_with_retry(&self, page_number: u32) -> Result<PageEnvelope, FetchError> {
        let attempts = self.retry_limit + 1;
        let mut last_error = None;
        for attempt in 1..=attempts {
            match self.fetcher.fetch_page(page_number).await {
                Ok(envelope) => return Ok(envelope),
                Err(err) => {
                    tracing::debug!(page_number, attempt, error = %err, "page fetch attempt failed");
                    if attempt < attempts {
                        metrics::counter!("roster_client_fetch_retries_total").increment(1);
                    }
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| FetchError::Network("no attempts made".to_string())))
    }
}

#[async_trait]
impl PageFetcher for QueryCache {
    async fn fetch_page(&self, page_number: u32) -> Result<PageEnvelope, FetchError> {
        let guard = self.guard_for(page_number).await;
        let _serialized = guard.lock().await;

        if let Some(envelope) = self.fresh_entry(page_number).await {
            return Ok(envelope);
        }

        let envelope = self.fetch_with_retry(page_number).await?;
        let now = Instant::now();
        self.entries.write().await.insert(
            page_number,
            CacheSlot {
                envelope: envelope.clone(),
                fetched_at: now,
                last_used: now,
            },
        );
        Ok(envelope)
    }

    /// Mutations pass through unretried and uncached.
    async fn create_record(&self, draft: &RecordDraft) -> Result<Record, FetchError> {
        self.fetcher.create_record(draft).await
    }
}

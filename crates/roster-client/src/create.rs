//! Optimistic record creation.
//!
//! # Purpose
//! Validates a draft, synthesizes the full record locally, prepends it to the
//! pagination cache before the POST is issued, then persists it. The caller
//! sees the new row immediately; the server write completes in the
//! background of that perceived latency.
//!
//! # Design notes
//! A failed POST leaves the optimistic row in place and surfaces the error;
//! reconciliation is the next full refetch's job. The server's echo of the
//! created record is ignored: the locally synthesized record is already the
//! row on screen, and the server stores the same draft fields.
use crate::cache::PaginationCache;
use crate::error::CreateError;
use crate::fetch::PageFetcher;
use roster_common::{Record, RecordDraft, validate};
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct InsertCoordinator {
    cache: Arc<RwLock<PaginationCache>>,
    fetcher: Arc<dyn PageFetcher>,
}

impl InsertCoordinator {
    pub fn new(cache: Arc<RwLock<PaginationCache>>, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { cache, fetcher }
    }

    /// Create a record from `draft`. The synthesized record is visible in the
    /// flattened view before this future resolves the server write.
    pub async fn create(&self, draft: RecordDraft) -> Result<Record, CreateError> {
        validate::validate_draft(&draft).map_err(CreateError::Invalid)?;

        let record = Record::from_draft(&draft);
        {
            let mut cache = self.cache.write().await;
            if !cache.prepend_record(record.clone()) {
                // No page fetched yet; the row will arrive with page 1.
                tracing::debug!(id = %record.id, "no cached page; skipping optimistic insert");
            }
        }
        metrics::counter!("roster_client_optimistic_inserts_total").increment(1);

        match self.fetcher.create_record(&draft).await {
            Ok(_echo) => Ok(record),
            Err(err) => {
                // The optimistic row stays; no rollback on write failure.
                tracing::warn!(id = %record.id, error = %err, "record write failed after optimistic insert");
                Err(CreateError::Failed(err.to_string()))
            }
        }
    }
}

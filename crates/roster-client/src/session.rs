//! List session facade.
//!
//! Wires one scrolling list together: a query cache in front of the
//! transport, a pagination cache for arrived rows, a loader driver task
//! consuming viewport signals, and the insert coordinator. Opening a session
//! queues the initial signal so page 1 loads without any scrolling.
use crate::cache::PaginationCache;
use crate::config::ClientConfig;
use crate::create::InsertCoordinator;
use crate::error::{CreateError, FetchError};
use crate::fetch::PageFetcher;
use crate::loader::{self, ScrollLoader};
use crate::observer::{Sentinel, ViewportObserver};
use crate::query_cache::QueryCache;
use crate::sort::{SortColumn, SortDirection, sort_rows};
use roster_common::{Record, RecordDraft};
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;

pub struct ListSession {
    cache: Arc<RwLock<PaginationCache>>,
    coordinator: InsertCoordinator,
    observer: ViewportObserver,
    error_rx: watch::Receiver<Option<FetchError>>,
    driver: JoinHandle<()>,
}

impl ListSession {
    /// Open a session over `fetcher`. All page reads go through a fresh
    /// query cache; creates pass through it unretried.
    pub fn open(fetcher: Arc<dyn PageFetcher>, config: &ClientConfig) -> Self {
        let cached: Arc<dyn PageFetcher> = Arc::new(QueryCache::new(fetcher, config));
        let cache = Arc::new(RwLock::new(PaginationCache::new(config.page_size)));
        let coordinator = InsertCoordinator::new(cache.clone(), cached.clone());

        let (observer, signals) = ViewportObserver::new(config.lookahead_px);
        let loader = ScrollLoader::new(cache.clone(), cached);
        let (error_tx, error_rx) = watch::channel(None);
        let driver = tokio::spawn(loader::drive(loader, signals, error_tx));

        // Mount: the sentinel starts visible in an empty list.
        observer.observe().visible();

        Self {
            cache,
            coordinator,
            observer,
            error_rx,
            driver,
        }
    }

    /// Handle for the rendering surface to report sentinel visibility on.
    /// Replaces any previously issued handle.
    pub fn observe(&self) -> Sentinel {
        self.observer.observe()
    }

    /// Flattened rows in page order.
    pub async fn rows(&self) -> Vec<Record> {
        self.cache.read().await.flatten().cloned().collect()
    }

    /// Flattened rows reordered by `column`; the cache itself is untouched.
    pub async fn rows_sorted(&self, column: SortColumn, direction: SortDirection) -> Vec<Record> {
        let mut rows = self.rows().await;
        sort_rows(&mut rows, column, direction);
        rows
    }

    pub async fn total_known(&self) -> Option<u64> {
        self.cache.read().await.total_known()
    }

    pub async fn is_exhausted(&self) -> bool {
        self.cache.read().await.is_exhausted()
    }

    /// Most recent page-load outcome: `Some` after a failed load, cleared by
    /// the next successful one.
    pub fn last_error(&self) -> Option<FetchError> {
        self.error_rx.borrow().clone()
    }

    pub async fn create(&self, draft: RecordDraft) -> Result<Record, CreateError> {
        self.coordinator.create(draft).await
    }

    pub fn close(self) {}
}

impl Drop for ListSession {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

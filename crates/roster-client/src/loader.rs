//! Scroll-triggered loader.
//!
//! # Purpose
//! Turns viewport-intersection signals into page fetches, gated so that at
//! most one fetch is ever in flight and no fetch is issued once the cache is
//! exhausted.
//!
//! # State machine
//! `Idle` → `Fetching` on a signal while rows remain; `Fetching` → `Idle` on
//! completion (success or failure) while rows remain; either → `Exhausted`
//! once the cache reports exhaustion. `Exhausted` is terminal for the
//! session: totals are not expected to shrink. Fetch errors never exhaust —
//! the loader returns to `Idle` so a later signal retries.
use crate::cache::PaginationCache;
use crate::error::FetchError;
use crate::fetch::PageFetcher;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc, watch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    Idle,
    Fetching,
    Exhausted,
}

pub struct ScrollLoader {
    cache: Arc<RwLock<PaginationCache>>,
    fetcher: Arc<dyn PageFetcher>,
    state: LoaderState,
    next_page: u32,
}

impl ScrollLoader {
    pub fn new(cache: Arc<RwLock<PaginationCache>>, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            cache,
            fetcher,
            state: LoaderState::Idle,
            next_page: 1,
        }
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    /// Handle one intersection signal. Returns `Ok(true)` iff a page was
    /// fetched and appended. Signals while `Fetching` or `Exhausted` are
    /// no-ops; a failed fetch surfaces its error and leaves the loader
    /// retryable.
    pub async fn on_intersection(&mut self) -> Result<bool, FetchError> {
        match self.state {
            LoaderState::Exhausted | LoaderState::Fetching => return Ok(false),
            LoaderState::Idle => {}
        }
        if self.cache.read().await.is_exhausted() {
            self.state = LoaderState::Exhausted;
            return Ok(false);
        }

        self.state = LoaderState::Fetching;
        match self.fetcher.fetch_page(self.next_page).await {
            Ok(envelope) => {
                let mut cache = self.cache.write().await;
                cache.append_page(envelope);
                self.next_page += 1;
                self.state = if cache.is_exhausted() {
                    LoaderState::Exhausted
                } else {
                    LoaderState::Idle
                };
                Ok(true)
            }
            Err(err) => {
                self.state = LoaderState::Idle;
                Err(err)
            }
        }
    }
}

/// Driver task: consume signals until the channel closes or the loader
/// exhausts, publishing the latest query-level error state.
pub(crate) async fn drive(
    mut loader: ScrollLoader,
    mut signals: mpsc::Receiver<()>,
    error_tx: watch::Sender<Option<FetchError>>,
) {
    while signals.recv().await.is_some() {
        match loader.on_intersection().await {
            Ok(_) => {
                let _ = error_tx.send(None);
            }
            Err(err) => {
                tracing::warn!(error = %err, "page load failed; will retry on next signal");
                let _ = error_tx.send(Some(err));
            }
        }
        // Signals that raced the fetch are stale: the surface re-reports
        // visibility after the next render, so drop them instead of
        // letting them trigger immediate follow-up fetches.
        while signals.try_recv().is_ok() {}
        if loader.state() == LoaderState::Exhausted {
            tracing::debug!("loader exhausted; stopping driver");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::PageEnvelope;
    use crate::fetch::tests::sample_record;
    use crate::observer::ViewportObserver;
    use async_trait::async_trait;
    use roster_common::{Record, RecordDraft};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;
    use tokio::time::{Duration, sleep};

    struct PagedFetcher {
        pages: Vec<PageEnvelope>,
        calls: AtomicUsize,
        failures_remaining: AtomicUsize,
        first_call_gate: Option<Arc<Notify>>,
    }

    impl PagedFetcher {
        fn new(pages: Vec<PageEnvelope>) -> Self {
            Self {
                pages,
                calls: AtomicUsize::new(0),
                failures_remaining: AtomicUsize::new(0),
                first_call_gate: None,
            }
        }

        fn failing_first(mut self, failures: usize) -> Self {
            self.failures_remaining = AtomicUsize::new(failures);
            self
        }

        fn gated(mut self, gate: Arc<Notify>) -> Self {
            self.first_call_gate = Some(gate);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageFetcher for PagedFetcher {
        async fn fetch_page(&self, page_number: u32) -> Result<PageEnvelope, FetchError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call == 1
                && let Some(gate) = &self.first_call_gate
            {
                gate.notified().await;
            }
            let remaining = self.failures_remaining.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
                return Err(FetchError::Network("injected failure".to_string()));
            }
            self.pages
                .get(page_number as usize - 1)
                .cloned()
                .ok_or_else(|| FetchError::Network(format!("no page {page_number}")))
        }

        async fn create_record(&self, _draft: &RecordDraft) -> Result<Record, FetchError> {
            Err(FetchError::Network("not a create fetcher".to_string()))
        }
    }

    fn page(count: usize, page_number: u32, total_count: u64) -> PageEnvelope {
        let data = (0..count)
            .map(|i| sample_record(&format!("P{page_number} R{i:02}")))
            .collect();
        PageEnvelope::new(data, page_number, total_count, 10)
    }

    fn new_cache() -> Arc<RwLock<PaginationCache>> {
        Arc::new(RwLock::new(PaginationCache::new(10)))
    }

    #[tokio::test]
    async fn fetches_pages_in_order_until_exhausted() {
        // Property 6: 10 rows then 5 rows, total 15.
        let fetcher = Arc::new(PagedFetcher::new(vec![page(10, 1, 15), page(5, 2, 15)]));
        let cache = new_cache();
        let mut loader = ScrollLoader::new(cache.clone(), fetcher.clone());

        assert_eq!(loader.state(), LoaderState::Idle);
        assert!(loader.on_intersection().await.expect("page 1"));
        assert_eq!(loader.state(), LoaderState::Idle);

        assert!(loader.on_intersection().await.expect("page 2"));
        assert_eq!(loader.state(), LoaderState::Exhausted);

        let cache = cache.read().await;
        assert_eq!(cache.total_fetched(), 15);
        let names: Vec<_> = cache.flatten().map(|r| r.name.clone()).collect();
        let mut expected: Vec<String> =
            (0..10).map(|i| format!("P1 R{i:02}")).collect();
        expected.extend((0..5).map(|i| format!("P2 R{i:02}")));
        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn exhausted_is_terminal() {
        // Property 4: full pages, bound 2 * 10 = 20.
        let fetcher = Arc::new(PagedFetcher::new(vec![page(10, 1, 20), page(10, 2, 20)]));
        let mut loader = ScrollLoader::new(new_cache(), fetcher.clone());

        assert!(loader.on_intersection().await.expect("page 1"));
        assert_eq!(loader.state(), LoaderState::Idle);
        assert!(loader.on_intersection().await.expect("page 2"));
        assert_eq!(loader.state(), LoaderState::Exhausted);

        for _ in 0..3 {
            assert!(!loader.on_intersection().await.expect("no-op"));
            assert_eq!(loader.state(), LoaderState::Exhausted);
        }
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn fetch_error_returns_to_idle_and_retries() {
        let fetcher =
            Arc::new(PagedFetcher::new(vec![page(10, 1, 10)]).failing_first(1));
        let cache = new_cache();
        let mut loader = ScrollLoader::new(cache.clone(), fetcher.clone());

        let err = loader.on_intersection().await.expect_err("injected");
        assert!(matches!(err, FetchError::Network(_)));
        assert_eq!(loader.state(), LoaderState::Idle, "errors never exhaust");

        assert!(loader.on_intersection().await.expect("retry"));
        assert_eq!(cache.read().await.total_fetched(), 10);
    }

    #[tokio::test]
    async fn rapid_signals_produce_exactly_one_fetch() {
        // Property 3: two intersection signals while the first fetch is in
        // flight must coalesce into a single request.
        let gate = Arc::new(Notify::new());
        let fetcher = Arc::new(
            PagedFetcher::new(vec![page(10, 1, 15), page(5, 2, 15)]).gated(gate.clone()),
        );
        let cache = new_cache();
        let loader = ScrollLoader::new(cache.clone(), fetcher.clone());

        let (observer, signals) = ViewportObserver::new(300);
        let (error_tx, _error_rx) = watch::channel(None);
        let driver = tokio::spawn(drive(loader, signals, error_tx));
        let sentinel = observer.observe();

        assert!(sentinel.visible());
        sleep(Duration::from_millis(20)).await;
        // Second signal lands while the fetch is parked on the gate.
        sentinel.visible();
        sentinel.visible();

        gate.notify_one();
        sleep(Duration::from_millis(20)).await;
        assert_eq!(fetcher.calls(), 1);

        drop(observer);
        drop(sentinel);
        driver.await.expect("driver");
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(cache.read().await.total_fetched(), 10);
    }

    #[tokio::test]
    async fn driver_stops_once_exhausted() {
        let fetcher = Arc::new(PagedFetcher::new(vec![page(10, 1, 15), page(5, 2, 15)]));
        let cache = new_cache();
        let loader = ScrollLoader::new(cache.clone(), fetcher.clone());

        let (observer, signals) = ViewportObserver::new(300);
        let (error_tx, _error_rx) = watch::channel(None);
        let driver = tokio::spawn(drive(loader, signals, error_tx));
        let sentinel = observer.observe();

        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while !cache.read().await.is_exhausted() {
            assert!(tokio::time::Instant::now() < deadline, "never exhausted");
            sentinel.visible();
            sleep(Duration::from_millis(5)).await;
        }
        driver.await.expect("driver exits on exhaustion");
        assert_eq!(cache.read().await.total_fetched(), 15);
    }

    #[tokio::test]
    async fn driver_publishes_query_errors() {
        let fetcher =
            Arc::new(PagedFetcher::new(vec![page(10, 1, 10)]).failing_first(1));
        let cache = new_cache();
        let loader = ScrollLoader::new(cache, fetcher);

        let (observer, signals) = ViewportObserver::new(300);
        let (error_tx, mut error_rx) = watch::channel(None);
        let driver = tokio::spawn(drive(loader, signals, error_tx));
        let sentinel = observer.observe();

        sentinel.visible();
        error_rx.changed().await.expect("error published");
        assert!(error_rx.borrow().is_some());

        sentinel.visible();
        error_rx.changed().await.expect("cleared");
        assert!(error_rx.borrow().is_none());

        drop(observer);
        drop(sentinel);
        driver.await.expect("driver");
    }
}

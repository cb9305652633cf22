//! Viewport-intersection subscription.
//!
//! # Purpose
//! Models sentinel visibility as a subscription: the rendering surface asks
//! for a [`Sentinel`] handle and reports visibility transitions on it; the
//! loader driver consumes the resulting signals.
//!
//! # Design notes
//! The signal channel has capacity 1 with drop-new overflow, so any burst of
//! visibility toggles collapses into at most one pending signal. Replacing
//! the sentinel (a re-rendered list swaps the marker element) bumps an
//! observation generation; handles from earlier generations deliver nothing,
//! which is the cleanup-on-change the original design needs to avoid silently
//! losing further loads.
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

pub struct ViewportObserver {
    tx: mpsc::Sender<()>,
    live_generation: Arc<AtomicU64>,
    lookahead_px: u32,
}

/// Handle bound to one observed sentinel element.
#[derive(Clone)]
pub struct Sentinel {
    tx: mpsc::Sender<()>,
    generation: u64,
    live_generation: Arc<AtomicU64>,
    lookahead_px: u32,
}

impl ViewportObserver {
    pub(crate) fn new(lookahead_px: u32) -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        let observer = Self {
            tx,
            live_generation: Arc::new(AtomicU64::new(0)),
            lookahead_px,
        };
        (observer, rx)
    }

    /// Attach to the current sentinel element, detaching every handle issued
    /// before this call.
    pub fn observe(&self) -> Sentinel {
        let generation = self.live_generation.fetch_add(1, Ordering::SeqCst) + 1;
        Sentinel {
            tx: self.tx.clone(),
            generation,
            live_generation: self.live_generation.clone(),
            lookahead_px: self.lookahead_px,
        }
    }
}

impl Sentinel {
    /// Pre-fetch margin the surface should apply before the sentinel is
    /// fully visible.
    pub fn lookahead_px(&self) -> u32 {
        self.lookahead_px
    }

    /// Report that the sentinel intersects the (margin-expanded) viewport.
    /// Returns whether the signal was delivered; `false` means it was
    /// coalesced into an already-pending signal, or this handle is detached.
    pub fn visible(&self) -> bool {
        if self.generation != self.live_generation.load(Ordering::SeqCst) {
            metrics::counter!("roster_client_stale_sentinel_signals_total").increment(1);
            return false;
        }
        match self.tx.try_send(()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(())) => {
                metrics::counter!("roster_client_coalesced_signals_total").increment(1);
                false
            }
            Err(mpsc::error::TrySendError::Closed(())) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signals_reach_the_receiver() {
        let (observer, mut rx) = ViewportObserver::new(300);
        let sentinel = observer.observe();

        assert!(sentinel.visible());
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn burst_of_signals_coalesces_to_one() {
        let (observer, mut rx) = ViewportObserver::new(300);
        let sentinel = observer.observe();

        assert!(sentinel.visible());
        assert!(!sentinel.visible(), "second signal must coalesce");
        assert!(!sentinel.visible());

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err(), "only one signal may be pending");
    }

    #[test]
    fn replaced_sentinel_is_detached() {
        let (observer, mut rx) = ViewportObserver::new(300);
        let old = observer.observe();
        let new = observer.observe();

        assert!(!old.visible(), "stale handle must deliver nothing");
        assert!(rx.try_recv().is_err());

        assert!(new.visible());
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn closed_receiver_drops_signals_quietly() {
        let (observer, rx) = ViewportObserver::new(300);
        let sentinel = observer.observe();
        drop(rx);

        assert!(!sentinel.visible());
    }

    #[test]
    fn lookahead_is_carried_on_the_handle() {
        let (observer, _rx) = ViewportObserver::new(300);
        assert_eq!(observer.observe().lookahead_px(), 300);
    }
}

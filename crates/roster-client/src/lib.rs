// Client library for the roster user listing.
//
// CLIENT-SIDE DESIGN INTENT
// -------------------------
// This crate deliberately serializes page fetches instead of racing them:
// the loader awaits each page before requesting the next, so envelopes land
// in the pagination cache in increasing page order by construction and the
// cache never needs reordering logic. Scroll signals that arrive while a
// fetch is in flight are coalesced (capacity-1 queue, drop-new) rather than
// queued — rapid visibility toggling must never turn into a request storm.
//
// If more parallelism is ever wanted, it has to come with page-number-based
// insertion in the cache, not from firing concurrent fetches at the same
// logical "next page".

pub mod cache;
pub mod config;
pub mod create;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod observer;
pub mod query_cache;
pub mod session;
pub mod sort;

pub use cache::PaginationCache;
pub use config::ClientConfig;
pub use create::InsertCoordinator;
pub use error::{CreateError, FetchError};
pub use fetch::{HttpPageFetcher, PageEnvelope, PageFetcher};
pub use loader::{LoaderState, ScrollLoader};
pub use observer::{Sentinel, ViewportObserver};
pub use query_cache::QueryCache;
pub use session::ListSession;
pub use sort::{SortColumn, SortDirection, sort_rows};

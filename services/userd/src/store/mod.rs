use async_trait::async_trait;
use roster_common::Record;
use roster_common::ids::UserId;
use thiserror::Error;

pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One page of users plus the authoritative total, for the listing endpoint.
#[derive(Debug, Clone)]
pub struct UserPage {
    pub users: Vec<Record>,
    pub total: u64,
}

/// Storage seam for the user listing. Rows keep insertion order so page
/// windows are stable across requests.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// `page_number` is 1-based; a window past the end is an empty page, not
    /// an error.
    async fn page(&self, page_number: u32, limit: u32) -> StoreResult<UserPage>;
    async fn get(&self, id: &UserId) -> StoreResult<Record>;
    async fn insert(&self, record: Record) -> StoreResult<Record>;
    async fn count(&self) -> StoreResult<u64>;
    async fn health_check(&self) -> StoreResult<()>;
    fn backend_name(&self) -> &'static str;
}

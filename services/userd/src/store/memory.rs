//! In-memory implementation of the user store.
//!
//! # Purpose
//! Backs the service with a `Vec` behind `tokio::sync::RwLock`: local
//! development, tests, and demo deployments where durability is not needed.
//!
//! # Durability and consistency
//! - Not durable: all rows are lost on process restart.
//! - Single-process consistency: writes take the write lock; page reads see a
//!   stable window because insertion order never changes after the fact.
//!
//! # Performance characteristics
//! Page reads clone one window of rows. Duplicate-id detection scans the
//! whole vector, which is fine at the row counts this service is seeded with.
use super::{StoreError, StoreResult, UserPage, UserStore};
use async_trait::async_trait;
use roster_common::Record;
use roster_common::ids::UserId;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct InMemoryStore {
    // Insertion-ordered; the listing pages over this order.
    users: Arc<RwLock<Vec<Record>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Bulk-load seed rows, replacing current contents.
    pub async fn load(&self, records: Vec<Record>) {
        let mut users = self.users.write().await;
        *users = records;
        metrics::gauge!("userd_users_total").set(users.len() as f64);
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn page(&self, page_number: u32, limit: u32) -> StoreResult<UserPage> {
        let users = self.users.read().await;
        let total = users.len() as u64;
        let start = (page_number.max(1) as usize - 1).saturating_mul(limit as usize);
        let window = users
            .iter()
            .skip(start)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(UserPage {
            users: window,
            total,
        })
    }

    async fn get(&self, id: &UserId) -> StoreResult<Record> {
        let users = self.users.read().await;
        users
            .iter()
            .find(|record| record.id == *id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("user {id}")))
    }

    async fn insert(&self, record: Record) -> StoreResult<Record> {
        let mut users = self.users.write().await;
        if users.iter().any(|existing| existing.id == record.id) {
            return Err(StoreError::Conflict(format!("user {}", record.id)));
        }
        users.push(record.clone());
        metrics::gauge!("userd_users_total").set(users.len() as f64);
        metrics::counter!("userd_users_created_total").increment(1);
        Ok(record)
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.users.read().await.len() as u64)
    }

    async fn health_check(&self) -> StoreResult<()> {
        let _ = self.users.read().await;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_users;

    async fn seeded(n: usize) -> InMemoryStore {
        let store = InMemoryStore::new();
        store.load(seed_users(n)).await;
        store
    }

    #[tokio::test]
    async fn pages_window_in_insertion_order() {
        let store = seeded(25).await;
        let all = store.page(1, 25).await.expect("all");

        let page2 = store.page(2, 10).await.expect("page 2");
        assert_eq!(page2.total, 25);
        assert_eq!(page2.users.len(), 10);
        assert_eq!(page2.users[0].id, all.users[10].id);

        let page3 = store.page(3, 10).await.expect("page 3");
        assert_eq!(page3.users.len(), 5);
        assert_eq!(page3.users[0].id, all.users[20].id);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_not_an_error() {
        let store = seeded(5).await;
        let page = store.page(9, 10).await.expect("page");
        assert!(page.users.is_empty());
        assert_eq!(page.total, 5);
    }

    #[tokio::test]
    async fn page_zero_is_treated_as_page_one() {
        let store = seeded(5).await;
        let zero = store.page(0, 10).await.expect("page 0");
        let one = store.page(1, 10).await.expect("page 1");
        assert_eq!(
            zero.users.iter().map(|r| r.id).collect::<Vec<_>>(),
            one.users.iter().map(|r| r.id).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn insert_appends_and_bumps_count() {
        let store = seeded(3).await;
        let record = seed_users(1).remove(0);
        store.insert(record.clone()).await.expect("insert");

        assert_eq!(store.count().await.expect("count"), 4);
        let page = store.page(1, 10).await.expect("page");
        assert_eq!(page.users.last().map(|r| r.id), Some(record.id));
    }

    #[tokio::test]
    async fn duplicate_id_is_a_conflict() {
        let store = seeded(0).await;
        let record = seed_users(1).remove(0);
        store.insert(record.clone()).await.expect("first insert");

        let err = store.insert(record).await.expect_err("duplicate");
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.count().await.expect("count"), 1);
    }

    #[tokio::test]
    async fn get_finds_by_id_or_reports_not_found() {
        let store = seeded(3).await;
        let page = store.page(1, 10).await.expect("page");
        let known = page.users[1].clone();

        let found = store.get(&known.id).await.expect("found");
        assert_eq!(found.name, known.name);

        let missing = UserId::new();
        let err = store.get(&missing).await.expect_err("missing");
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}

//! In-process thread store.
//!
//! Backs the server when no remote store is configured and gives integration
//! tests a real [`ThreadStore`] to exercise. Title search is a
//! case-insensitive substring match over the owner's threads, newest first.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::ports::{StoredThread, ThreadStore, ThreadStoreError};
use crate::domain::{Identity, ThreadId};

/// Thread store held in memory for the life of the process.
pub struct InMemoryThreadStore {
    threads: RwLock<HashMap<String, StoredThread>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryThreadStore {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl InMemoryThreadStore {
    /// Create an empty store stamping records with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            threads: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Create a titled thread owned by `user_id` and return it.
    pub async fn create_thread(
        &self,
        user_id: impl Into<String>,
        title: impl Into<String>,
    ) -> StoredThread {
        let record = StoredThread {
            id: Uuid::new_v4().simple().to_string(),
            user_id: Some(user_id.into()),
            title: Some(title.into()),
            summary: None,
            created_at: Some(self.clock.utc()),
        };
        self.insert(record.clone()).await;
        record
    }

    /// Insert or replace a record.
    pub async fn insert(&self, record: StoredThread) {
        self.threads.write().await.insert(record.id.clone(), record);
    }

    /// Number of stored threads.
    pub async fn len(&self) -> usize {
        self.threads.read().await.len()
    }

    /// Whether the store holds no threads.
    pub async fn is_empty(&self) -> bool {
        self.threads.read().await.is_empty()
    }
}

fn title_matches(record: &StoredThread, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    record
        .title
        .as_deref()
        .is_some_and(|title| title.to_lowercase().contains(needle))
}

#[async_trait]
impl ThreadStore for InMemoryThreadStore {
    async fn delete_by_id(
        &self,
        owner: &Identity,
        thread_id: &ThreadId,
    ) -> Result<(), ThreadStoreError> {
        let mut threads = self.threads.write().await;
        let owned = threads
            .get(thread_id.as_ref())
            .is_some_and(|record| record.user_id.as_deref() == Some(owner.as_ref()));
        if !owned {
            return Err(ThreadStoreError::not_found(thread_id.to_string()));
        }
        threads.remove(thread_id.as_ref());
        Ok(())
    }

    async fn search_titles(
        &self,
        user_id: &Identity,
        query: &str,
        limit: usize,
    ) -> Result<Vec<StoredThread>, ThreadStoreError> {
        let needle = query.trim().to_lowercase();
        let owner = user_id.to_string();
        let threads = self.threads.read().await;

        let mut matches: Vec<StoredThread> = threads
            .values()
            .filter(|record| record.user_id.as_deref() == Some(owner.as_str()))
            .filter(|record| title_matches(record, &needle))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        matches.truncate(limit);
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the in-memory store.
    use super::*;
    use chrono::{DateTime, Duration, Local, TimeZone, Utc};
    use rstest::{fixture, rstest};
    use std::sync::Mutex;

    struct SteppingClock(Mutex<DateTime<Utc>>);

    impl Clock for SteppingClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            let mut now = self
                .0
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            *now += Duration::seconds(1);
            *now
        }
    }

    #[fixture]
    fn store() -> InMemoryThreadStore {
        let start = Utc
            .with_ymd_and_hms(2026, 1, 1, 9, 0, 0)
            .single()
            .expect("valid start instant");
        InMemoryThreadStore::new(Arc::new(SteppingClock(Mutex::new(start))))
    }

    fn user(id: &str) -> Identity {
        Identity::new(id).expect("valid identity")
    }

    #[rstest]
    #[tokio::test]
    async fn delete_removes_existing_thread(store: InMemoryThreadStore) {
        let record = store.create_thread("u1", "Trip planning").await;
        let id = ThreadId::new(&record.id).expect("thread id");

        store
            .delete_by_id(&user("u1"), &id)
            .await
            .expect("delete succeeds");
        assert!(store.is_empty().await);

        let second = store.delete_by_id(&user("u1"), &id).await;
        assert_eq!(second, Err(ThreadStoreError::not_found(record.id)));
    }

    #[rstest]
    #[tokio::test]
    async fn delete_leaves_other_owners_threads_in_place(store: InMemoryThreadStore) {
        let record = store.create_thread("u2", "Private notes").await;
        let id = ThreadId::new(&record.id).expect("thread id");

        let result = store.delete_by_id(&user("u1"), &id).await;

        assert_eq!(result, Err(ThreadStoreError::not_found(record.id)));
        assert_eq!(store.len().await, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn search_is_case_insensitive_newest_first_and_scoped(store: InMemoryThreadStore) {
        let older = store.create_thread("u1", "Invoice March").await;
        store.create_thread("u1", "Holiday ideas").await;
        let newer = store.create_thread("u1", "invoice april").await;
        store.create_thread("u2", "Invoice for someone else").await;

        let found = store
            .search_titles(&user("u1"), "INVOICE", 10)
            .await
            .expect("search succeeds");
        let ids: Vec<_> = found.iter().map(|record| record.id.as_str()).collect();
        assert_eq!(ids, vec![newer.id.as_str(), older.id.as_str()]);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(2, 2)]
    #[case(10, 3)]
    #[tokio::test]
    async fn empty_query_matches_all_up_to_limit(
        store: InMemoryThreadStore,
        #[case] limit: usize,
        #[case] expected: usize,
    ) {
        for title in ["a", "b", "c"] {
            store.create_thread("u1", title).await;
        }
        let found = store
            .search_titles(&user("u1"), "", limit)
            .await
            .expect("search succeeds");
        assert_eq!(found.len(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn untitled_threads_only_match_empty_queries(store: InMemoryThreadStore) {
        store
            .insert(StoredThread {
                id: "untitled".to_owned(),
                user_id: Some("u1".to_owned()),
                title: None,
                summary: None,
                created_at: None,
            })
            .await;

        let with_query = store
            .search_titles(&user("u1"), "x", 5)
            .await
            .expect("search succeeds");
        let without_query = store
            .search_titles(&user("u1"), "", 5)
            .await
            .expect("search succeeds");
        assert!(with_query.is_empty());
        assert_eq!(without_query.len(), 1);
    }
}

//! Driven port for the external thread store.
//!
//! The store persists and indexes AI conversation threads. The command layer
//! depends on exactly two primitives: delete-by-id and title search. Ranking,
//! truncation and deletion semantics belong to the store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::define_port_error;
use crate::domain::{Identity, ThreadId};

define_port_error! {
    /// Failures reported by thread store adapters.
    pub enum ThreadStoreError {
        /// The store could not be reached.
        Connection { message: String } => "thread store unavailable: {message}",
        /// The store did not answer in time.
        Timeout { message: String } => "thread store timed out: {message}",
        /// The thread does not exist (or is not visible to the caller).
        NotFound { thread_id: String } => "thread {thread_id} not found",
        /// The store refused the request.
        Rejected { message: String } => "thread store rejected request: {message}",
        /// The store answered with a payload that could not be decoded.
        Decode { message: String } => "thread store payload invalid: {message}",
        /// Any other store-side failure.
        Query { message: String } => "thread store error: {message}",
    }
}

/// Thread record as the store reports it.
///
/// Carries more than the command layer exposes; the commands project it down
/// to `{id, name}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredThread {
    /// Store-assigned thread identifier.
    pub id: String,
    /// Owner of the thread, when the store reports one.
    pub user_id: Option<String>,
    /// Thread title; untitled threads have none.
    pub title: Option<String>,
    /// Store-generated summary.
    pub summary: Option<String>,
    /// Creation instant.
    pub created_at: Option<DateTime<Utc>>,
}

/// Capability interface over the external thread store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThreadStore: Send + Sync {
    /// Delete `owner`'s thread by id.
    ///
    /// A thread owned by someone else must be left in place and reported as
    /// [`ThreadStoreError::NotFound`]. Whether deleting an unknown id succeeds
    /// or fails is store-defined.
    async fn delete_by_id(
        &self,
        owner: &Identity,
        thread_id: &ThreadId,
    ) -> Result<(), ThreadStoreError>;

    /// Search `user_id`'s threads by title, returning at most `limit` records
    /// in store order.
    async fn search_titles(
        &self,
        user_id: &Identity,
        query: &str,
        limit: usize,
    ) -> Result<Vec<StoredThread>, ThreadStoreError>;
}

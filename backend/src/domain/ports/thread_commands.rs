//! Driving port for the thread commands.
//!
//! Inbound adapters call this port with a per-invocation authentication
//! context and a validated request, and receive a typed result. They never
//! see the store.

use async_trait::async_trait;

use super::AuthContext;
use crate::domain::{
    BackendResult, ThreadDeletionRequest, ThreadSearchRequest, ThreadSearchResult,
};

/// Caller-facing thread operations.
#[async_trait]
pub trait ThreadCommands: Send + Sync {
    /// Delete one thread on behalf of the identity behind `context`.
    ///
    /// # Errors
    ///
    /// - `NotAuthenticated` when no identity resolves; the store is not called.
    /// - `DeleteThreadFailed` when the store call fails.
    async fn delete_thread(
        &self,
        context: &dyn AuthContext,
        request: ThreadDeletionRequest,
    ) -> BackendResult<()>;

    /// Search the caller's threads by title.
    ///
    /// # Errors
    ///
    /// - `NotAuthenticated` when no identity resolves.
    /// - `Forbidden` when `request.user_id()` is not the resolved identity.
    /// - `GetAiThreadsFailed` when the store call fails or returns more
    ///   records than requested.
    async fn search_threads(
        &self,
        context: &dyn AuthContext,
        request: ThreadSearchRequest,
    ) -> BackendResult<ThreadSearchResult>;
}

//! Thread deletion and search commands.
//!
//! Each command resolves the caller's identity before touching the store,
//! sends the single store call through [`guard_external_call`], and returns
//! exactly one [`BackendResult`]. The service holds no per-invocation state.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{AuthContext, ThreadCommands, ThreadStore};
use crate::domain::{
    BackendError, BackendResult, ErrorKind, IdentityResolver, ThreadDeletionRequest,
    ThreadSearchRequest, ThreadSearchResult, fail_as, guard_external_call,
};

/// Raised when the store returns more records than the caller asked for.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("thread store returned {returned} threads for a limit of {limit}")]
pub struct StoreLimitViolation {
    /// Number of records the store returned.
    pub returned: usize,
    /// Limit passed to the store.
    pub limit: usize,
}

/// Thread command service backed by a [`ThreadStore`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use thread_gate::domain::ports::{FixtureAuthContext, ThreadCommands};
/// use thread_gate::domain::{IdentityResolver, ThreadSearchRequest, ThreadService};
/// use thread_gate::outbound::memory::InMemoryThreadStore;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = Arc::new(InMemoryThreadStore::default());
/// store.create_thread("user_1", "Invoice questions").await;
/// let service = ThreadService::new(store, IdentityResolver::default());
///
/// let context = FixtureAuthContext::authenticated("user_1");
/// let request = ThreadSearchRequest::try_new("user_1", "invoice", 5).unwrap();
/// let result = service.search_threads(&context, request).await.unwrap();
/// assert_eq!(result.threads.len(), 1);
/// # });
/// ```
pub struct ThreadService<S: ?Sized> {
    store: Arc<S>,
    resolver: IdentityResolver,
}

impl<S: ?Sized> Clone for ThreadService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            resolver: self.resolver.clone(),
        }
    }
}

impl<S: ?Sized> ThreadService<S> {
    /// Create a service over `store`, gating calls with `resolver`.
    pub fn new(store: Arc<S>, resolver: IdentityResolver) -> Self {
        Self { store, resolver }
    }
}

#[async_trait]
impl<S> ThreadCommands for ThreadService<S>
where
    S: ThreadStore + ?Sized,
{
    async fn delete_thread(
        &self,
        context: &dyn AuthContext,
        request: ThreadDeletionRequest,
    ) -> BackendResult<()> {
        let identity = self.resolver.resolve(context).await?;
        let thread_id = request.into_thread_id();
        debug!(user = %identity, thread_id = %thread_id, "deleting thread");

        guard_external_call(
            self.store.delete_by_id(&identity, &thread_id),
            fail_as(ErrorKind::DeleteThreadFailed),
        )
        .await
        .inspect_err(|error| {
            warn!(
                user = %identity,
                thread_id = %thread_id,
                cause = ?error.cause().map(ToString::to_string),
                "thread deletion failed"
            );
        })?;

        info!(user = %identity, thread_id = %thread_id, "thread deleted");
        Ok(())
    }

    async fn search_threads(
        &self,
        context: &dyn AuthContext,
        request: ThreadSearchRequest,
    ) -> BackendResult<ThreadSearchResult> {
        let identity = self.resolver.resolve(context).await?;
        if request.user_id() != identity.as_ref() {
            warn!(
                user = %identity,
                requested_user = request.user_id(),
                "search for another user's threads rejected"
            );
            return Err(BackendError::forbidden(
                "Not permitted to search another user's threads",
            ));
        }

        let limit = request.limit();
        debug!(user = %identity, query = request.query(), limit, "searching threads");

        let records = guard_external_call(
            self.store.search_titles(&identity, request.query(), limit),
            fail_as(ErrorKind::GetAiThreadsFailed),
        )
        .await
        .inspect_err(|error| {
            warn!(
                user = %identity,
                cause = ?error.cause().map(ToString::to_string),
                "thread search failed"
            );
        })?;

        if records.len() > limit {
            let violation = StoreLimitViolation {
                returned: records.len(),
                limit,
            };
            warn!(user = %identity, %violation, "thread store ignored the search limit");
            return Err(BackendError::get_ai_threads_failed()
                .with_details(json!({ "returned": violation.returned, "limit": limit }))
                .with_cause(violation));
        }

        info!(user = %identity, matches = records.len(), "thread search completed");
        Ok(records.into_iter().collect())
    }
}

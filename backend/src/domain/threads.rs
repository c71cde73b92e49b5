//! Thread command requests and results.
//!
//! Requests are validated when constructed, so a malformed request never
//! reaches a command or the store. Validation failures convert into
//! `InvalidRequest` errors on the shared result channel.

use std::fmt;

use serde::Serialize;
use serde_json::json;

use crate::domain::BackendError;
use crate::domain::ports::StoredThread;

/// Validation errors for thread command requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThreadValidationError {
    /// `threadId` was missing or blank.
    #[error("thread id must not be empty")]
    EmptyThreadId,
    /// `userId` was missing or blank.
    #[error("user id must not be empty")]
    EmptyUserId,
    /// `limit` was negative.
    #[error("limit must be zero or greater, got {limit}")]
    NegativeLimit {
        /// The rejected value.
        limit: i64,
    },
}

impl ThreadValidationError {
    /// Request field the error refers to, in wire casing.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyThreadId => "threadId",
            Self::EmptyUserId => "userId",
            Self::NegativeLimit { .. } => "limit",
        }
    }
}

impl From<ThreadValidationError> for BackendError {
    fn from(value: ThreadValidationError) -> Self {
        BackendError::invalid_request(value.to_string())
            .with_details(json!({ "field": value.field() }))
    }
}

/// Store-assigned thread identifier.
///
/// # Examples
/// ```
/// use thread_gate::domain::ThreadId;
///
/// let id = ThreadId::new(" t1 ").unwrap();
/// assert_eq!(id.as_ref(), "t1");
/// assert!(ThreadId::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThreadId(String);

impl ThreadId {
    /// Validate and construct an identifier; surrounding whitespace is trimmed.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ThreadValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ThreadValidationError::EmptyThreadId);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ThreadId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request to delete one thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadDeletionRequest {
    thread_id: ThreadId,
}

impl ThreadDeletionRequest {
    /// Validate a raw thread id into a deletion request.
    pub fn try_new(thread_id: impl AsRef<str>) -> Result<Self, ThreadValidationError> {
        Ok(Self {
            thread_id: ThreadId::new(thread_id)?,
        })
    }

    /// Thread to delete.
    pub fn thread_id(&self) -> &ThreadId {
        &self.thread_id
    }

    /// Consume the request, yielding the thread id.
    pub fn into_thread_id(self) -> ThreadId {
        self.thread_id
    }
}

/// Request to search a user's threads by title.
///
/// ## Invariants
/// - `user_id` is non-blank.
/// - `limit` is non-negative (enforced by its type once validated).
/// - `query` may be empty; the store decides what an empty query matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadSearchRequest {
    user_id: String,
    query: String,
    limit: usize,
}

impl ThreadSearchRequest {
    /// Default result limit used by adapters when the caller omits one.
    pub const DEFAULT_LIMIT: usize = 10;

    /// Validate raw search inputs.
    ///
    /// # Examples
    /// ```
    /// use thread_gate::domain::{ThreadSearchRequest, ThreadValidationError};
    ///
    /// let request = ThreadSearchRequest::try_new("user_1", "invoice", 5).unwrap();
    /// assert_eq!(request.limit(), 5);
    /// assert_eq!(
    ///     ThreadSearchRequest::try_new("user_1", "", -1),
    ///     Err(ThreadValidationError::NegativeLimit { limit: -1 })
    /// );
    /// ```
    pub fn try_new(
        user_id: impl Into<String>,
        query: impl Into<String>,
        limit: i64,
    ) -> Result<Self, ThreadValidationError> {
        let user_id: String = user_id.into();
        let user_id = user_id.trim().to_owned();
        if user_id.is_empty() {
            return Err(ThreadValidationError::EmptyUserId);
        }
        let limit =
            usize::try_from(limit).map_err(|_| ThreadValidationError::NegativeLimit { limit })?;
        Ok(Self {
            user_id,
            query: query.into(),
            limit,
        })
    }

    /// Caller-supplied owner of the threads to search.
    pub fn user_id(&self) -> &str {
        self.user_id.as_str()
    }

    /// Title query; may be empty.
    pub fn query(&self) -> &str {
        self.query.as_str()
    }

    /// Maximum number of threads to return.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// Minimal projection of a thread exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadSummary {
    /// Thread identifier.
    pub id: String,
    /// Thread title; empty when the store has none.
    pub name: String,
}

impl From<StoredThread> for ThreadSummary {
    fn from(record: StoredThread) -> Self {
        Self {
            id: record.id,
            name: record.title.unwrap_or_default(),
        }
    }
}

/// Search outcome in store order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ThreadSearchResult {
    /// Matching threads, never re-sorted by this layer.
    pub threads: Vec<ThreadSummary>,
}

impl FromIterator<StoredThread> for ThreadSearchResult {
    fn from_iter<I: IntoIterator<Item = StoredThread>>(iter: I) -> Self {
        Self {
            threads: iter.into_iter().map(ThreadSummary::from).collect(),
        }
    }
}

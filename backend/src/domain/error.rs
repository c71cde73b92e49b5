//! Closed error taxonomy for the thread command layer.
//!
//! Every fallible operation in the domain returns [`BackendError`]. The type
//! is transport agnostic: inbound adapters map [`ErrorKind`] values to HTTP
//! statuses or any other protocol-specific envelope. Wrapped causes are kept
//! for logging and `source()` chains but never serialised.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::TraceId;

/// Shared, type-erased failure that caused a [`BackendError`].
pub type ErrorCause = Arc<dyn StdError + Send + Sync + 'static>;

/// Stable machine-readable failure category.
///
/// The set is closed so callers can match exhaustively. A new failure mode
/// gets a new kind; existing kinds are never reused for unrelated conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input failed validation before any store call was made.
    InvalidRequest,
    /// No verified identity could be established for the request.
    NotAuthenticated,
    /// A verified identity tried to act on another user's threads.
    Forbidden,
    /// The external store's delete operation failed.
    DeleteThreadFailed,
    /// The external store's search operation failed.
    GetAiThreadsFailed,
}

impl ErrorKind {
    /// Message used when a caller does not supply one.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "Invalid request",
            Self::NotAuthenticated => "User not authenticated",
            Self::Forbidden => "Not permitted to access these threads",
            Self::DeleteThreadFailed => "Failed to delete thread",
            Self::GetAiThreadsFailed => "Failed to get AI threads",
        }
    }

    /// Whether retrying the same request may succeed.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::DeleteThreadFailed | Self::GetAiThreadsFailed)
    }

    /// Whether the caller should prompt the user to sign in again.
    pub fn requires_reauthentication(self) -> bool {
        matches!(self, Self::NotAuthenticated)
    }

    /// Snake-case identifier matching the serialised form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::NotAuthenticated => "not_authenticated",
            Self::Forbidden => "forbidden",
            Self::DeleteThreadFailed => "delete_thread_failed",
            Self::GetAiThreadsFailed => "get_ai_threads_failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every operation in the command layer.
///
/// ## Invariants
/// - `message` is non-empty once trimmed of whitespace.
/// - `trace_id`, when present, is non-empty.
///
/// # Examples
/// ```
/// use thread_gate::domain::{BackendError, ErrorKind};
///
/// let err = BackendError::not_authenticated();
/// assert_eq!(err.kind(), ErrorKind::NotAuthenticated);
/// assert_eq!(err.message(), "User not authenticated");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "BackendErrorDto", into = "BackendErrorDto")]
pub struct BackendError {
    kind: ErrorKind,
    message: String,
    trace_id: Option<String>,
    details: Option<Value>,
    cause: Option<ErrorCause>,
}

/// Validation errors emitted by the fallible constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendErrorValidationError {
    /// The message was blank.
    #[error("error message must not be empty")]
    EmptyMessage,
    /// The trace identifier was blank.
    #[error("trace identifier must not be empty")]
    EmptyTraceId,
}

impl BackendError {
    /// Create an error, falling back to the kind's default message when
    /// `message` is blank.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match Self::try_new(kind, message) {
            Ok(error) => error,
            Err(_) => Self::from_kind(kind),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Result<Self, BackendErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(BackendErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            kind,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
            cause: None,
        })
    }

    /// Create an error carrying the kind's canonical message.
    pub fn from_kind(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: kind.default_message().to_owned(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
            cause: None,
        }
    }

    /// `NotAuthenticated` with the canonical message.
    pub fn not_authenticated() -> Self {
        Self::from_kind(ErrorKind::NotAuthenticated)
    }

    /// `DeleteThreadFailed` with the canonical message.
    pub fn delete_thread_failed() -> Self {
        Self::from_kind(ErrorKind::DeleteThreadFailed)
    }

    /// `GetAiThreadsFailed` with the canonical message.
    pub fn get_ai_threads_failed() -> Self {
        Self::from_kind(ErrorKind::GetAiThreadsFailed)
    }

    /// Convenience constructor for [`ErrorKind::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorKind::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Failure category.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier captured when the error was built.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Supplementary structured details.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Underlying failure, if one was wrapped.
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Attach the failure that produced this error.
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// Attach structured details.
    ///
    /// # Examples
    /// ```
    /// use thread_gate::domain::BackendError;
    /// use serde_json::json;
    ///
    /// let err = BackendError::invalid_request("bad")
    ///     .with_details(json!({ "field": "threadId" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach a trace identifier, replacing any captured one.
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        let trace_id = trace_id.into();
        self.trace_id = (!trace_id.trim().is_empty()).then_some(trace_id);
        self
    }

    /// Attach a trace identifier, rejecting blank values.
    pub fn try_with_trace_id(
        mut self,
        trace_id: impl Into<String>,
    ) -> Result<Self, BackendErrorValidationError> {
        let trace_id = trace_id.into();
        if trace_id.trim().is_empty() {
            return Err(BackendErrorValidationError::EmptyTraceId);
        }
        self.trace_id = Some(trace_id);
        Ok(self)
    }
}

impl PartialEq for BackendError {
    // Causes are opaque and excluded from equality.
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.message == other.message
            && self.trace_id == other.trace_id
            && self.details == other.details
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for BackendError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackendErrorDto {
    code: ErrorKind,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(alias = "trace_id")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<BackendError> for BackendErrorDto {
    fn from(value: BackendError) -> Self {
        Self {
            code: value.kind,
            message: value.message,
            trace_id: value.trace_id,
            details: value.details,
        }
    }
}

impl TryFrom<BackendErrorDto> for BackendError {
    type Error = BackendErrorValidationError;

    fn try_from(value: BackendErrorDto) -> Result<Self, Self::Error> {
        let BackendErrorDto {
            code,
            message,
            trace_id,
            details,
        } = value;

        let mut error = BackendError::try_new(code, message)?;
        // Deserialised payloads carry their own trace id, never the ambient one.
        error.trace_id = None;
        if let Some(id) = trace_id {
            error = error.try_with_trace_id(id)?;
        }
        error.details = details;
        Ok(error)
    }
}

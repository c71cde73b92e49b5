//! Identity-gated thread command layer.
//!
//! Purpose: resolve a verified identity, run one external store call per
//! command, and report every outcome on the [`BackendResult`] channel. Types
//! here are transport agnostic; adapters live in `inbound` and `outbound`.
//!
//! Public surface:
//! - [`BackendError`] / [`ErrorKind`] — closed failure taxonomy.
//! - [`guard_external_call`] — the chokepoint for collaborator calls.
//! - [`IdentityResolver`] / [`Identity`] — the authentication gate.
//! - [`ThreadService`] — deletion and search commands.

pub mod error;
pub mod identity;
pub mod outcome;
pub mod ports;
pub mod thread_service;
pub mod threads;
pub mod trace_id;

pub use self::error::{BackendError, BackendErrorValidationError, ErrorCause, ErrorKind};
pub use self::identity::{Identity, IdentityClaims, IdentityResolver, IdentityValidationError};
pub use self::outcome::{BackendResult, ExternalCallFailure, fail_as, guard_external_call};
pub use self::thread_service::{StoreLimitViolation, ThreadService};
pub use self::threads::{
    ThreadDeletionRequest, ThreadId, ThreadSearchRequest, ThreadSearchResult, ThreadSummary,
    ThreadValidationError,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

//! OpenAPI schema definitions for domain types.
//!
//! Domain types do not derive `ToSchema`; the wrappers here mirror their
//! wire shape so the document stays accurate without coupling the domain to
//! utoipa.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorKind`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorKind)]
pub enum ErrorKindSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No verified identity accompanied the request.
    #[schema(rename = "not_authenticated")]
    NotAuthenticated,
    /// Authenticated but not permitted to access the requested threads.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The thread store failed to delete the thread.
    #[schema(rename = "delete_thread_failed")]
    DeleteThreadFailed,
    /// The thread store failed to search threads.
    #[schema(rename = "get_ai_threads_failed")]
    GetAiThreadsFailed,
}

/// OpenAPI schema for [`crate::domain::BackendError`].
#[derive(ToSchema)]
#[schema(as = crate::domain::BackendError, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "not_authenticated")]
    code: ErrorKindSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "User not authenticated")]
    message: String,
    /// Correlation identifier, echoed in the `trace-id` response header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep [`BackendError`] HTTP-agnostic while letting Actix handlers
//! turn command failures into consistent JSON responses and status codes.

use actix_web::error::QueryPayloadError;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::debug;

use crate::domain::{BackendError, ErrorKind, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, BackendError>;

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorKind::NotAuthenticated => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::DeleteThreadFailed | ErrorKind::GetAiThreadsFailed => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

impl ResponseError for BackendError {
    fn status_code(&self) -> StatusCode {
        status_for(self.kind())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        // Serialisation never includes the cause.
        builder.json(self)
    }
}

/// Turn malformed query strings into `InvalidRequest` responses.
///
/// Install with `web::QueryConfig::default().error_handler(query_error_handler)`.
pub fn query_error_handler(error: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = req.path(), %error, "rejected malformed query string");
    BackendError::invalid_request("Malformed query string")
        .with_details(json!({ "reason": error.to_string() }))
        .into()
}

#[cfg(test)]
mod tests;

//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the thread and health endpoints, the error schema
//! wrappers from [`crate::inbound::http::schemas`], and the session cookie
//! security scheme. Swagger UI serves it in debug builds.

use crate::inbound::http::schemas::{ErrorKindSchema, ErrorSchema};
use crate::inbound::http::threads::{SearchThreadsResponse, ThreadSummaryResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie carrying the caller's identity claims.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Thread gate API",
        description = "Identity-gated deletion and search of AI conversation threads."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::threads::delete_thread,
        crate::inbound::http::threads::search_threads,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorKindSchema,
        SearchThreadsResponse,
        ThreadSummaryResponse
    )),
    tags(
        (name = "threads", description = "Thread deletion and search"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/api/v1/threads/{thread_id}")]
    #[case("/api/v1/threads/search")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn document_lists_endpoint(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn document_registers_error_schema() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert!(schemas.contains_key("crate.domain.BackendError"));
        assert!(schemas.contains_key("crate.domain.ErrorKind"));
    }
}

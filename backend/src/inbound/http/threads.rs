//! Thread command HTTP handlers.
//!
//! ```text
//! DELETE /api/v1/threads/{thread_id}
//! GET /api/v1/threads/search?userId=..&query=..&limit=..
//! ```

use actix_web::{HttpResponse, delete, get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ThreadDeletionRequest, ThreadSearchRequest, ThreadSearchResult};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionAuthContext;
use crate::inbound::http::state::HttpState;

/// Query parameters accepted by the search endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchThreadsQuery {
    /// Owner whose threads are searched; must be the signed-in user.
    pub user_id: Option<String>,
    /// Case-insensitive title filter; absent or empty matches every title.
    pub query: Option<String>,
    /// Maximum number of results; defaults to 10 and must not be negative.
    pub limit: Option<i64>,
}

impl SearchThreadsQuery {
    fn into_request(self) -> ApiResult<ThreadSearchRequest> {
        let limit = self
            .limit
            .unwrap_or(ThreadSearchRequest::DEFAULT_LIMIT as i64);
        Ok(ThreadSearchRequest::try_new(
            self.user_id.unwrap_or_default(),
            self.query.unwrap_or_default(),
            limit,
        )?)
    }
}

/// One matching thread.
#[derive(Debug, Serialize, ToSchema)]
pub struct ThreadSummaryResponse {
    /// Store-assigned thread identifier.
    #[schema(example = "k57a1b2c3d4e5f6")]
    pub id: String,
    /// Thread title; empty when untitled.
    #[schema(example = "Invoice questions")]
    pub name: String,
}

/// Search results in store order.
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchThreadsResponse {
    /// Matching threads, at most `limit` of them.
    pub threads: Vec<ThreadSummaryResponse>,
}

impl From<ThreadSearchResult> for SearchThreadsResponse {
    fn from(result: ThreadSearchResult) -> Self {
        Self {
            threads: result
                .threads
                .into_iter()
                .map(|summary| ThreadSummaryResponse {
                    id: summary.id,
                    name: summary.name,
                })
                .collect(),
        }
    }
}

/// Delete a thread on behalf of the signed-in user.
#[utoipa::path(
    delete,
    path = "/api/v1/threads/{thread_id}",
    params(
        ("thread_id" = String, Path, description = "Thread identifier")
    ),
    responses(
        (status = 204, description = "Thread deleted"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Thread store failed", body = ErrorSchema)
    ),
    tags = ["threads"],
    operation_id = "deleteThread",
    security(("SessionCookie" = []))
)]
#[delete("/threads/{thread_id}")]
pub async fn delete_thread(
    state: web::Data<HttpState>,
    auth: SessionAuthContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let request = ThreadDeletionRequest::try_new(path.into_inner())?;
    state.threads.delete_thread(&auth, request).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Search the signed-in user's threads by title.
#[utoipa::path(
    get,
    path = "/api/v1/threads/search",
    params(
        ("userId" = String, Query, description = "Owner of the threads; must match the session"),
        ("query" = Option<String>, Query, description = "Title substring; empty matches every thread"),
        ("limit" = Option<i64>, Query, description = "Maximum results, default 10")
    ),
    responses(
        (status = 200, description = "Matching threads", body = SearchThreadsResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 503, description = "Thread store failed", body = ErrorSchema)
    ),
    tags = ["threads"],
    operation_id = "searchThreads",
    security(("SessionCookie" = []))
)]
#[get("/threads/search")]
pub async fn search_threads(
    state: web::Data<HttpState>,
    auth: SessionAuthContext,
    query: web::Query<SearchThreadsQuery>,
) -> ApiResult<web::Json<SearchThreadsResponse>> {
    let request = query.into_inner().into_request()?;
    let result = state.threads.search_threads(&auth, request).await?;
    Ok(web::Json(SearchThreadsResponse::from(result)))
}

#[cfg(test)]
mod tests {
    //! Handler coverage against the in-memory store.
    use super::*;
    use std::sync::Arc;

    use actix_session::Session;
    use actix_web::http::StatusCode;
    use actix_web::App;
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::domain::{IdentityClaims, IdentityResolver, ThreadService};
    use crate::inbound::http::error::query_error_handler;
    use crate::inbound::http::session::store_identity_claims;
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use crate::outbound::memory::InMemoryThreadStore;

    async fn sign_in(session: Session, subject: web::Path<String>) -> HttpResponse {
        match store_identity_claims(&session, &IdentityClaims::new(subject.into_inner())) {
            Ok(()) => HttpResponse::NoContent().finish(),
            Err(_) => HttpResponse::InternalServerError().finish(),
        }
    }

    macro_rules! thread_app {
        ($store:expr) => {{
            let service = ThreadService::new($store, IdentityResolver::default());
            actix_web::test::init_service(
                App::new()
                    .app_data(web::Data::new(HttpState::new(Arc::new(service))))
                    .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                    .wrap(test_session_middleware())
                    .route("/sign-in/{subject}", web::post().to(sign_in))
                    .service(web::scope("/api/v1").service(delete_thread).service(search_threads)),
            )
            .await
        }};
    }

    #[rstest]
    #[case(None, None, "", 10)]
    #[case(Some("inv"), Some(3), "inv", 3)]
    fn query_defaults_apply(
        #[case] text: Option<&str>,
        #[case] limit: Option<i64>,
        #[case] expected_query: &str,
        #[case] expected_limit: usize,
    ) {
        let query = SearchThreadsQuery {
            user_id: Some("u1".to_owned()),
            query: text.map(str::to_owned),
            limit,
        };
        let request = query.into_request().expect("valid query");
        assert_eq!(request.query(), expected_query);
        assert_eq!(request.limit(), expected_limit);
    }

    #[actix_web::test]
    async fn signed_in_user_deletes_and_searches() {
        let store = Arc::new(InMemoryThreadStore::default());
        let kept = store.create_thread("user_1", "Invoice April").await;
        let doomed = store.create_thread("user_1", "Invoice March").await;
        let app = thread_app!(store.clone());

        let signed_in = actix_web::test::call_service(
            &app,
            actix_web::test::TestRequest::post().uri("/sign-in/user_1").to_request(),
        )
        .await;
        let cookie = session_cookie(&signed_in);

        let deleted = actix_web::test::call_service(
            &app,
            actix_web::test::TestRequest::delete()
                .uri(&format!("/api/v1/threads/{}", doomed.id))
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

        let found = actix_web::test::call_service(
            &app,
            actix_web::test::TestRequest::get()
                .uri("/api/v1/threads/search?userId=user_1&query=invoice")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(found.status(), StatusCode::OK);
        let body: Value = actix_web::test::read_body_json(found).await;
        assert_eq!(
            body,
            json!({ "threads": [{ "id": kept.id, "name": "Invoice April" }] })
        );
    }

    #[rstest]
    #[case::delete(actix_web::test::TestRequest::delete().uri("/api/v1/threads/t1"))]
    #[case::search(actix_web::test::TestRequest::get().uri("/api/v1/threads/search?userId=user_1"))]
    #[actix_web::test]
    async fn anonymous_requests_are_unauthorised(#[case] request: actix_web::test::TestRequest) {
        let app = thread_app!(Arc::new(InMemoryThreadStore::default()));

        let res = actix_web::test::call_service(&app, request.to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_web::test::read_body_json(res).await;
        assert_eq!(body["code"], "not_authenticated");
        assert_eq!(body["message"], "User not authenticated");
    }

    #[rstest]
    #[case::negative_limit("/api/v1/threads/search?userId=user_1&limit=-1")]
    #[case::missing_user("/api/v1/threads/search?query=x")]
    #[case::non_numeric_limit("/api/v1/threads/search?userId=user_1&limit=ten")]
    #[actix_web::test]
    async fn malformed_searches_are_bad_requests(#[case] uri: &str) {
        let app = thread_app!(Arc::new(InMemoryThreadStore::default()));

        let res = actix_web::test::call_service(&app, actix_web::test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_web::test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
    }
}

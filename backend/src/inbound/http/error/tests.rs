//! Tests for HTTP error mapping.

use super::*;
use crate::domain::TraceId;
use actix_web::body::to_bytes;
use actix_web::{App, web};
use rstest::{fixture, rstest};
use serde::Deserialize;
use serde_json::Value;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(BackendError::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(BackendError::not_authenticated(), StatusCode::UNAUTHORIZED)]
#[case(BackendError::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(BackendError::delete_thread_failed(), StatusCode::SERVICE_UNAVAILABLE)]
#[case(BackendError::get_ai_threads_failed(), StatusCode::SERVICE_UNAVAILABLE)]
fn status_code_matches_error_kind(#[case] error: BackendError, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn response_json(error: &BackendError) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("trace id is ascii").to_owned());
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body = serde_json::from_slice(&bytes).expect("error body is JSON");
    (status, header, body)
}

#[rstest]
#[actix_web::test]
async fn error_responses_carry_trace_id_and_omit_cause(expected_trace_id: String) {
    let error = BackendError::delete_thread_failed()
        .with_trace_id(expected_trace_id.clone())
        .with_cause(std::io::Error::other("socket closed"));

    let (status, header, body) = response_json(&error).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(header.as_deref(), Some(expected_trace_id.as_str()));
    assert_eq!(
        body,
        json!({
            "code": "delete_thread_failed",
            "message": "Failed to delete thread",
            "traceId": expected_trace_id,
        })
    );
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_trace_header() {
    let error = BackendError::invalid_request("bad").with_details(json!({ "field": "limit" }));

    let (status, header, body) = response_json(&error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(header.is_none());
    let decoded: BackendError = serde_json::from_value(body).expect("round trip");
    assert_eq!(decoded.kind(), ErrorKind::InvalidRequest);
    assert_eq!(decoded.details(), Some(&json!({ "field": "limit" })));
}

#[rstest]
#[actix_web::test]
async fn errors_raised_in_scope_pick_up_the_trace_id() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid trace id");
    let error = TraceId::scope(trace_id, async { BackendError::not_authenticated() }).await;

    let (_, header, _) = response_json(&error).await;
    assert_eq!(header.as_deref(), Some(TRACE_ID));
}

#[derive(Debug, Deserialize)]
struct LimitQuery {
    #[expect(dead_code, reason = "only the extraction outcome matters")]
    limit: i64,
}

#[rstest]
#[actix_web::test]
async fn malformed_query_strings_become_invalid_request() {
    let app = actix_web::test::init_service(
        App::new()
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .route(
                "/",
                web::get().to(|_query: web::Query<LimitQuery>| async { "ok" }),
            ),
    )
    .await;

    let res = actix_web::test::call_service(
        &app,
        actix_web::test::TestRequest::get().uri("/?limit=many").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_web::test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
}

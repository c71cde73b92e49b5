//! Reqwest-backed agent thread store.
//!
//! This adapter owns transport details only: URL construction, timeouts,
//! HTTP status mapping and JSON decoding into [`StoredThread`] records.
//!
//! ```text
//! DELETE {base}/threads/{threadId}?userId=..
//! GET    {base}/threads/search?userId=..&query=..&limit=..
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use super::dto::SearchResponseDto;
use crate::domain::ports::{StoredThread, ThreadStore, ThreadStoreError};
use crate::domain::{Identity, ThreadId};

const USER_AGENT: &str = "thread-gate/0.1";

/// Thread store adapter talking to a remote agent store over HTTP.
#[derive(Debug, Clone)]
pub struct HttpThreadStore {
    client: Client,
    base: Url,
}

impl HttpThreadStore {
    /// Build an adapter for the store rooted at `base` with a request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, base })
    }

    fn thread_url(
        &self,
        owner: &Identity,
        thread_id: &ThreadId,
    ) -> Result<Url, ThreadStoreError> {
        let mut url = endpoint(&self.base, &["threads", thread_id.as_ref()])?;
        url.query_pairs_mut().append_pair("userId", owner.as_ref());
        Ok(url)
    }

    fn search_url(
        &self,
        user_id: &Identity,
        query: &str,
        limit: usize,
    ) -> Result<Url, ThreadStoreError> {
        let mut url = endpoint(&self.base, &["threads", "search"])?;
        url.query_pairs_mut()
            .append_pair("userId", user_id.as_ref())
            .append_pair("query", query)
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }
}

fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ThreadStoreError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ThreadStoreError::query(format!("store URL {base} cannot be a base")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[async_trait]
impl ThreadStore for HttpThreadStore {
    async fn delete_by_id(
        &self,
        owner: &Identity,
        thread_id: &ThreadId,
    ) -> Result<(), ThreadStoreError> {
        let url = self.thread_url(owner, thread_id)?;
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ThreadStoreError::not_found(thread_id.to_string()));
        }
        if !status.is_success() {
            let body = response.bytes().await.map_err(map_transport_error)?;
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(())
    }

    async fn search_titles(
        &self,
        user_id: &Identity,
        query: &str,
        limit: usize,
    ) -> Result<Vec<StoredThread>, ThreadStoreError> {
        let url = self.search_url(user_id, query, limit)?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_threads(body.as_ref())
    }
}

fn parse_threads(body: &[u8]) -> Result<Vec<StoredThread>, ThreadStoreError> {
    let decoded: SearchResponseDto = serde_json::from_slice(body).map_err(|error| {
        ThreadStoreError::decode(format!("invalid search payload: {error}"))
    })?;
    decoded
        .into_stored_threads()
        .map_err(ThreadStoreError::decode)
}

fn map_transport_error(error: reqwest::Error) -> ThreadStoreError {
    if error.is_timeout() {
        ThreadStoreError::timeout(error.to_string())
    } else {
        ThreadStoreError::connection(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ThreadStoreError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ThreadStoreError::timeout(message)
        }
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => {
            ThreadStoreError::connection(message)
        }
        _ if status.is_client_error() => ThreadStoreError::rejected(message),
        _ => ThreadStoreError::query(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
        format!("{preview}...")
    } else {
        compact
    }
}

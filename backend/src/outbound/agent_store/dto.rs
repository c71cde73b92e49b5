//! DTOs for decoding agent store search responses.
//!
//! The store reports threads with underscore-prefixed system fields and a
//! floating-point creation time in epoch milliseconds.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::ports::StoredThread;

#[derive(Debug, Deserialize)]
pub(super) struct SearchResponseDto {
    #[serde(default)]
    pub(super) threads: Vec<ThreadDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ThreadDto {
    #[serde(rename = "_id")]
    pub(super) id: String,
    #[serde(rename = "_creationTime")]
    pub(super) creation_time: Option<f64>,
    pub(super) user_id: Option<String>,
    pub(super) title: Option<String>,
    pub(super) summary: Option<String>,
}

impl SearchResponseDto {
    pub(super) fn into_stored_threads(self) -> Result<Vec<StoredThread>, String> {
        self.threads
            .into_iter()
            .map(ThreadDto::into_stored_thread)
            .collect()
    }
}

impl ThreadDto {
    fn into_stored_thread(self) -> Result<StoredThread, String> {
        if self.id.trim().is_empty() {
            return Err("thread record has an empty _id".to_owned());
        }
        let created_at = self.creation_time.and_then(millis_to_instant);
        Ok(StoredThread {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            summary: self.summary,
            created_at,
        })
    }
}

fn millis_to_instant(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(millis.trunc() as i64)
}

//! Single chokepoint for calls that leave the command layer.
//!
//! Store and authentication-context calls are awaited through
//! [`guard_external_call`]. A returned error or a panic inside the call is
//! handed to a mapping function that produces a [`BackendError`], so no raw
//! collaborator failure ever reaches a caller.

use std::any::Any;
use std::error::Error as StdError;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;

use crate::domain::{BackendError, ErrorKind};

/// Result channel for every operation in the command layer.
pub type BackendResult<T> = Result<T, BackendError>;

/// Raw failure observed while awaiting an external call.
#[derive(Debug, thiserror::Error)]
pub enum ExternalCallFailure<E> {
    /// The collaborator returned an error.
    #[error("external call failed: {0}")]
    Failed(#[source] E),
    /// The collaborator panicked while the call was polled.
    #[error("external call panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },
}

/// Await `operation`, translating every failure through `map_failure`.
///
/// Success values pass through untouched.
///
/// # Examples
/// ```
/// use thread_gate::domain::{guard_external_call, BackendError, ErrorKind};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let ok = guard_external_call(async { Ok::<_, std::io::Error>(7) }, |_| {
///     BackendError::delete_thread_failed()
/// })
/// .await;
/// assert_eq!(ok, Ok(7));
///
/// let failed = guard_external_call(
///     async { Err::<(), _>(std::io::Error::other("down")) },
///     |_| BackendError::delete_thread_failed(),
/// )
/// .await;
/// assert_eq!(failed.map_err(|e| e.kind()), Err(ErrorKind::DeleteThreadFailed));
/// # });
/// ```
pub async fn guard_external_call<T, E, Fut, M>(operation: Fut, map_failure: M) -> BackendResult<T>
where
    Fut: Future<Output = Result<T, E>>,
    M: FnOnce(ExternalCallFailure<E>) -> BackendError,
{
    match AssertUnwindSafe(operation).catch_unwind().await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(map_failure(ExternalCallFailure::Failed(error))),
        Err(payload) => Err(map_failure(ExternalCallFailure::Panicked {
            message: panic_message(payload.as_ref()),
        })),
    }
}

/// Mapping that reports any failure as `kind`, keeping the failure as cause.
pub fn fail_as<E>(kind: ErrorKind) -> impl FnOnce(ExternalCallFailure<E>) -> BackendError
where
    E: StdError + Send + Sync + 'static,
{
    move |failure| BackendError::from_kind(kind).with_cause(failure)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-textual panic payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq, thiserror::Error)]
    #[error("store offline")]
    struct Offline;

    #[rstest]
    #[tokio::test]
    async fn success_values_pass_through() {
        let result = guard_external_call(
            async { Ok::<_, Offline>(vec!["t1", "t2"]) },
            fail_as(ErrorKind::GetAiThreadsFailed),
        )
        .await;
        assert_eq!(result, Ok(vec!["t1", "t2"]));
    }

    #[rstest]
    #[tokio::test]
    async fn returned_errors_are_mapped_with_cause() {
        let error = guard_external_call(
            async { Err::<(), _>(Offline) },
            fail_as(ErrorKind::DeleteThreadFailed),
        )
        .await
        .expect_err("failure is mapped");

        assert_eq!(error.kind(), ErrorKind::DeleteThreadFailed);
        assert_eq!(error.message(), "Failed to delete thread");
        let cause = error.cause().expect("cause retained");
        assert_eq!(cause.to_string(), "external call failed: store offline");
    }

    #[rstest]
    #[tokio::test]
    async fn panics_are_mapped_instead_of_unwinding() {
        let error = guard_external_call(
            async {
                if true {
                    panic!("index corrupted");
                }
                Ok::<(), Offline>(())
            },
            fail_as(ErrorKind::GetAiThreadsFailed),
        )
        .await
        .expect_err("panic is mapped");

        assert_eq!(error.kind(), ErrorKind::GetAiThreadsFailed);
        let cause = error.cause().expect("cause retained");
        assert_eq!(cause.to_string(), "external call panicked: index corrupted");
    }

    #[rstest]
    #[tokio::test]
    async fn mapping_sees_the_raw_failure() {
        let error = guard_external_call(async { Err::<(), _>(Offline) }, |failure| {
            match failure {
                ExternalCallFailure::Failed(Offline) => BackendError::invalid_request("offline"),
                ExternalCallFailure::Panicked { .. } => BackendError::delete_thread_failed(),
            }
        })
        .await
        .expect_err("failure is mapped");
        assert_eq!(error.message(), "offline");
    }
}

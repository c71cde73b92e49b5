//! Identity resolution: the mandatory first gate of every thread command.
//!
//! [`IdentityResolver::resolve`] asks an [`AuthContext`] for a verified claim
//! and turns it into an [`Identity`]. Absence, expiry, a malformed subject or
//! a failing context all collapse to `NotAuthenticated`. Nothing is cached;
//! each call reads the context afresh.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::ports::AuthContext;
use crate::domain::{BackendError, BackendResult, ExternalCallFailure, guard_external_call};

/// Validation errors for identity subjects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityValidationError {
    /// The subject was missing or blank.
    #[error("identity subject must not be empty")]
    EmptySubject,
    /// The subject carried leading or trailing whitespace.
    #[error("identity subject must not contain surrounding whitespace")]
    PaddedSubject,
}

/// Verified identifier of the user behind one command invocation.
///
/// ## Invariants
/// - Non-empty.
/// - Equal to itself once trimmed; padded subjects indicate a malformed
///   claim rather than a different user.
///
/// # Examples
/// ```
/// use thread_gate::domain::Identity;
///
/// let identity = Identity::new("user_2f9").unwrap();
/// assert_eq!(identity.as_ref(), "user_2f9");
/// assert!(Identity::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    /// Validate and construct an identity from a claim subject.
    pub fn new(subject: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let subject = subject.into();
        if subject.trim().is_empty() {
            return Err(IdentityValidationError::EmptySubject);
        }
        if subject.trim() != subject {
            return Err(IdentityValidationError::PaddedSubject);
        }
        Ok(Self(subject))
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Identity> for String {
    fn from(value: Identity) -> Self {
        value.0
    }
}

/// Claim set yielded by an authentication context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    /// Subject identifying the user.
    pub subject: String,
    /// Issuer of the claim, when the provider reports one.
    pub issuer: Option<String>,
    /// Instant after which the claim is no longer valid.
    pub expires_at: Option<DateTime<Utc>>,
}

impl IdentityClaims {
    /// Claims with only a subject.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            issuer: None,
            expires_at: None,
        }
    }

    /// Record the issuing provider.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Record the expiry instant.
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

/// Resolves verified identities from authentication contexts.
#[derive(Clone)]
pub struct IdentityResolver {
    clock: Arc<dyn Clock>,
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityResolver").finish_non_exhaustive()
    }
}

impl IdentityResolver {
    /// Create a resolver that checks expiry against `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Resolve the identity behind `context`.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` when the context yields no claim, the
    /// claim has expired, the subject is malformed, or the context itself
    /// fails.
    pub async fn resolve(&self, context: &dyn AuthContext) -> BackendResult<Identity> {
        let claims = guard_external_call(context.identity_claims(), |failure| {
            if let ExternalCallFailure::Panicked { message } = &failure {
                warn!(%message, "authentication context panicked");
            } else {
                warn!(error = %failure, "authentication context query failed");
            }
            BackendError::not_authenticated().with_cause(failure)
        })
        .await?;

        let Some(claims) = claims else {
            debug!("authentication context carried no identity claim");
            return Err(BackendError::not_authenticated());
        };

        if let Some(expires_at) = claims.expires_at {
            let now = self.clock.utc();
            if expires_at <= now {
                debug!(%expires_at, "identity claim has expired");
                return Err(BackendError::not_authenticated()
                    .with_details(json!({ "reason": "expired" })));
            }
        }

        Identity::new(claims.subject).map_err(|error| {
            warn!(%error, "identity claim subject is malformed");
            BackendError::not_authenticated().with_cause(error)
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for identity resolution.
    use super::*;
    use crate::domain::ErrorKind;
    use crate::domain::ports::{AuthContextError, MockAuthContext};
    use chrono::{Local, TimeZone};
    use rstest::{fixture, rstest};

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0)
            .single()
            .expect("valid fixture instant")
    }

    #[fixture]
    fn resolver() -> IdentityResolver {
        IdentityResolver::new(Arc::new(FixedClock(noon())))
    }

    fn context_returning(
        result: Result<Option<IdentityClaims>, AuthContextError>,
    ) -> MockAuthContext {
        let mut context = MockAuthContext::new();
        context
            .expect_identity_claims()
            .times(1)
            .return_once(move || result);
        context
    }

    #[rstest]
    #[tokio::test]
    async fn resolves_subject_of_verified_claim(resolver: IdentityResolver) {
        let context = context_returning(Ok(Some(IdentityClaims::new("user_1"))));
        let identity = resolver.resolve(&context).await.expect("identity");
        assert_eq!(identity.as_ref(), "user_1");
    }

    #[rstest]
    #[tokio::test]
    async fn missing_claim_is_not_authenticated(resolver: IdentityResolver) {
        let context = context_returning(Ok(None));
        let error = resolver.resolve(&context).await.expect_err("no identity");
        assert_eq!(error.kind(), ErrorKind::NotAuthenticated);
        assert_eq!(error.message(), "User not authenticated");
    }

    #[rstest]
    #[tokio::test]
    async fn context_failure_is_not_authenticated(resolver: IdentityResolver) {
        let context = context_returning(Err(AuthContextError::unavailable("token service down")));
        let error = resolver.resolve(&context).await.expect_err("no identity");
        assert_eq!(error.kind(), ErrorKind::NotAuthenticated);
        assert!(error.cause().is_some());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case(" user_1")]
    #[tokio::test]
    async fn malformed_subject_is_not_authenticated(
        resolver: IdentityResolver,
        #[case] subject: &str,
    ) {
        let context = context_returning(Ok(Some(IdentityClaims::new(subject))));
        let error = resolver.resolve(&context).await.expect_err("malformed");
        assert_eq!(error.kind(), ErrorKind::NotAuthenticated);
    }

    #[rstest]
    #[case(chrono::Duration::seconds(-1), false)]
    #[case(chrono::Duration::zero(), false)]
    #[case(chrono::Duration::minutes(5), true)]
    #[tokio::test]
    async fn expiry_is_checked_against_the_clock(
        resolver: IdentityResolver,
        #[case] offset: chrono::Duration,
        #[case] accepted: bool,
    ) {
        let claims = IdentityClaims::new("user_1")
            .with_issuer("https://id.example.test")
            .with_expiry(noon() + offset);
        let context = context_returning(Ok(Some(claims)));
        let result = resolver.resolve(&context).await;
        assert_eq!(result.is_ok(), accepted);
    }
}

//! Driven port for the ambient authentication context.
//!
//! The hosting environment supplies one context per command invocation. The
//! context only reports what it holds; verification of expiry and subject
//! shape happens in [`crate::domain::IdentityResolver`].

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::IdentityClaims;

define_port_error! {
    /// Failures raised while querying an authentication context.
    pub enum AuthContextError {
        /// The context could not be read (transport or storage failure).
        Unavailable { message: String } => "authentication context unavailable: {message}",
        /// The context held a claim that could not be decoded.
        InvalidClaim { message: String } => "invalid identity claim: {message}",
    }
}

/// Per-invocation source of identity claims.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthContext: Send + Sync {
    /// Return the verified claim set, or `None` when the request is anonymous.
    async fn identity_claims(&self) -> Result<Option<IdentityClaims>, AuthContextError>;
}

/// Authentication context with a fixed answer.
///
/// Useful for embedding the command layer where identity was established
/// out of band, and for tests.
///
/// # Examples
/// ```
/// use thread_gate::domain::ports::{AuthContext, FixtureAuthContext};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let context = FixtureAuthContext::authenticated("user_1");
/// let claims = context.identity_claims().await.unwrap().unwrap();
/// assert_eq!(claims.subject, "user_1");
/// assert!(FixtureAuthContext::anonymous().identity_claims().await.unwrap().is_none());
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixtureAuthContext {
    claims: Option<IdentityClaims>,
}

impl FixtureAuthContext {
    /// Context carrying `claims`.
    pub fn with_claims(claims: IdentityClaims) -> Self {
        Self {
            claims: Some(claims),
        }
    }

    /// Context carrying a bare subject claim.
    pub fn authenticated(subject: impl Into<String>) -> Self {
        Self::with_claims(IdentityClaims::new(subject))
    }

    /// Context with no identity.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthContext for FixtureAuthContext {
    async fn identity_claims(&self) -> Result<Option<IdentityClaims>, AuthContextError> {
        Ok(self.claims.clone())
    }
}

//! Session-backed authentication context.
//!
//! The cookie session is read once when the extractor runs. Handlers receive
//! an owned snapshot that implements [`AuthContext`], so the domain never
//! touches the framework session type.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::future::LocalBoxFuture;

use crate::domain::IdentityClaims;
use crate::domain::ports::{AuthContext, AuthContextError};

pub(crate) const SUBJECT_KEY: &str = "subject";
pub(crate) const ISSUER_KEY: &str = "issuer";
pub(crate) const EXPIRES_AT_KEY: &str = "expires_at";

/// Identity claims captured from the request's session cookie.
#[derive(Debug, Clone)]
pub struct SessionAuthContext {
    claims: Result<Option<IdentityClaims>, AuthContextError>,
}

impl SessionAuthContext {
    /// Snapshot the claims held by `session`.
    pub fn from_session(session: &Session) -> Self {
        Self {
            claims: read_claims(session),
        }
    }
}

fn read_claims(session: &Session) -> Result<Option<IdentityClaims>, AuthContextError> {
    let subject = session
        .get::<String>(SUBJECT_KEY)
        .map_err(|error| AuthContextError::invalid_claim(error.to_string()))?;
    let Some(subject) = subject else {
        return Ok(None);
    };
    let issuer = session
        .get::<String>(ISSUER_KEY)
        .map_err(|error| AuthContextError::invalid_claim(error.to_string()))?;
    let expires_at = session
        .get::<DateTime<Utc>>(EXPIRES_AT_KEY)
        .map_err(|error| AuthContextError::invalid_claim(error.to_string()))?;

    Ok(Some(IdentityClaims {
        subject,
        issuer,
        expires_at,
    }))
}

/// Persist `claims` in the session cookie.
///
/// Used by whichever sign-in flow fronts this service. Absent optional
/// claims are removed so a previous session's values do not linger.
///
/// # Errors
///
/// Returns [`AuthContextError::Unavailable`] when the session rejects a
/// value.
pub fn store_identity_claims(
    session: &Session,
    claims: &IdentityClaims,
) -> Result<(), AuthContextError> {
    let unavailable = |error: actix_session::SessionInsertError| {
        AuthContextError::unavailable(format!("failed to persist session: {error}"))
    };

    session.renew();
    session
        .insert(SUBJECT_KEY, &claims.subject)
        .map_err(unavailable)?;
    match &claims.issuer {
        Some(issuer) => session.insert(ISSUER_KEY, issuer).map_err(unavailable)?,
        None => {
            session.remove(ISSUER_KEY);
        }
    }
    match claims.expires_at {
        Some(expires_at) => session
            .insert(EXPIRES_AT_KEY, expires_at)
            .map_err(unavailable)?,
        None => {
            session.remove(EXPIRES_AT_KEY);
        }
    }
    Ok(())
}

#[async_trait]
impl AuthContext for SessionAuthContext {
    async fn identity_claims(&self) -> Result<Option<IdentityClaims>, AuthContextError> {
        self.claims.clone()
    }
}

impl FromRequest for SessionAuthContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(|session| Self::from_session(&session)) })
    }
}

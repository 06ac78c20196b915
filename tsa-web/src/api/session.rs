//! Session cookie handling
//!
//! The session is a signed `tsa_session` cookie (see
//! [`tsa_common::session`]). Handlers that need an annotator take an
//! [`Annotator`] argument; requests without a valid cookie are answered
//! with the login prompt.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;
use tsa_common::session;

use crate::error::AppError;
use crate::AppState;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "tsa_session";

/// The logged-in annotator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotator(pub String);

impl Annotator {
    pub fn name(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Annotator {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or(AppError::Unauthenticated)?;

        match session::verify(token, state.session_secret) {
            Some(name) => Ok(Annotator(name)),
            None => {
                debug!("Rejected session cookie with bad signature");
                Err(AppError::Unauthenticated)
            }
        }
    }
}

/// Value of the session cookie among all `Cookie` headers
fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

/// `Set-Cookie` value establishing a session for `name`
pub fn session_cookie(name: &str, secret: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE,
        session::sign(name, secret)
    )
}

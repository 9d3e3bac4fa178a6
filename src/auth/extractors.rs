use crate::auth::callbacks::{self, CallbackError};
use crate::auth::helpers::{append_cookie, build_clear_cookie, extract_cookie};
use crate::auth::session::{Session, SESSION_COOKIE};
use crate::config::Config;
use crate::AppState;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Session lookup failure that cannot be treated as "not signed in"
#[derive(Debug)]
pub enum AuthError {
    Internal(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error",
                    "message": msg
                })),
            )
                .into_response(),
        }
    }
}

/// Whether the request carries a non-empty session cookie
pub fn has_session_cookie(headers: &HeaderMap) -> bool {
    extract_cookie(headers, SESSION_COOKIE).is_some_and(|t| !t.is_empty())
}

/// Resolve the session for a request: verify the cookie token, then run the
/// session callback to attach the stored user id.
///
/// A missing, invalid, or expired token is "not signed in", and so is a token
/// whose email has no user record. Only store failures are errors.
pub async fn resolve_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<Session>, AuthError> {
    let Some(token) = extract_cookie(headers, SESSION_COOKIE).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    let claims = match state.session_keys.verify(&token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring invalid session token");
            return Ok(None);
        }
    };

    match callbacks::session(state.store.as_ref(), claims.into_session()).await {
        Ok(session) => Ok(Some(session)),
        Err(CallbackError::UserNotFound) => {
            tracing::warn!(
                event = "session_user_missing",
                "Session token refers to an email with no user record, treating as signed out"
            );
            Ok(None)
        }
        Err(err @ CallbackError::Store(_)) => {
            tracing::error!(error = %err, "Session callback failed");
            Err(AuthError::Internal("Failed to load session user".to_string()))
        }
    }
}

/// Append a clearing `session_token` cookie when the request sent one that did
/// not resolve to a session.
pub fn clear_stale_session(
    config: &Config,
    headers: &HeaderMap,
    session: Option<&Session>,
    response: &mut Response,
) {
    if session.is_none() && has_session_cookie(headers) {
        append_cookie(response, &build_clear_cookie(config, SESSION_COOKIE, "/"));
    }
}

/// Optional session extractor - `None` when not signed in
///
/// Usage:
/// ```rust,ignore
/// async fn handler(MaybeSession(session): MaybeSession) {
///     if let Some(session) = session {
///         println!("User id: {:?}", session.user.id);
///     }
/// }
/// ```
pub struct MaybeSession(pub Option<Session>);

impl FromRequestParts<Arc<AppState>> for MaybeSession {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        resolve_session(state, &parts.headers).await.map(MaybeSession)
    }
}

//! Authentication handlers for sign-in, callback, sign-out, and session reads
//!
//! - `signin_handler`: Initiates the Google authorization code flow
//! - `callback_handler`: Validates state, exchanges the code, runs the sign-in callback
//! - `signout_handler`: Clears the session cookie
//! - `session_handler`: Returns the enriched session as JSON

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use super::callbacks;
use super::extractors::{clear_stale_session, MaybeSession};
use super::helpers::{append_cookie, build_clear_cookie, build_cookie, extract_cookie, header_value};
use super::session::SESSION_COOKIE;
use crate::web::toast::Toast;
use crate::AppState;

/// CSRF state cookie, scoped to the auth routes
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";
const OAUTH_STATE_PATH: &str = "/api/auth";
const OAUTH_STATE_MAX_AGE_SECS: u64 = 600;

#[derive(Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Redirect home with an error toast
fn sign_in_failed(state: &AppState) -> Response {
    let mut response = Redirect::to("/").into_response();
    append_cookie(
        &mut response,
        &Toast::error("Sign in failed, please try again").set_cookie(&state.config),
    );
    append_cookie(
        &mut response,
        &build_clear_cookie(&state.config, OAUTH_STATE_COOKIE, OAUTH_STATE_PATH),
    );
    response
}

// =============================================================================
// Handlers
// =============================================================================

/// Sign-in handler - redirects to Google with a CSRF state cookie
pub async fn signin_handler(State(state): State<Arc<AppState>>) -> Result<Response, Response> {
    tracing::info!(event = "sign_in_start", "Sign in requested");

    let (auth_url, csrf_token) = state.provider.authorize_url();

    let csrf_cookie = build_cookie(
        &state.config,
        OAUTH_STATE_COOKIE,
        csrf_token.secret(),
        OAUTH_STATE_PATH,
        OAUTH_STATE_MAX_AGE_SECS,
    );

    let mut response = Redirect::to(&auth_url).into_response();
    response.headers_mut().insert(
        axum::http::header::SET_COOKIE,
        header_value(&csrf_cookie).map_err(|e| *e)?,
    );

    Ok(response)
}

/// Callback handler - validates state, exchanges the code, upserts the user
pub async fn callback_handler(
    Query(params): Query<CallbackParams>,
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
) -> Response {
    tracing::info!(event = "sign_in_callback", "OAuth callback received");

    if let Some(error) = params.error {
        tracing::warn!(
            error = %error,
            description = ?params.error_description,
            "OAuth authorization failed"
        );
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "error": error,
                "error_description": params.error_description
            })),
        )
            .into_response();
    }

    // CSRF Protection: Validate state parameter matches stored cookie
    let Some(state_from_callback) = params.state else {
        tracing::warn!("CSRF validation failed: No state parameter in callback");
        return json_error(StatusCode::BAD_REQUEST, "Missing state parameter");
    };

    let Some(stored_state) = extract_cookie(&headers, OAUTH_STATE_COOKIE) else {
        tracing::warn!(
            has_cookie_header = headers.get("cookie").is_some(),
            "CSRF validation failed: No oauth_state cookie found"
        );
        return json_error(
            StatusCode::UNAUTHORIZED,
            "CSRF validation failed: missing state cookie",
        );
    };

    if state_from_callback != stored_state {
        tracing::warn!("CSRF validation failed: State mismatch (callback vs cookie)");
        return json_error(
            StatusCode::UNAUTHORIZED,
            "CSRF validation failed: state mismatch",
        );
    }

    let Some(code) = params.code else {
        tracing::warn!("No authorization code received");
        return json_error(StatusCode::BAD_REQUEST, "Missing authorization code");
    };

    tracing::debug!(code_length = code.len(), "Authorization code received");

    let profile = match state.provider.fetch_profile(&state.http_client, code).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "Failed to obtain provider profile");
            return sign_in_failed(&state);
        }
    };

    if let Err(e) = callbacks::sign_in(state.store.as_ref(), &profile).await {
        tracing::error!(error = %e, "Sign in callback failed");
        return sign_in_failed(&state);
    }

    let token = match state.session_keys.issue(&profile) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "Failed to issue session token");
            return sign_in_failed(&state);
        }
    };

    let session_cookie = build_cookie(
        &state.config,
        SESSION_COOKIE,
        &token,
        "/",
        state.session_keys.max_age_secs(),
    );

    let mut response = Redirect::to("/").into_response();
    let session_header = match header_value(&session_cookie) {
        Ok(h) => h,
        Err(e) => return *e,
    };
    response
        .headers_mut()
        .insert(axum::http::header::SET_COOKIE, session_header);

    // Clear the oauth_state cookie after successful authentication
    append_cookie(
        &mut response,
        &build_clear_cookie(&state.config, OAUTH_STATE_COOKIE, OAUTH_STATE_PATH),
    );
    append_cookie(&mut response, &Toast::success("Signed in").set_cookie(&state.config));

    tracing::info!(event = "sign_in_complete", "Authentication successful, redirecting home");
    response
}

/// Sign-out handler - clears the session cookie and returns home
pub async fn signout_handler(State(state): State<Arc<AppState>>) -> Response {
    let mut response = Redirect::to("/").into_response();
    append_cookie(
        &mut response,
        &build_clear_cookie(&state.config, SESSION_COOKIE, "/"),
    );
    append_cookie(
        &mut response,
        &build_clear_cookie(&state.config, OAUTH_STATE_COOKIE, OAUTH_STATE_PATH),
    );
    append_cookie(&mut response, &Toast::info("Signed out").set_cookie(&state.config));

    tracing::info!(event = "sign_out", "Cleared session cookie");
    response
}

/// Session endpoint - the enriched session, or `{}` when not signed in
pub async fn session_handler(
    State(state): State<Arc<AppState>>,
    MaybeSession(session): MaybeSession,
    headers: axum::http::HeaderMap,
) -> Response {
    let mut response = match &session {
        Some(session) => Json(session).into_response(),
        None => Json(serde_json::json!({})).into_response(),
    };
    clear_stale_session(&state.config, &headers, session.as_ref(), &mut response);
    response
}

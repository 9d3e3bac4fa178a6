use super::layout::{render_page, ShellContext};
use super::templates::{HomeTemplate, NotFoundTemplate, ProfileTemplate};
use crate::auth::extractors::{clear_stale_session, MaybeSession};
use crate::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;

/// Liveness probe - always returns OK if the process is running
pub async fn healthz_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe - 200 when the user store answers a ping, 503 otherwise
pub async fn readyz_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "ready"),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed: user store unreachable");
            (StatusCode::SERVICE_UNAVAILABLE, "not ready: user store unreachable")
        }
    }
}

pub async fn home_handler(
    State(state): State<Arc<AppState>>,
    MaybeSession(session): MaybeSession,
    headers: HeaderMap,
) -> Response {
    let template = HomeTemplate {
        shell: ShellContext::new(session, &headers),
    };
    render_page(&state.config, &template.shell, StatusCode::OK, &template)
}

pub async fn profile_handler(
    State(state): State<Arc<AppState>>,
    MaybeSession(session): MaybeSession,
    headers: HeaderMap,
) -> Response {
    let Some(session) = session else {
        let mut response = Redirect::to("/api/auth/signin/google").into_response();
        clear_stale_session(&state.config, &headers, None, &mut response);
        return response;
    };

    let user = match state.store.find_by_email(&session.user.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!("Profile user disappeared between session read and lookup");
            let mut response = Redirect::to("/api/auth/signin/google").into_response();
            clear_stale_session(&state.config, &headers, None, &mut response);
            return response;
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load profile user");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load profile").into_response();
        }
    };

    tracing::debug!(user_id = %user.id, "Rendering profile");

    let template = ProfileTemplate {
        user_id: user.id,
        username: user.username,
        email: user.email,
        image: user.image.or_else(|| session.user.image.clone()),
        shell: ShellContext::new(Some(session), &headers),
    };
    render_page(&state.config, &template.shell, StatusCode::OK, &template)
}

pub async fn not_found_handler(
    State(state): State<Arc<AppState>>,
    MaybeSession(session): MaybeSession,
    headers: HeaderMap,
) -> Response {
    let template = NotFoundTemplate {
        shell: ShellContext::new(session, &headers),
    };
    render_page(&state.config, &template.shell, StatusCode::NOT_FOUND, &template)
}

use super::handlers::{
    healthz_handler, home_handler, not_found_handler, profile_handler, readyz_handler,
};
use crate::{
    auth::{callback_handler, session_handler, signin_handler, signout_handler},
    AppState,
};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::services::ServeDir;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/profile", get(profile_handler))
        .route("/healthz", get(healthz_handler))
        .route("/readyz", get(readyz_handler))
        .route("/api/auth/signin/google", get(signin_handler))
        .route("/api/auth/callback/google", get(callback_handler))
        // POST from the navbar sign-out form, GET for plain links
        .route("/api/auth/signout", get(signout_handler).post(signout_handler))
        .route("/api/auth/session", get(session_handler))
        .nest_service("/static", ServeDir::new("static"))
        .fallback(not_found_handler)
        .with_state(state)
}

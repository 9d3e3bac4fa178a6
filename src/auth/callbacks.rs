//! Sign-in and session callbacks
//!
//! `sign_in` runs once per successful provider authentication and creates the
//! local user record on first sign-in. `session` runs on every session read
//! and attaches the internal user id.

use super::provider::GoogleProfile;
use super::session::Session;
use crate::db::{NewUser, UserStore};

/// Usernames are truncated to this many characters
pub const MAX_USERNAME_CHARS: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum CallbackError {
    #[error("user store error: {0:#}")]
    Store(#[from] anyhow::Error),

    #[error("no user record for session email")]
    UserNotFound,
}

/// Truncate a display name to `MAX_USERNAME_CHARS` characters.
pub fn truncate_username(name: &str) -> String {
    name.chars().take(MAX_USERNAME_CHARS).collect()
}

/// Upsert-on-sign-in. Always allows the sign-in once the provider has
/// authenticated the user; store failures are returned as errors.
pub async fn sign_in(store: &dyn UserStore, profile: &GoogleProfile) -> Result<bool, CallbackError> {
    if store.find_by_email(&profile.email).await?.is_some() {
        tracing::info!(event = "sign_in_existing_user", "Existing user signed in");
        return Ok(true);
    }

    // Fall back to the email's local part when the provider sends no name
    let display_name = profile
        .name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| profile.email.split('@').next().unwrap_or_default());

    let user = store
        .create(NewUser {
            email: profile.email.clone(),
            username: truncate_username(display_name),
            image: profile.picture.clone(),
        })
        .await?;

    tracing::info!(
        event = "sign_in_user_created",
        user_id = %user.id,
        "Created user on first sign-in"
    );

    Ok(true)
}

/// Attach the stored user id to the session
pub async fn session(store: &dyn UserStore, mut session: Session) -> Result<Session, CallbackError> {
    let user = store
        .find_by_email(&session.user.email)
        .await?
        .ok_or(CallbackError::UserNotFound)?;

    session.user.id = Some(user.id);
    Ok(session)
}

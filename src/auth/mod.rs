//! Authentication module
//!
//! Google sign-in backed by the user store.
//!
//! ## Structure
//!
//! - `provider`: Google OAuth2 client and userinfo fetch
//! - `callbacks`: sign-in upsert and session enrichment
//! - `session`: signed session token and session payload
//! - `extractors`: Axum extractors for the current session
//! - `helpers`: Pure helper functions (cookies, headers, HTTP client)
//! - `handlers`: HTTP handlers for the sign-in, callback, sign-out, and session routes
//!
//! ## Authentication Flow
//!
//! 1. User visits `/api/auth/signin/google` → redirect to Google
//! 2. Google authenticates → redirect to `/api/auth/callback/google`
//! 3. Server exchanges the code, fetches the profile, creates the user if new,
//!    sets the session cookie → redirect to `/`
//! 4. Every session read verifies the cookie and attaches the stored user id

pub mod callbacks;
pub mod extractors;
pub mod handlers;
pub mod helpers;
pub mod provider;
pub mod session;

pub use handlers::{
    callback_handler, session_handler, signin_handler, signout_handler, CallbackParams,
};
pub use session::{Session, SessionKeys, SessionUser};

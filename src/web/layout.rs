//! Page shell shared by every rendered page
//!
//! The shell nests the navigation bar, the page's content block, the footer,
//! and the toast host inside `templates/base.html`. Each page template owns a
//! `ShellContext` so the layout can read the auth context and pending toast.

use askama::Template;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use chrono::{Datelike, Utc};

use super::toast::Toast;
use crate::auth::extractors::has_session_cookie;
use crate::auth::helpers::{append_cookie, build_clear_cookie};
use crate::auth::session::SESSION_COOKIE;
use crate::auth::Session;
use crate::config::Config;

/// Document metadata rendered into `<head>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub title: &'static str,
    pub description: &'static str,
    pub keywords: &'static str,
}

pub const SITE_META: PageMeta = PageMeta {
    title: "PropertyPulse | Find the Perfect Rental",
    description: "PropertyPulse is an app that helps you find the perfect rental. Find your next property with ease, and discover the best deals on the market.",
    keywords: "rental, find rentals, find properties",
};

/// Everything the layout needs besides the page content
#[derive(Debug, Clone)]
pub struct ShellContext {
    pub meta: PageMeta,
    /// Auth context: the enriched session, if signed in
    pub session: Option<Session>,
    /// Pending notification for the toast host
    pub toast: Option<Toast>,
    /// The request sent a session cookie that resolved to no session
    pub stale_session: bool,
    pub year: i32,
}

impl ShellContext {
    pub fn new(session: Option<Session>, headers: &HeaderMap) -> Self {
        Self {
            meta: SITE_META,
            stale_session: session.is_none() && has_session_cookie(headers),
            session,
            toast: Toast::from_headers(headers),
            year: Utc::now().year(),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }
}

/// Render a page template, consume its pending toast, and drop a stale
/// session cookie.
pub fn render_page<T: Template>(
    config: &Config,
    shell: &ShellContext,
    status: StatusCode,
    template: &T,
) -> Response {
    match template.render() {
        Ok(html) => {
            let mut response = (status, Html(html)).into_response();
            if shell.toast.is_some() {
                append_cookie(&mut response, &Toast::clear_cookie(config));
            }
            if shell.stale_session {
                append_cookie(
                    &mut response,
                    &build_clear_cookie(config, SESSION_COOKIE, "/"),
                );
            }
            response
        }
        Err(e) => {
            tracing::error!(error = %e, "Template render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

//! Pure helper functions for authentication
//!
//! Cookie building and extraction, header conversion, and the outbound HTTP
//! client used for the provider exchange.

use axum::{
    http::{header::InvalidHeaderValue, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::time::Duration;

use crate::config::Config;

// =============================================================================
// HTTP Client Builders
// =============================================================================

/// Create a reqwest client for OAuth2 HTTP requests using config timeouts
pub fn create_http_client(
    connect_timeout_secs: u64,
    request_timeout_secs: u64,
) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none()) // Security: prevent SSRF
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .timeout(Duration::from_secs(request_timeout_secs))
        .build()
}

// =============================================================================
// Cookie Builders
// =============================================================================

/// Build an HttpOnly cookie with the site's domain and secure attributes
pub fn build_cookie(config: &Config, name: &str, value: &str, path: &str, max_age: u64) -> String {
    format!(
        "{}={}; HttpOnly; Path={}; Max-Age={}; SameSite=Lax{}{}",
        name,
        value,
        path,
        max_age,
        config.cookie_domain_attr(),
        config.cookie_secure_flag()
    )
}

/// Build a cookie that removes `name` (attributes must match creation)
pub fn build_clear_cookie(config: &Config, name: &str, path: &str) -> String {
    build_cookie(config, name, "", path, 0)
}

/// Create a HeaderValue from a string, returning an error response if invalid.
/// This prevents panics from malformed cookie values.
pub fn header_value(s: &str) -> Result<HeaderValue, Box<Response>> {
    HeaderValue::from_str(s).map_err(|e: InvalidHeaderValue| {
        tracing::error!(
            error = %e,
            value_len = s.len(),
            "Failed to create header value - possible malformed token"
        );
        Box::new(
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Internal error setting response headers"})),
            )
                .into_response(),
        )
    })
}

/// Append a Set-Cookie header, skipping values that are not valid headers
pub fn append_cookie(response: &mut Response, cookie: &str) {
    if let Ok(h) = header_value(cookie) {
        response
            .headers_mut()
            .append(axum::http::header::SET_COOKIE, h);
    }
}

// =============================================================================
// Cookie Extraction
// =============================================================================

/// Extract a cookie value from headers
///
/// Handles multiple Cookie headers (some proxies fold/duplicate headers).
/// Uses `get_all` to collect all Cookie header values.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);

    for header_value in headers.get_all("cookie") {
        if let Ok(cookie_str) = header_value.to_str() {
            if let Some(value) = cookie_str
                .split(';')
                .map(|c| c.trim())
                .find(|c| c.starts_with(&prefix))
                .and_then(|c| c.strip_prefix(&prefix))
            {
                return Some(value.to_string());
            }
        }
    }
    None
}

// =============================================================================
// Tests
// =============================================================================

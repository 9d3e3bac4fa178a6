//! Toast notifications carried across a redirect in the `flash` cookie.
//!
//! A handler sets the cookie before redirecting; the next rendered page shows
//! the toast in the layout's notification host and clears the cookie.

use axum::http::HeaderMap;
use serde::Serialize;

use crate::auth::helpers::{build_clear_cookie, build_cookie, extract_cookie};
use crate::config::Config;

pub const TOAST_COOKIE: &str = "flash";

const TOAST_MAX_AGE_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(ToastKind::Success),
            "error" => Some(ToastKind::Error),
            "info" => Some(ToastKind::Info),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Info,
            message: message.into(),
        }
    }

    /// Cookie value: `<kind>:<url-encoded message>`
    fn encode(&self) -> String {
        format!("{}:{}", self.kind.as_str(), urlencoding::encode(&self.message))
    }

    fn decode(value: &str) -> Option<Self> {
        let (kind, message) = value.split_once(':')?;
        let kind = ToastKind::parse(kind)?;
        let message = urlencoding::decode(message).ok()?.into_owned();
        if message.is_empty() {
            return None;
        }
        Some(Self { kind, message })
    }

    pub fn set_cookie(&self, config: &Config) -> String {
        build_cookie(config, TOAST_COOKIE, &self.encode(), "/", TOAST_MAX_AGE_SECS)
    }

    pub fn clear_cookie(config: &Config) -> String {
        build_clear_cookie(config, TOAST_COOKIE, "/")
    }

    /// Pending toast from the request, if any. Malformed values are ignored.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        extract_cookie(headers, TOAST_COOKIE)
            .filter(|v| !v.is_empty())
            .and_then(|v| Self::decode(&v))
    }
}

//! PropertyPulse web service library
//!
//! Server-rendered page shell and Google sign-in for the rental listing site.

#![deny(dead_code)]

pub mod auth;
pub mod config;
pub mod db;
pub mod web;

use anyhow::Context;
use auth::{helpers::create_http_client, provider::GoogleProvider, SessionKeys};
use config::Config;
use db::UserStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn UserStore>,
    pub session_keys: Arc<SessionKeys>,
    pub provider: Arc<GoogleProvider>,
    /// Outbound client for the provider token exchange and userinfo
    pub http_client: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn UserStore>) -> anyhow::Result<Self> {
        let provider = GoogleProvider::new(&config).context("Failed to configure Google provider")?;
        let session_keys = SessionKeys::new(config.auth_secret.as_bytes(), config.session_max_age_secs);
        let http_client = create_http_client(
            config.http_connect_timeout_secs,
            config.http_request_timeout_secs,
        )
        .context("Failed to build HTTP client")?;

        Ok(Self {
            config: Arc::new(config),
            store,
            session_keys: Arc::new(session_keys),
            provider: Arc::new(provider),
            http_client,
        })
    }
}

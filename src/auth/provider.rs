//! Google identity provider
//!
//! Builds the OAuth2 client used for the authorization code flow and fetches
//! the OpenID Connect userinfo profile once a code has been exchanged.

use anyhow::{Context, Result};
use oauth2::{
    basic::BasicClient, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken,
    EndpointNotSet, EndpointSet, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Client with auth and token endpoints configured
type GoogleOAuthClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Profile returned by the provider after authentication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoogleProfile {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Google OAuth2 provider configured from `Config`
pub struct GoogleProvider {
    client: GoogleOAuthClient,
    userinfo_url: String,
}

impl GoogleProvider {
    pub fn new(config: &Config) -> Result<Self> {
        let auth_url = AuthUrl::new(GOOGLE_AUTH_URL.to_string()).context("Invalid auth URL")?;
        let token_url =
            TokenUrl::new(config.google_token_url.clone()).context("Invalid token URL")?;
        let redirect_url =
            RedirectUrl::new(config.redirect_uri.clone()).context("Invalid redirect URL")?;

        let client = BasicClient::new(ClientId::new(config.google_client_id.clone()))
            .set_client_secret(ClientSecret::new(config.google_client_secret.clone()))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url)
            .set_redirect_uri(redirect_url);

        Ok(Self {
            client,
            userinfo_url: config.google_userinfo_url.clone(),
        })
    }

    /// Authorization URL and the CSRF state to store in a cookie.
    ///
    /// Requests consent on every sign-in with offline access and the code
    /// response type.
    pub fn authorize_url(&self) -> (String, CsrfToken) {
        let (url, csrf_token) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("openid".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .add_extra_param("prompt", "consent")
            .add_extra_param("access_type", "offline")
            .url();

        (url.to_string(), csrf_token)
    }

    /// Exchange an authorization code and fetch the user's profile
    pub async fn fetch_profile(
        &self,
        http_client: &reqwest::Client,
        code: String,
    ) -> Result<GoogleProfile> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .request_async(http_client)
            .await
            .context("Failed to exchange code for tokens")?;

        tracing::debug!("Access token obtained, fetching userinfo");

        let profile = http_client
            .get(&self.userinfo_url)
            .bearer_auth(token.access_token().secret())
            .send()
            .await
            .context("Failed to fetch userinfo")?
            .error_for_status()
            .context("Userinfo request rejected")?
            .json::<GoogleProfile>()
            .await
            .context("Failed to parse userinfo")?;

        Ok(profile)
    }
}

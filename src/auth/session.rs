use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::provider::GoogleProfile;

/// Name of the cookie carrying the signed session token
pub const SESSION_COOKIE: &str = "session_token";

/// User portion of the session payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    /// Internal user id, attached by the session callback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
}

/// Per-request authenticated-user context
///
/// Serializes to the same shape the `/api/auth/session` endpoint returns:
/// `{"user": {...}, "expires": "<RFC 3339>"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub user: SessionUser,
    pub expires: DateTime<Utc>,
}

impl Session {
    /// Name shown in the navigation bar
    pub fn display_name(&self) -> &str {
        self.user.name.as_deref().unwrap_or(&self.user.email)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Email of the signed-in user
    pub sub: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn into_session(self) -> Session {
        Session {
            user: SessionUser {
                id: None,
                name: self.name,
                email: self.sub,
                image: self.picture,
            },
            expires: DateTime::from_timestamp(self.exp, 0).unwrap_or_default(),
        }
    }
}

/// Issues and verifies HS256 session tokens
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    max_age: Duration,
}

impl SessionKeys {
    pub fn new(secret: &[u8], max_age_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            max_age: Duration::from_secs(max_age_secs),
        }
    }

    pub fn max_age_secs(&self) -> u64 {
        self.max_age.as_secs()
    }

    /// Sign a session token for a freshly authenticated profile
    pub fn issue(&self, profile: &GoogleProfile) -> Result<String> {
        self.issue_at(profile, Utc::now())
    }

    fn issue_at(&self, profile: &GoogleProfile, now: DateTime<Utc>) -> Result<String> {
        let iat = now.timestamp();
        let exp = i64::try_from(self.max_age.as_secs())
            .ok()
            .and_then(|max_age| iat.checked_add(max_age))
            .context("Session lifetime overflows token expiry")?;
        let claims = SessionClaims {
            sub: profile.email.clone(),
            name: profile.name.clone(),
            picture: profile.picture.clone(),
            iat,
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .context("Failed to sign session token")
    }

    /// Verify signature and expiry
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        let data = decode::<SessionClaims>(token, &self.decoding, &validation)
            .context("Session token validation failed")?;
        Ok(data.claims)
    }
}

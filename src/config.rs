use std::env;

use crate::auth::provider::{GOOGLE_TOKEN_URL, GOOGLE_USERINFO_URL};

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

/// Minimum length of `AUTH_SECRET` in bytes (HS256 key).
pub const MIN_AUTH_SECRET_LEN: usize = 32;

/// Connection string that selects the in-process user store.
pub const MEMORY_STORE_URI: &str = "memory://";

/// Longest accepted session lifetime (100 years), well inside a JWT `exp` claim.
pub const MAX_SESSION_MAX_AGE_SECS: u64 = 100 * 365 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    // Environment configuration
    pub environment: Environment,

    // Server configuration
    pub server_host: String,
    pub server_port: u16,

    // Public base URL of the site (sign-in redirects land here)
    pub public_url: String,

    // Google OAuth configuration
    pub google_client_id: String,
    pub google_client_secret: String,
    pub redirect_uri: String,
    pub google_token_url: String,
    pub google_userinfo_url: String,

    // Session token signing secret and lifetime
    pub auth_secret: String,
    pub session_max_age_secs: u64,

    // Document database
    pub mongodb_uri: String,
    pub mongodb_database: String,

    // Cookie configuration (None = host-only cookie, Some = domain cookie)
    pub cookie_domain: Option<String>,

    // HTTP client timeout configuration (in seconds)
    pub http_connect_timeout_secs: u64,
    pub http_request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables using std::env::var
    pub fn load() -> anyhow::Result<Self> {
        let environment = match env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
            .as_str()
        {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        };

        // Required variables
        let google_client_id = env::var("GOOGLE_CLIENT_ID")
            .map_err(|_| anyhow::anyhow!("GOOGLE_CLIENT_ID environment variable is required"))?;

        let google_client_secret = env::var("GOOGLE_CLIENT_SECRET").map_err(|_| {
            anyhow::anyhow!("GOOGLE_CLIENT_SECRET environment variable is required")
        })?;

        let auth_secret = env::var("AUTH_SECRET")
            .map_err(|_| anyhow::anyhow!("AUTH_SECRET environment variable is required"))?;
        if auth_secret.len() < MIN_AUTH_SECRET_LEN {
            anyhow::bail!(
                "AUTH_SECRET must be at least {} bytes long",
                MIN_AUTH_SECRET_LEN
            );
        }

        let mongodb_uri = env::var("MONGODB_URI")
            .map_err(|_| anyhow::anyhow!("MONGODB_URI environment variable is required"))?;

        // Optional variables with defaults
        let public_url = env::var("NEXTAUTH_URL")
            .or_else(|_| env::var("PUBLIC_URL"))
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        let redirect_uri = env::var("REDIRECT_URI")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default_redirect_uri(&public_url));

        let google_token_url = env::var("GOOGLE_TOKEN_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| GOOGLE_TOKEN_URL.to_string());

        let google_userinfo_url = env::var("GOOGLE_USERINFO_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| GOOGLE_USERINFO_URL.to_string());

        let mongodb_database =
            env::var("MONGODB_DATABASE").unwrap_or_else(|_| "propertypulse".to_string());

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(3000);

        // Cookie domain: if not set or empty, use host-only cookies (no Domain attribute)
        let cookie_domain = env::var("COOKIE_DOMAIN").ok().filter(|s| !s.is_empty());

        let session_max_age_secs = env::var("SESSION_MAX_AGE_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30 * 24 * 60 * 60);
        validate_session_max_age(session_max_age_secs)?;

        let http_connect_timeout_secs = env::var("HTTP_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(10);

        let http_request_timeout_secs = env::var("HTTP_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        Ok(Config {
            environment,
            server_host,
            server_port,
            public_url,
            google_client_id,
            google_client_secret,
            redirect_uri,
            google_token_url,
            google_userinfo_url,
            auth_secret,
            session_max_age_secs,
            mongodb_uri,
            mongodb_database,
            cookie_domain,
            http_connect_timeout_secs,
            http_request_timeout_secs,
        })
    }

    /// Configuration for tests: in-memory store, fixed secret, no network.
    pub fn test_default() -> Self {
        let public_url = "http://localhost:3000".to_string();
        Config {
            environment: Environment::Development,
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
            redirect_uri: default_redirect_uri(&public_url),
            public_url,
            google_client_id: "test-client-id.apps.googleusercontent.com".to_string(),
            google_client_secret: "test-client-secret".to_string(),
            google_token_url: GOOGLE_TOKEN_URL.to_string(),
            google_userinfo_url: GOOGLE_USERINFO_URL.to_string(),
            auth_secret: "test-secret-that-is-at-least-32-bytes-long".to_string(),
            session_max_age_secs: 3600,
            mongodb_uri: MEMORY_STORE_URI.to_string(),
            mongodb_database: "propertypulse_test".to_string(),
            cookie_domain: None,
            http_connect_timeout_secs: 1,
            http_request_timeout_secs: 1,
        }
    }

    /// Check if running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Get cookie security flags based on environment
    pub fn cookie_secure_flag(&self) -> &str {
        if self.is_production() {
            "; Secure"
        } else {
            ""
        }
    }

    /// Get cookie domain attribute string (empty if host-only cookie)
    pub fn cookie_domain_attr(&self) -> String {
        match &self.cookie_domain {
            Some(domain) => format!("; Domain={}", domain),
            None => String::new(),
        }
    }

    /// Whether the in-process user store was requested instead of MongoDB
    pub fn uses_memory_store(&self) -> bool {
        self.mongodb_uri == MEMORY_STORE_URI
    }

    /// Get bind address for server
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn default_redirect_uri(public_url: &str) -> String {
    format!("{}/api/auth/callback/google", public_url)
}

fn validate_session_max_age(secs: u64) -> anyhow::Result<()> {
    if secs == 0 || secs > MAX_SESSION_MAX_AGE_SECS {
        anyhow::bail!(
            "SESSION_MAX_AGE_SECS must be between 1 and {}",
            MAX_SESSION_MAX_AGE_SECS
        );
    }
    Ok(())
}

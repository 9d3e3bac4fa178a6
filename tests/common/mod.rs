use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get as get_route, post},
    Json, Router,
};
use propertypulse::auth::provider::GoogleProfile;
use propertypulse::config::Config;
use propertypulse::db::{MemoryUserStore, NewUser, User, UserStore};
use propertypulse::web::create_router;
use propertypulse::AppState;
use std::sync::Arc;

/// Create a test app backed by the in-memory user store.
/// Returns the router, the shared state, and the store.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, Arc<MemoryUserStore>) {
    create_test_app_with_config(Config::test_default())
}

#[allow(dead_code)]
pub fn create_test_app_with_config(
    config: Config,
) -> (axum::Router, Arc<AppState>, Arc<MemoryUserStore>) {
    let store = Arc::new(MemoryUserStore::new());
    let state = Arc::new(AppState::new(config, store.clone()).expect("test state should build"));
    (create_router(state.clone()), state, store)
}

/// Access token handed out by the stub provider
#[allow(dead_code)]
pub const STUB_ACCESS_TOKEN: &str = "stub-access-token";

/// Serve a stand-in for Google's token and userinfo endpoints on a local port.
///
/// `userinfo` is the profile JSON to return; `None` makes the userinfo
/// endpoint fail with a 500. Returns the test config pointed at the stub.
#[allow(dead_code)]
pub async fn spawn_provider_stub(userinfo: Option<serde_json::Value>) -> Config {
    let app = Router::new()
        .route(
            "/token",
            post(|| async {
                Json(serde_json::json!({
                    "access_token": STUB_ACCESS_TOKEN,
                    "token_type": "Bearer",
                    "expires_in": 3600
                }))
            }),
        )
        .route(
            "/userinfo",
            get_route(move |headers: HeaderMap| {
                let userinfo = userinfo.clone();
                async move {
                    let expected = format!("Bearer {}", STUB_ACCESS_TOKEN);
                    let authorized = headers
                        .get(header::AUTHORIZATION)
                        .and_then(|v| v.to_str().ok())
                        == Some(expected.as_str());
                    match userinfo {
                        Some(profile) if authorized => Json(profile).into_response(),
                        Some(_) => StatusCode::UNAUTHORIZED.into_response(),
                        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
                    }
                }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind provider stub");
    let addr = listener.local_addr().expect("provider stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("provider stub server");
    });

    let mut config = Config::test_default();
    config.google_token_url = format!("http://{addr}/token");
    config.google_userinfo_url = format!("http://{addr}/userinfo");
    config.http_request_timeout_secs = 5;
    config
}

#[allow(dead_code)]
pub fn profile(email: &str) -> GoogleProfile {
    GoogleProfile {
        email: email.to_string(),
        name: Some("Jane Renter".to_string()),
        picture: Some("https://lh3.googleusercontent.com/a/jane".to_string()),
    }
}

/// Insert a user record the way the sign-in callback would.
#[allow(dead_code)]
pub async fn seed_user(store: &MemoryUserStore, email: &str) -> User {
    store
        .create(NewUser {
            email: email.to_string(),
            username: "Jane Renter".to_string(),
            image: Some("https://lh3.googleusercontent.com/a/jane".to_string()),
        })
        .await
        .expect("seed user")
}

/// Signed session cookie header value for `email`.
#[allow(dead_code)]
pub fn session_cookie(state: &AppState, email: &str) -> String {
    let token = state
        .session_keys
        .issue(&profile(email))
        .expect("issue session token");
    format!("session_token={}", token)
}

#[allow(dead_code)]
pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

#[allow(dead_code)]
pub fn find_cookie(headers: &[String], name: &str) -> String {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
        .unwrap_or_else(|| panic!("missing Set-Cookie header for {name}: {headers:?}"))
}

#[allow(dead_code)]
pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

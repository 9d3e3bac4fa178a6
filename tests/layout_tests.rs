//! Page shell tests: navigation, auth context, toast host, footer.

use axum::http::{header, StatusCode};
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_home_renders_shell_for_anonymous_visitor() {
    let (app, _, _) = common::create_test_app();

    let response = app.oneshot(common::get("/", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = common::body_string(response).await;
    assert!(html.contains(r#"<html lang="en">"#));
    assert!(html.contains("<title>PropertyPulse | Find the Perfect Rental</title>"));
    assert!(html.contains(r#"<meta name="keywords" content="rental, find rentals, find properties">"#));
    assert!(html.contains(r#"class="navbar""#));
    assert!(html.contains(r#"href="/api/auth/signin/google""#));
    assert!(!html.contains("Sign Out"));
    assert!(html.contains(r#"class="footer""#));
    assert!(html.contains(r#"id="toast-host""#));
    assert!(html.contains(r#"data-signed-in="false""#));
}

#[tokio::test]
async fn test_home_renders_signed_in_navbar() {
    let (app, state, store) = common::create_test_app();
    common::seed_user(&store, "jane@example.com").await;
    let cookie = common::session_cookie(&state, "jane@example.com");

    let response = app.oneshot(common::get("/", Some(&cookie))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = common::body_string(response).await;
    assert!(html.contains(r#"data-signed-in="true""#));
    assert!(html.contains(r#"action="/api/auth/signout""#));
    assert!(html.contains(r#"href="/profile""#));
    assert!(html.contains("https://lh3.googleusercontent.com/a/jane"));
    assert!(!html.contains("Login or Register"));
}

#[tokio::test]
async fn test_pending_toast_is_rendered_and_cleared() {
    let (app, _, _) = common::create_test_app();

    let response = app
        .oneshot(common::get("/", Some("flash=success:Signed%20in")))
        .await
        .unwrap();

    let cookies = common::set_cookie_headers(&response);
    let cleared = common::find_cookie(&cookies, "flash");
    assert!(cleared.starts_with("flash=; "));
    assert!(cleared.contains("Max-Age=0"));

    let html = common::body_string(response).await;
    assert!(html.contains(r#"class="toast toast-success""#));
    assert!(html.contains(">Signed in</div>"));
}

#[tokio::test]
async fn test_toast_message_is_html_escaped() {
    let (app, _, _) = common::create_test_app();

    let response = app
        .oneshot(common::get(
            "/",
            Some("flash=error:%3Cscript%3Ealert(1)%3C%2Fscript%3E"),
        ))
        .await
        .unwrap();

    let html = common::body_string(response).await;
    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("&#60;script&#62;"));
}

#[tokio::test]
async fn test_session_for_missing_user_renders_signed_out_and_clears_cookie() {
    let (app, state, store) = common::create_test_app();
    let cookie = common::session_cookie(&state, "ghost@example.com");

    let response = app.oneshot(common::get("/", Some(&cookie))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = common::set_cookie_headers(&response);
    let cleared = common::find_cookie(&cookies, "session_token");
    assert!(cleared.starts_with("session_token=; "));
    assert!(cleared.contains("Path=/;"));
    assert!(cleared.contains("Max-Age=0"));

    let html = common::body_string(response).await;
    assert!(html.contains(r#"data-signed-in="false""#));
    assert!(html.contains(r#"href="/api/auth/signin/google""#));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_profile_with_missing_user_clears_cookie_and_redirects() {
    let (app, state, _) = common::create_test_app();
    let cookie = common::session_cookie(&state, "ghost@example.com");

    let response = app
        .oneshot(common::get("/profile", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/api/auth/signin/google"
    );
    let cookies = common::set_cookie_headers(&response);
    assert!(common::find_cookie(&cookies, "session_token").contains("Max-Age=0"));
}

#[tokio::test]
async fn test_page_without_toast_sets_no_cookie() {
    let (app, _, _) = common::create_test_app();

    let response = app.oneshot(common::get("/", None)).await.unwrap();

    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_profile_redirects_anonymous_visitor_to_sign_in() {
    let (app, _, _) = common::create_test_app();

    let response = app.oneshot(common::get("/profile", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/api/auth/signin/google"
    );
}

#[tokio::test]
async fn test_profile_shows_stored_user() {
    let (app, state, store) = common::create_test_app();
    let user = common::seed_user(&store, "jane@example.com").await;
    let cookie = common::session_cookie(&state, "jane@example.com");

    let response = app
        .oneshot(common::get("/profile", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = common::body_string(response).await;
    assert!(html.contains("<title>Your Profile | PropertyPulse</title>"));
    assert!(html.contains(&format!(r#"<dd class="profile-id">{}</dd>"#, user.id)));
    assert!(html.contains(r#"<dd class="profile-email">jane@example.com</dd>"#));
}

#[tokio::test]
async fn test_unknown_route_renders_not_found_page() {
    let (app, _, _) = common::create_test_app();

    let response = app
        .oneshot(common::get("/no/such/page", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = common::body_string(response).await;
    assert!(html.contains("Page Not Found"));
    assert!(html.contains(r#"class="navbar""#));
}

#[tokio::test]
async fn test_probes() {
    let (app, _, _) = common::create_test_app();

    let health = app
        .clone()
        .oneshot(common::get("/healthz", None))
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);

    let ready = app.oneshot(common::get("/readyz", None)).await.unwrap();
    assert_eq!(ready.status(), StatusCode::OK);
    assert_eq!(common::body_string(ready).await, "ready");
}

#[tokio::test]
async fn test_stylesheet_is_served() {
    let (app, _, _) = common::create_test_app();

    let response = app
        .oneshot(common::get("/static/styles/globals.css", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

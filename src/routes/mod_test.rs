use std::sync::Arc;
use std::sync::atomic::Ordering;

use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, header};
use tower::ServiceExt;
use uuid::Uuid;

use super::*;
use crate::auth::AuthError;
use crate::flash::{FLASH_COOKIE, Toast};
use crate::state::test_helpers::{MockAuth, test_app_state};

const SESSION_COOKIE: &str = "better-auth.session_token=tok";

fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_owned())).unwrap()
}

fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_owned))
        .collect()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// =============================================================================
// guard wiring
// =============================================================================

#[tokio::test]
async fn signed_out_home_renders_login_form() {
    let app = app(test_app_state(Arc::new(MockAuth::succeeding())));
    let response = app.oneshot(get_request("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Login to your account"));
}

#[tokio::test]
async fn signed_in_home_redirects_to_dashboard() {
    let app = app(test_app_state(Arc::new(MockAuth::succeeding())));
    let response = app.oneshot(get_request("/", Some(SESSION_COOKIE))).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/dashboard"));
}

#[tokio::test]
async fn signed_in_form_post_lands_on_dashboard() {
    let auth = Arc::new(MockAuth::succeeding());
    let app = app(test_app_state(auth.clone()));
    let body = "email=a%40b.com&password=secret1";
    let response = app.clone().oneshot(post_form("/", body, Some(SESSION_COOKIE))).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard"));
    assert_eq!(auth.total_calls(), 0);

    let follow = app.oneshot(get_request("/dashboard", Some(SESSION_COOKIE))).await.unwrap();
    assert_eq!(follow.status(), StatusCode::OK);
}

#[tokio::test]
async fn signed_out_dashboard_redirects_home() {
    let app = app(test_app_state(Arc::new(MockAuth::succeeding())));
    let response = app.oneshot(get_request("/dashboard", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/"));
}

#[tokio::test]
async fn signed_in_dashboard_renders() {
    let app = app(test_app_state(Arc::new(MockAuth::succeeding())));
    let response = app.oneshot(get_request("/dashboard", Some(SESSION_COOKIE))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Logout"));
}

#[tokio::test]
async fn healthz_is_unguarded() {
    let app = app(test_app_state(Arc::new(MockAuth::succeeding())));
    let response = app.oneshot(get_request("/healthz", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn sign_up_query_opens_sign_up_form() {
    let app = app(test_app_state(Arc::new(MockAuth::succeeding())));
    let response = app.oneshot(get_request("/?mode=sign-up", None)).await.unwrap();
    let html = body_text(response).await;
    assert!(html.contains(r#"name="name""#));
}

// =============================================================================
// form submission
// =============================================================================

#[tokio::test]
async fn sign_in_success_redirects_and_forwards_session() {
    let auth = Arc::new(MockAuth::succeeding());
    let app = app(test_app_state(auth.clone()));
    let response = app
        .oneshot(post_form("/", "mode=sign-in&email=a%40b.com&password=secret1", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard"));
    let cookies = set_cookies(&response);
    assert!(cookies.iter().any(|c| c.starts_with("better-auth.session_token=tok")));
    assert!(cookies.iter().any(|c| c.starts_with(&format!("{FLASH_COOKIE}=success:"))));
    assert_eq!(auth.sign_in_calls.load(Ordering::SeqCst), 1);
    assert_eq!(auth.total_calls(), 1);
}

#[tokio::test]
async fn sign_up_with_blank_name_is_rejected_locally() {
    let auth = Arc::new(MockAuth::succeeding());
    let app = app(test_app_state(auth.clone()));
    let response = app
        .oneshot(post_form("/", "mode=sign-up&name=&email=a%40b.com&password=secret1", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("Please provide all details"));
    assert_eq!(auth.total_calls(), 0);
}

#[tokio::test]
async fn provider_rejection_rerenders_form_with_message() {
    let auth = Arc::new(MockAuth::failing("Invalid email or password"));
    let app = app(test_app_state(auth.clone()));
    let response = app
        .oneshot(post_form("/", "email=a%40b.com&password=wrong", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(location(&response).is_none());
    let html = body_text(response).await;
    assert!(html.contains("Invalid email or password"));
    assert!(html.contains(r#"value="a@b.com""#));
    assert_eq!(auth.total_calls(), 1);
}

#[tokio::test]
async fn transport_failure_shows_generic_message() {
    let auth = Arc::new(MockAuth::with_result(Err(AuthError::Transport("connection refused".into()))));
    let app = app(test_app_state(auth));
    let response = app
        .oneshot(post_form("/", "email=a%40b.com&password=pw", None))
        .await
        .unwrap();
    let html = body_text(response).await;
    assert!(html.contains("Could not reach the sign-in service"));
    assert!(!html.contains("connection refused"));
}

#[tokio::test]
async fn toggle_switches_mode_and_keeps_values() {
    let auth = Arc::new(MockAuth::succeeding());
    let app = app(test_app_state(auth.clone()));
    let response = app
        .oneshot(post_form("/", "mode=sign-in&action=toggle&email=a%40b.com&password=secret1", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"name="mode" value="sign-up""#));
    assert!(html.contains(r#"value="a@b.com""#));
    assert!(html.contains(r#"value="secret1""#));
    assert_eq!(auth.total_calls(), 0);
}

#[tokio::test]
async fn duplicate_submission_is_rejected_without_backend_call() {
    let auth = Arc::new(MockAuth::succeeding());
    let state = test_app_state(auth.clone());
    let form_id = Uuid::new_v4();
    let _outstanding = state.inflight.claim(form_id).unwrap();

    let response = app(state)
        .oneshot(post_form("/", &format!("form_id={form_id}&email=a%40b.com&password=pw"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(auth.total_calls(), 0);
}

#[tokio::test]
async fn claim_is_released_after_submission() {
    let auth = Arc::new(MockAuth::failing("nope"));
    let state = test_app_state(auth);
    let form_id = Uuid::new_v4();

    let response = app(state.clone())
        .oneshot(post_form("/", &format!("form_id={form_id}&email=a%40b.com&password=pw"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!state.inflight.is_claimed(form_id));
}

// =============================================================================
// flash + logout
// =============================================================================

#[tokio::test]
async fn dashboard_shows_and_clears_flash() {
    let app = app(test_app_state(Arc::new(MockAuth::succeeding())));
    let flash = Toast::success("Successfully logged in").encode();
    let cookie = format!("{SESSION_COOKIE}; {FLASH_COOKIE}={flash}");
    let response = app.oneshot(get_request("/dashboard", Some(&cookie))).await.unwrap();

    let cookies = set_cookies(&response);
    assert!(cookies.iter().any(|c| c.starts_with(&format!("{FLASH_COOKIE}=;"))));
    assert!(body_text(response).await.contains("Successfully logged in"));
}

#[tokio::test]
async fn logout_signs_out_and_clears_session_cookie() {
    let auth = Arc::new(MockAuth::succeeding());
    let app = app(test_app_state(auth.clone()));
    let response = app.oneshot(post_form("/logout", "", Some(SESSION_COOKIE))).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));
    assert_eq!(auth.sign_out_calls.load(Ordering::SeqCst), 1);
    assert_eq!(auth.last_cookie_header.lock().unwrap().as_deref(), Some(SESSION_COOKIE));
    let cookies = set_cookies(&response);
    assert!(cookies.iter().any(|c| c.starts_with("better-auth.session_token=;")));
}

#[tokio::test]
async fn logout_without_session_skips_provider() {
    let auth = Arc::new(MockAuth::succeeding());
    let app = app(test_app_state(auth.clone()));
    let response = app.oneshot(post_form("/logout", "", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(auth.sign_out_calls.load(Ordering::SeqCst), 0);
}

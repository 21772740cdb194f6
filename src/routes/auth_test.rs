use super::*;
use axum::body::Body;
use axum::extract::FromRequest;
use axum::http::{Request, header};

async fn parse(body: &str) -> FormInput {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .unwrap();
    let Form(input) = Form::<FormInput>::from_request(request, &()).await.unwrap();
    input
}

// =============================================================================
// FormInput
// =============================================================================

#[tokio::test]
async fn form_input_defaults_to_sign_in_submit() {
    let input = parse("email=a%40b.com&password=secret1").await;
    assert!(matches!(input.action, FormAction::Submit));
    assert_eq!(input.mode, Mode::SignIn);
    assert_eq!(input.email, "a@b.com");
    assert!(input.form_id.is_none());
}

#[tokio::test]
async fn form_input_reads_mode_and_action() {
    let input = parse("mode=sign-up&action=toggle&name=Ada").await;
    assert!(matches!(input.action, FormAction::Toggle));
    assert_eq!(input.mode, Mode::SignUp);
    assert_eq!(input.name, "Ada");
}

#[tokio::test]
async fn into_form_keeps_given_form_id() {
    let id = Uuid::new_v4();
    let (form_id, _, form) = parse(&format!("form_id={id}&email=x")).await.into_form();
    assert_eq!(form_id, id);
    assert_eq!(form.fields().email, "x");
}

#[tokio::test]
async fn into_form_generates_missing_form_id() {
    let (a, _, _) = parse("email=x").await.into_form();
    let (b, _, _) = parse("email=x").await.into_form();
    assert_ne!(a, b);
}

// =============================================================================
// forward_cookies
// =============================================================================

#[test]
fn forward_cookies_appends_each_value() {
    let mut response = StatusCode::OK.into_response();
    forward_cookies(&mut response, &["a=1; Path=/".to_owned(), "b=2; Path=/".to_owned()]);
    let values: Vec<_> = response.headers().get_all(SET_COOKIE).iter().collect();
    assert_eq!(values.len(), 2);
}

#[test]
fn forward_cookies_skips_invalid_header_values() {
    let mut response = StatusCode::OK.into_response();
    forward_cookies(&mut response, &["bad\nvalue".to_owned(), "ok=1".to_owned()]);
    let values: Vec<_> = response.headers().get_all(SET_COOKIE).iter().collect();
    assert_eq!(values.len(), 1);
}

//! Auth routes — login form rendering, form submission, logout.

use axum::extract::{Form, Query, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use uuid::Uuid;

use crate::flash::{self, Toast};
use crate::form::{AuthForm, Field, Fields, Mode};
use crate::guard::HOME_PATH;
use crate::session::SECURE_COOKIE_PREFIX;
use crate::state::AppState;
use crate::views;

const DUPLICATE_SUBMIT: &str = "Your previous request is still being processed";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormAction {
    #[default]
    Submit,
    Toggle,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginQuery {
    mode: Mode,
}

/// Body of `POST /`. The submit button may be missing from the body once the
/// page script disables it, so `action` defaults to submit.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FormInput {
    form_id: Option<Uuid>,
    mode: Mode,
    action: FormAction,
    name: String,
    email: String,
    password: String,
}

impl FormInput {
    fn into_form(self) -> (Uuid, FormAction, AuthForm) {
        let form_id = self.form_id.unwrap_or_else(Uuid::new_v4);
        let mut form = AuthForm::new(self.mode, Fields::default());
        form.set_field(Field::Name, self.name);
        form.set_field(Field::Email, self.email);
        form.set_field(Field::Password, self.password);
        (form_id, self.action, form)
    }
}

/// Append raw provider `Set-Cookie` values to a response.
fn forward_cookies(response: &mut Response, set_cookies: &[String]) {
    for raw in set_cookies {
        match HeaderValue::from_str(raw) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "dropping unrepresentable provider cookie"),
        }
    }
}

fn form_response(status: StatusCode, jar: CookieJar, form: &AuthForm, form_id: Uuid, toast: Option<&Toast>) -> Response {
    (status, jar, views::login_page(form, form_id, toast)).into_response()
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /` — render the login form. `?mode=sign-up` opens the sign-up variant.
pub async fn login_page(jar: CookieJar, Query(query): Query<LoginQuery>) -> Response {
    let (jar, toast) = flash::take(jar);
    let form = AuthForm::new(query.mode, Fields::default());
    form_response(StatusCode::OK, jar, &form, Uuid::new_v4(), toast.as_ref())
}

/// `POST /` — toggle the form mode or submit it to the auth provider.
pub async fn submit_form(State(state): State<AppState>, jar: CookieJar, Form(input): Form<FormInput>) -> Response {
    let (form_id, action, mut form) = input.into_form();

    if let FormAction::Toggle = action {
        form.toggle_mode();
        return form_response(StatusCode::OK, jar, &form, form_id, None);
    }

    let Some(_ticket) = state.inflight.claim(form_id) else {
        tracing::info!(%form_id, "duplicate form submission rejected");
        return form_response(StatusCode::CONFLICT, jar, &form, form_id, Some(&Toast::error(DUPLICATE_SUBMIT)));
    };

    let outcome = match form.submit(state.auth.as_ref(), state.config.auth_timeout).await {
        Ok(outcome) => outcome,
        Err(e) => {
            return form_response(StatusCode::UNPROCESSABLE_ENTITY, jar, &form, form_id, Some(&Toast::error(e.to_string())));
        }
    };

    match (outcome.navigate, outcome.session) {
        (Some(target), Some(session)) => {
            tracing::info!(%form_id, mode = form.mode().as_str(), "auth succeeded");
            if let Some(user) = &session.user {
                tracing::debug!(name = %user.name, email = %user.email, "provider returned user");
            }
            let jar = flash::push(jar, &outcome.toast, state.config.cookie_secure);
            let mut response = (jar, Redirect::to(target)).into_response();
            forward_cookies(&mut response, &session.set_cookies);
            response
        }
        _ => form_response(StatusCode::OK, jar, &form, form_id, Some(&outcome.toast)),
    }
}

/// `POST /logout` — end the provider session, clear session cookies, redirect home.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap, jar: CookieJar) -> Response {
    let mut provider_cookies = Vec::new();
    if state.session_cookies.session_token(&jar).is_some() {
        let cookie_header = headers
            .get(COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        match state.auth.sign_out(cookie_header).await {
            Ok(cookies) => provider_cookies = cookies,
            Err(e) => tracing::warn!(error = %e, "provider sign-out failed; clearing cookies locally"),
        }
    }

    let mut jar = jar;
    for name in state.session_cookies.cookie_names() {
        if jar.get(name).is_some() {
            let removal = Cookie::build(name.to_owned())
                .path("/")
                .secure(name.starts_with(SECURE_COOKIE_PREFIX));
            jar = jar.remove(removal);
        }
    }

    let mut response = (jar, Redirect::to(HOME_PATH)).into_response();
    forward_cookies(&mut response, &provider_cookies);
    response
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

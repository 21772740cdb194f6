//! HTTP client for a better-auth compatible provider.
//!
//! Endpoints (relative to the configured base URL):
//! - `POST /sign-up/email`
//! - `POST /sign-in/email`
//! - `POST /sign-out`

use std::time::Duration;

use reqwest::header::{COOKIE, SET_COOKIE};
use serde::Deserialize;

use super::{AuthBackend, AuthError, AuthUser, Credentials, NewAccount, Session};

const CONNECT_TIMEOUT_SECS: u64 = 10;
/// Redirect target passed to the provider on sign-up; unused for email auth.
const SIGN_UP_CALLBACK_URL: &str = "/dashboard";

pub struct HttpAuthBackend {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: Option<String>,
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderSession {
    user: Option<AuthUser>,
}

impl HttpAuthBackend {
    /// Build a client for the provider at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Transport`] if the HTTP client fails to build.
    pub fn new(base_url: &str) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post_session(&self, path: &str, body: serde_json::Value) -> Result<Session, AuthError> {
        let resp = self
            .http
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = resp.status();
        let set_cookies = collect_set_cookies(resp.headers());
        let text = resp
            .text()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(rejection_from_body(status, &text));
        }

        let user = serde_json::from_str::<ProviderSession>(&text)
            .ok()
            .and_then(|s| s.user);
        Ok(Session { set_cookies, user })
    }
}

fn collect_set_cookies(headers: &reqwest::header::HeaderMap) -> Vec<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_owned)
        .collect()
}

/// Turn a non-2xx provider body into a user-facing rejection.
pub(crate) fn rejection_from_body(status: reqwest::StatusCode, body: &str) -> AuthError {
    let parsed = serde_json::from_str::<ProviderError>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|e| e.message.clone())
        .filter(|m| !m.trim().is_empty())
        .or_else(|| parsed.and_then(|e| e.code).map(|code| code.replace('_', " ").to_lowercase()))
        .unwrap_or_else(|| format!("Request failed ({status})"));
    AuthError::Rejected { message }
}

#[async_trait::async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn sign_up(&self, account: &NewAccount) -> Result<Session, AuthError> {
        let body = serde_json::json!({
            "email": account.email,
            "password": account.password,
            "name": account.name,
            "callbackURL": SIGN_UP_CALLBACK_URL,
        });
        self.post_session("/sign-up/email", body).await
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let body = serde_json::json!({
            "email": credentials.email,
            "password": credentials.password,
        });
        self.post_session("/sign-in/email", body).await
    }

    async fn sign_out(&self, cookie_header: &str) -> Result<Vec<String>, AuthError> {
        let resp = self
            .http
            .post(self.url("/sign-out"))
            .header(COOKIE, cookie_header)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = resp.status();
        let set_cookies = collect_set_cookies(resp.headers());
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(rejection_from_body(status, &body));
        }
        Ok(set_cookies)
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

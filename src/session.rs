//! Session marker detection.
//!
//! DESIGN
//! ======
//! The auth provider owns sessions. This server only needs to know whether a
//! request *carries* one, so the check is a capability (`SessionProbe`)
//! injected into the route guard. The cookie-based probe never validates the
//! token; presence of a non-empty value is the whole contract.

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar};

/// Name of the session token cookie, without prefix.
pub const SESSION_TOKEN_COOKIE: &str = "session_token";
/// Prefix the provider adds to cookies set over HTTPS.
pub const SECURE_COOKIE_PREFIX: &str = "__Secure-";

/// Answers "does this request carry a session?".
pub trait SessionProbe: Send + Sync {
    fn has_session(&self, headers: &HeaderMap) -> bool;
}

/// Probe that looks for the provider's session cookie by name.
#[derive(Debug, Clone)]
pub struct CookieSessionProbe {
    cookie_name: String,
    secure_cookie_name: String,
}

impl CookieSessionProbe {
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        let cookie_name = format!("{prefix}.{SESSION_TOKEN_COOKIE}");
        let secure_cookie_name = format!("{SECURE_COOKIE_PREFIX}{cookie_name}");
        Self { cookie_name, secure_cookie_name }
    }

    /// Both cookie names the provider may use, plain first.
    #[must_use]
    pub fn cookie_names(&self) -> [&str; 2] {
        [self.cookie_name.as_str(), self.secure_cookie_name.as_str()]
    }

    /// Return the session token carried by the jar, if any.
    #[must_use]
    pub fn session_token<'a>(&self, jar: &'a CookieJar) -> Option<&'a str> {
        self.cookie_names()
            .into_iter()
            .filter_map(|name| jar.get(name).map(Cookie::value))
            .find(|value| !value.trim().is_empty())
    }
}

impl SessionProbe for CookieSessionProbe {
    fn has_session(&self, headers: &HeaderMap) -> bool {
        let jar = CookieJar::from_headers(headers);
        self.session_token(&jar).is_some()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

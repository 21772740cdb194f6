//! Transient toast notifications.
//!
//! A toast set before a redirect rides in a short-lived `flash` cookie and is
//! shown once by the next page render, which clears the cookie. The message is
//! hex-encoded so arbitrary provider text survives cookie value rules.

use std::fmt::Write;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

pub const FLASH_COOKIE: &str = "flash";
/// Matches the on-screen toast lifetime.
pub const FLASH_MAX_AGE_SECS: i64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "success" => Some(Self::Success),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: ToastKind::Success, message: message.into() }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: ToastKind::Error, message: message.into() }
    }

    /// Cookie value: `kind:hex(message)`.
    #[must_use]
    pub fn encode(&self) -> String {
        format!("{}:{}", self.kind.as_str(), bytes_to_hex(self.message.as_bytes()))
    }

    #[must_use]
    pub fn decode(raw: &str) -> Option<Self> {
        let (kind, hex) = raw.split_once(':')?;
        let kind = ToastKind::parse(kind)?;
        let bytes = hex_to_bytes(hex)?;
        let message = String::from_utf8(bytes).ok()?;
        Some(Self { kind, message })
    }
}

/// Store `toast` for the next page render.
#[must_use]
pub fn push(jar: CookieJar, toast: &Toast, secure: bool) -> CookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, toast.encode()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(FLASH_MAX_AGE_SECS));
    jar.add(cookie)
}

/// Take the pending toast, if any, and clear the cookie.
#[must_use]
pub fn take(jar: CookieJar) -> (CookieJar, Option<Toast>) {
    let Some(raw) = jar.get(FLASH_COOKIE).map(|c| c.value().to_owned()) else {
        return (jar, None);
    };
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, Toast::decode(&raw))
}

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

pub(crate) fn hex_to_bytes(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| hex.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
        .collect()
}

#[cfg(test)]
#[path = "flash_test.rs"]
mod tests;

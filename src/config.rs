//! Runtime configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_AUTH_BASE_URL: &str = "http://localhost:3001/api/auth";
pub const DEFAULT_SESSION_COOKIE_PREFIX: &str = "better-auth";
pub const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    /// Base URL of the auth provider's API, without trailing slash.
    pub auth_base_url: String,
    /// Cookie prefix the provider uses (`{prefix}.session_token`).
    pub session_cookie_prefix: String,
    pub cookie_secure: bool,
    /// Upper bound on a single sign-in / sign-up call. `None` waits forever.
    pub auth_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_owned(),
            session_cookie_prefix: DEFAULT_SESSION_COOKIE_PREFIX.to_owned(),
            cookie_secure: false,
            auth_timeout: Some(Duration::from_secs(DEFAULT_AUTH_TIMEOUT_SECS)),
        }
    }
}

impl Config {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `AUTH_BASE_URL`: default `http://localhost:3001/api/auth`
    /// - `SESSION_COOKIE_PREFIX`: default `better-auth`
    /// - `COOKIE_SECURE`: bool; inferred from an `https://` base URL when unset
    /// - `AUTH_TIMEOUT_SECS`: default 15, `0` disables the timeout
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let auth_base_url = lookup("AUTH_BASE_URL")
            .map(|raw| raw.trim().trim_end_matches('/').to_owned())
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| DEFAULT_AUTH_BASE_URL.to_owned());
        let session_cookie_prefix = lookup("SESSION_COOKIE_PREFIX")
            .map(|raw| raw.trim().to_owned())
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_COOKIE_PREFIX.to_owned());
        let cookie_secure = lookup("COOKIE_SECURE")
            .as_deref()
            .and_then(parse_bool)
            .unwrap_or_else(|| auth_base_url.starts_with("https://"));
        let timeout_secs = parse_or("AUTH_TIMEOUT_SECS", lookup("AUTH_TIMEOUT_SECS"), DEFAULT_AUTH_TIMEOUT_SECS)?;
        let auth_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        Ok(Self { port, auth_base_url, session_cookie_prefix, cookie_secure, auth_timeout })
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

/// Load `.env` from the working directory or a parent. A missing file is not
/// an error; a file that fails to parse is.
///
/// # Errors
///
/// Returns the [`dotenvy::Error`] for an unreadable or malformed file.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
    optional_env_file(dotenvy::dotenv())
}

fn optional_env_file(result: Result<PathBuf, dotenvy::Error>) -> Result<Option<PathBuf>, dotenvy::Error> {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

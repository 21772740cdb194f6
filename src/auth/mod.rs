//! Auth provider seam.
//!
//! DESIGN
//! ======
//! Account creation, credential checks and session issuance live in an
//! external provider. `AuthBackend` is the provider-neutral trait the form
//! controller and logout route call; `http::HttpAuthBackend` is the real
//! client and tests substitute a mock.

pub mod http;

use serde::{Deserialize, Serialize};

pub use http::HttpAuthBackend;

// =============================================================================
// REQUEST TYPES
// =============================================================================

/// Sign-in payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Sign-up payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

// =============================================================================
// RESPONSE TYPES
// =============================================================================

/// User fields echoed back by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    pub name: String,
    pub email: String,
}

/// A successful sign-in or sign-up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Raw `Set-Cookie` values to forward to the browser.
    pub set_cookies: Vec<String>,
    pub user: Option<AuthUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The provider answered and refused (bad credentials, duplicate account).
    #[error("{message}")]
    Rejected { message: String },
    #[error("auth provider unreachable: {0}")]
    Transport(String),
    #[error("auth provider timed out")]
    Timeout,
}

impl AuthError {
    /// Text suitable for showing to the user.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Rejected { message } => message.clone(),
            Self::Transport(_) => "Could not reach the sign-in service. Please try again.".to_owned(),
            Self::Timeout => "The sign-in service took too long to respond. Please try again.".to_owned(),
        }
    }
}

// =============================================================================
// AUTH BACKEND TRAIT
// =============================================================================

/// Provider-neutral async trait for account operations. Enables mocking in tests.
#[async_trait::async_trait]
pub trait AuthBackend: Send + Sync {
    /// Create an account and open a session for it.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the provider rejects the account or cannot be reached.
    async fn sign_up(&self, account: &NewAccount) -> Result<Session, AuthError>;

    /// Open a session for existing credentials.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the credentials are refused or the provider cannot be reached.
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError>;

    /// End the session identified by the browser's raw `Cookie` header.
    /// Returns `Set-Cookie` values the provider wants forwarded.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the provider cannot be reached or refuses.
    async fn sign_out(&self, cookie_header: &str) -> Result<Vec<String>, AuthError>;
}

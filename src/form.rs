//! Sign-in / sign-up form controller.
//!
//! DESIGN
//! ======
//! The form is an explicit state machine: `Phase::Idle` or
//! `Phase::Submitting { mode }`. The mode of an in-flight submission lives in
//! the `Submitting` variant, so a toggle during a call cannot change what the
//! call meant. Validation happens before the phase changes, so a rejected
//! submit never reaches the backend and leaves the form idle.
//!
//! `begin_submit` / `finish` are the two halves of a submission and are
//! public so callers can observe the `Submitting` phase; `submit` runs both
//! around one backend call.

use std::time::Duration;

use serde::Deserialize;

use crate::auth::{AuthBackend, AuthError, Credentials, NewAccount, Session};
use crate::flash::Toast;
use crate::guard::DASHBOARD_PATH;

pub const MISSING_DETAILS: &str = "Please provide all details";
pub const SIGNED_UP: &str = "User has been created";
pub const SIGNED_IN: &str = "Successfully logged in";

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    #[default]
    SignIn,
    SignUp,
}

impl Mode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::SignIn => Self::SignUp,
            Self::SignUp => Self::SignIn,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SignIn => "sign-in",
            Self::SignUp => "sign-up",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Password,
}

/// Raw field values as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting { mode: Mode },
}

/// Validated, trimmed payload for one backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    SignIn(Credentials),
    SignUp(NewAccount),
}

impl Submission {
    #[must_use]
    pub fn mode(&self) -> Mode {
        match self {
            Self::SignIn(_) => Mode::SignIn,
            Self::SignUp(_) => Mode::SignUp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0}")]
    Validation(String),
    #[error("a submission is already in progress")]
    Busy,
}

/// What the caller should do after a submission settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub toast: Toast,
    /// Set on success only.
    pub navigate: Option<&'static str>,
    /// Provider session to hand to the browser on success.
    pub session: Option<Session>,
}

// =============================================================================
// CONTROLLER
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthForm {
    fields: Fields,
    mode: Mode,
    phase: Phase,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self::new(Mode::default(), Fields::default())
    }
}

impl AuthForm {
    #[must_use]
    pub fn new(mode: Mode, fields: Fields) -> Self {
        Self { fields, mode, phase: Phase::Idle }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// The submit control is disabled while a call is outstanding.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, Phase::Submitting { .. })
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.fields.name = value,
            Field::Email => self.fields.email = value,
            Field::Password => self.fields.password = value,
        }
    }

    /// Flip between sign-in and sign-up. Entered values are kept.
    pub fn toggle_mode(&mut self) {
        if self.is_submitting() {
            return;
        }
        self.mode = self.mode.toggled();
    }

    /// Validate and enter `Submitting`.
    ///
    /// # Errors
    ///
    /// [`FormError::Busy`] while a submission is outstanding,
    /// [`FormError::Validation`] when a required field is blank.
    pub fn begin_submit(&mut self) -> Result<Submission, FormError> {
        if self.is_submitting() {
            return Err(FormError::Busy);
        }
        let submission = validate(self.mode, &self.fields)?;
        self.phase = Phase::Submitting { mode: self.mode };
        Ok(submission)
    }

    /// Settle the outstanding submission and return to `Idle`.
    pub fn finish(&mut self, result: Result<Session, AuthError>) -> Outcome {
        let mode = match self.phase {
            Phase::Submitting { mode } => mode,
            Phase::Idle => self.mode,
        };
        self.phase = Phase::Idle;

        match result {
            Ok(session) => {
                let message = match mode {
                    Mode::SignIn => SIGNED_IN,
                    Mode::SignUp => SIGNED_UP,
                };
                Outcome { toast: Toast::success(message), navigate: Some(DASHBOARD_PATH), session: Some(session) }
            }
            Err(e) => Outcome { toast: Toast::error(e.message()), navigate: None, session: None },
        }
    }

    /// Run one full submission against `backend`, bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns the [`FormError`] from [`AuthForm::begin_submit`]; the backend
    /// is not called in that case.
    pub async fn submit(&mut self, backend: &dyn AuthBackend, timeout: Option<Duration>) -> Result<Outcome, FormError> {
        let submission = self.begin_submit()?;
        let result = call_backend(backend, &submission, timeout).await;
        if let Err(e) = &result {
            tracing::warn!(mode = submission.mode().as_str(), error = %e, "auth submission failed");
        }
        Ok(self.finish(result))
    }
}

/// Check required fields for `mode` and build the trimmed payload.
///
/// # Errors
///
/// Returns [`FormError::Validation`] if any required field is blank.
pub fn validate(mode: Mode, fields: &Fields) -> Result<Submission, FormError> {
    let name = fields.name.trim();
    let email = fields.email.trim();
    let password = fields.password.trim();

    let missing = match mode {
        Mode::SignUp => name.is_empty() || email.is_empty() || password.is_empty(),
        Mode::SignIn => email.is_empty() || password.is_empty(),
    };
    if missing {
        return Err(FormError::Validation(MISSING_DETAILS.to_owned()));
    }

    Ok(match mode {
        Mode::SignIn => Submission::SignIn(Credentials { email: email.to_owned(), password: password.to_owned() }),
        Mode::SignUp => Submission::SignUp(NewAccount {
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        }),
    })
}

async fn call_backend(
    backend: &dyn AuthBackend,
    submission: &Submission,
    timeout: Option<Duration>,
) -> Result<Session, AuthError> {
    let call = async {
        match submission {
            Submission::SignIn(credentials) => backend.sign_in(credentials).await,
            Submission::SignUp(account) => backend.sign_up(account).await,
        }
    };
    match timeout {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .unwrap_or(Err(AuthError::Timeout)),
        None => call.await,
    }
}

#[cfg(test)]
#[path = "form_test.rs"]
mod tests;

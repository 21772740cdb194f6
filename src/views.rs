//! Server-rendered pages.
//!
//! Templates live in `templates/` and are compiled by askama, which escapes
//! every interpolated value. Handlers return the template structs directly;
//! `WebTemplate` renders them into an HTML response.

use askama::Template;
use askama_web::WebTemplate;
use uuid::Uuid;

use crate::flash::Toast;
use crate::form::{AuthForm, Fields, Mode};

/// Sign-in / sign-up form.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub toast: Option<Toast>,
    pub form_id: Uuid,
    pub mode: &'static str,
    pub show_name: bool,
    pub fields: Fields,
    pub submit_label: &'static str,
    pub toggle_prompt: &'static str,
    pub toggle_label: &'static str,
}

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub toast: Option<Toast>,
}

/// Build the login page for `form`.
///
/// Field values are echoed back so a mode toggle or a failed attempt keeps
/// what the user typed.
#[must_use]
pub fn login_page(form: &AuthForm, form_id: Uuid, toast: Option<&Toast>) -> LoginTemplate {
    let (submit_label, toggle_prompt, toggle_label) = match form.mode() {
        Mode::SignIn => ("Login", "Don\u{2019}t have an account?", "Sign up"),
        Mode::SignUp => ("Sign up", "Already have an account?", "Login"),
    };
    LoginTemplate {
        toast: toast.cloned(),
        form_id,
        mode: form.mode().as_str(),
        show_name: form.mode() == Mode::SignUp,
        fields: form.fields().clone(),
        submit_label,
        toggle_prompt,
        toggle_label,
    }
}

#[must_use]
pub fn dashboard_page(toast: Option<&Toast>) -> DashboardTemplate {
    DashboardTemplate { toast: toast.cloned() }
}

#[cfg(test)]
#[path = "views_test.rs"]
mod tests;

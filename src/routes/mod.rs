//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the login form at `/`, the dashboard, logout and a health check
//! under a single Axum router. The route guard wraps every route; the trace
//! layer sits outermost so redirects issued by the guard are logged too.

pub mod auth;
pub mod dashboard;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::guard;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let probe = state.probe.clone();

    Router::new()
        .route("/", get(auth::login_page).post(auth::submit_form))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/logout", post(auth::logout))
        .route("/healthz", get(healthz))
        .with_state(state)
        .layer(middleware::from_fn_with_state(probe, guard::route_guard))
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

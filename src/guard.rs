//! Session-gated route guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs once per inbound request ahead of the page handlers. Signed-out
//! visitors are kept out of the dashboard; signed-in visitors skip the login
//! page. The decision is a pure function of (path, has-session) so it can be
//! tested without a provider or a cookie format.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::session::SessionProbe;

pub const HOME_PATH: &str = "/";
pub const DASHBOARD_PATH: &str = "/dashboard";
/// Prefix that requires a session.
pub const PROTECTED_PREFIX: &str = "/dashboard";

/// Outcome of the guard for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    PassThrough,
    Redirect(&'static str),
}

/// Whether the guard applies to `path` at all.
///
/// Covers the root page and the protected prefix with its sub-paths.
/// `/dashboardx` is not a sub-path of `/dashboard`.
#[must_use]
pub fn matches(path: &str) -> bool {
    path == HOME_PATH || is_protected(path)
}

fn is_protected(path: &str) -> bool {
    path.strip_prefix(PROTECTED_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Decide what to do with a request. First matching rule wins.
#[must_use]
pub fn decide(path: &str, has_session: bool) -> Decision {
    if !has_session && is_protected(path) {
        return Decision::Redirect(HOME_PATH);
    }
    if has_session && path == HOME_PATH {
        return Decision::Redirect(DASHBOARD_PATH);
    }
    Decision::PassThrough
}

/// Redirect status for a guard decision. Safe methods keep their method (307);
/// anything else is turned into a GET of the target (303), since the target
/// pages only serve GET.
fn redirect_for(method: &Method, target: &'static str) -> Redirect {
    if method == Method::GET || method == Method::HEAD {
        Redirect::temporary(target)
    } else {
        Redirect::to(target)
    }
}

/// Axum middleware applying [`decide`] with an injected session probe.
///
/// Paths outside [`matches`] are forwarded without probing.
pub async fn route_guard(State(probe): State<Arc<dyn SessionProbe>>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    if !matches(&path) {
        return next.run(request).await;
    }

    let has_session = probe.has_session(request.headers());
    match decide(&path, has_session) {
        Decision::PassThrough => next.run(request).await,
        Decision::Redirect(target) => {
            let method = request.method();
            tracing::debug!(%method, %path, has_session, %target, "route guard redirect");
            redirect_for(method, target).into_response()
        }
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;

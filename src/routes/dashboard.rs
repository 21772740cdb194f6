//! Dashboard page. Reachable only with a session; the route guard enforces that.

use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;

use crate::flash;
use crate::views;

/// `GET /dashboard` — render the dashboard and show any pending toast.
pub async fn dashboard(jar: CookieJar) -> Response {
    let (jar, toast) = flash::take(jar);
    (jar, views::dashboard_page(toast.as_ref())).into_response()
}

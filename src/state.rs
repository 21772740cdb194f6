//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the auth backend, the session probe the guard consults, the
//! in-flight form registry and the parsed config. Everything is behind an
//! `Arc` so cloning per request is cheap.

use std::sync::Arc;

use crate::auth::AuthBackend;
use crate::config::Config;
use crate::inflight::InFlight;
use crate::session::{CookieSessionProbe, SessionProbe};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthBackend>,
    pub probe: Arc<dyn SessionProbe>,
    /// Cookie names the provider uses for the session; cleared on logout.
    pub session_cookies: Arc<CookieSessionProbe>,
    pub inflight: InFlight,
    pub config: Arc<Config>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config, auth: Arc<dyn AuthBackend>) -> Self {
        let cookies = Arc::new(CookieSessionProbe::new(&config.session_cookie_prefix));
        Self {
            auth,
            probe: cookies.clone(),
            session_cookies: cookies,
            inflight: InFlight::new(),
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

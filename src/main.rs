mod auth;
mod config;
mod flash;
mod form;
mod guard;
mod inflight;
mod routes;
mod session;
mod state;
mod views;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    let dotenv = config::load_dotenv();
    tracing_subscriber::fmt::init();
    match dotenv {
        Ok(Some(path)) => tracing::debug!(path = %path.display(), "loaded .env"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "ignoring malformed .env"),
    }

    let config = config::Config::from_env().expect("invalid configuration");
    let backend = auth::HttpAuthBackend::new(&config.auth_base_url).expect("auth client init failed");
    tracing::info!(
        auth_base_url = %config.auth_base_url,
        timeout_secs = config.auth_timeout.map(|t| t.as_secs()),
        "auth provider configured"
    );

    let port = config.port;
    let state = state::AppState::new(config, Arc::new(backend));

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "sparkup listening");
    axum::serve(listener, app).await.expect("server failed");
}

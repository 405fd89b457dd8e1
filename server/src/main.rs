mod config;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid configuration");
    let state = state::AppState::from_config(&config).expect("identity client init failed");
    tracing::info!(
        api_url = %config.api_url,
        timeout_secs = config.upstream_timeout.as_secs(),
        "identity client initialized"
    );

    // SSR needs cargo-leptos env; without it the API still serves.
    let app = match routes::leptos_app(state.clone()) {
        Ok(app) => app,
        Err(e) => {
            tracing::warn!(error = %e, "Leptos SSR not configured, serving API only");
            routes::app(state)
        }
    };

    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "lumina listening");
    axum::serve(listener, app).await.expect("server failed");
}

pub mod api;
pub mod config;
pub mod db;
pub mod history;
pub mod models;
pub mod state;
pub mod submission;
pub mod triage;

use std::sync::Arc;

use config::AppConfig;
use state::AppState;

/// Start the service: read config, open the store, bind and serve.
/// Blocks until the server exits.
pub fn run() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("MEDIBOT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config::default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = AppConfig::from_env();
    if !config.has_credential() {
        tracing::warn!("OPENAI_API_KEY is not set; analysis requests will be rejected");
    }
    let bind_addr = config.bind_addr.clone();

    // Built before the runtime starts. The backend client is blocking
    // and must not live its construction on a runtime thread.
    let state = match AppState::new(config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!(error = %e, "failed to initialize application state");
            std::process::exit(1);
        }
    };

    tracing::info!(
        version = config::APP_VERSION,
        "starting {}",
        config::APP_NAME
    );

    let runtime = tokio::runtime::Runtime::new().expect("Failed to create async runtime");
    runtime.block_on(async move {
        let app = api::router::api_router(state);
        let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::error!(error = %e, addr = %bind_addr, "failed to bind");
                std::process::exit(1);
            }
        };
        tracing::info!(addr = %bind_addr, "listening");
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "server error");
            std::process::exit(1);
        }
    });
}

//! Cardia Server
//!
//! HTTP boundary for the explanation pipeline. Exposes a status query and
//! the explain operation, and maps pipeline errors onto status codes.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use cardia_explainer::{Explainer, GeneratorAdapter};
use cardia_llm::OllamaProvider;
use config::ServerConfig;
use handlers::{create_router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed (e.g. by an embedding binary)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Start the HTTP server
///
/// Loads the generation backend once, builds the explainer and serves until
/// the listener fails. A backend that cannot be reached leaves the service
/// running in the not-loaded state.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    init_tracing();

    info!("Starting Cardia explanation service");
    info!("Bind address: {}", config.bind_addr());
    info!(
        "Backend: {} (model {})",
        config.backend.endpoint, config.backend.model
    );

    let backend = &config.backend;
    let provider = OllamaProvider::new(backend.endpoint.clone(), backend.model.clone())
        .with_context_window(backend.num_ctx)
        .with_threads(backend.num_thread)
        .with_timeout(backend.timeout_secs);

    let adapter = GeneratorAdapter::initialize(provider.ready()).await;
    if !adapter.is_ready() {
        warn!("Continuing without a generation backend; explain requests will be rejected");
    }

    let state = AppState {
        explainer: Arc::new(Explainer::new(adapter, config.explainer.clone())),
        backend_endpoint: config.backend.endpoint.clone(),
        request_timeout: config.request_timeout(),
    };

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}

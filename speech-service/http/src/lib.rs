use std::sync::Arc;

use axum::{routing::get, Router};
use speech_application::SynthesizeSpeechCommandHandler;
use speech_configuration::ServerConfig;
use tokio::net::TcpListener;

pub mod error;
pub mod handlers;

pub use error::{error_mapper, HttpError, TTS_FAILED};
pub use handlers::*;

#[derive(Clone)]
pub struct AppState {
    pub command_handler: Arc<SynthesizeSpeechCommandHandler>,
}

impl AppState {
    pub fn new(command_handler: Arc<SynthesizeSpeechCommandHandler>) -> Self {
        Self { command_handler }
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/tts", get(synthesize_speech))
        .with_state(state)
}

pub async fn create_app_routes(state: AppState, config: ServerConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(address = %listener.local_addr()?, "speech http server listening");

    axum::serve(listener, app_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

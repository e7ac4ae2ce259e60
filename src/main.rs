use std::sync::Arc;

use chunk_service::{
    adapters::{router::build_router, state::AppState},
    application::services::RetrievalService,
    domain::config::{
        local::{LocalConfig, Provider},
        retrieval::RetrievalConfig,
        secrets::Secrets,
    },
    services,
};
use tracing_subscriber::EnvFilter;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Crypto provider for the rustls-backed HTTP and S3 clients
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let local_config = LocalConfig::from_env().expect("ERROR: Invalid server configuration");
    let secrets =
        Secrets::from_env(local_config.provider).expect("ERROR: Missing storage credentials");

    tracing::info!(
        "Starting chunk-service with SERVER_ID: {}",
        local_config.server_id
    );

    let backend = services::create_storage_backend(&local_config, &secrets)
        .expect("Failed to create storage backend");
    tracing::info!("Using {} storage backend", backend.provider());
    if local_config.provider == Provider::Local {
        tracing::info!("Serving files from {}", local_config.storage_root.display());
    }

    let retrieval_config = RetrievalConfig::default();
    tracing::info!(
        "Chunk size {} bytes, categories: {:?}",
        retrieval_config.chunk_size(),
        retrieval_config.categories()
    );

    let app_state = AppState {
        server_id: local_config.server_id.clone(),
        retrieval_service: Arc::new(RetrievalService::new(retrieval_config, backend)),
    };

    let router = build_router(app_state, local_config.cors_allowed_origins.as_deref());

    // Start the server
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", local_config.port))
        .await
        .expect("Failed to bind to port");

    tracing::info!("Server listening on 0.0.0.0:{}", local_config.port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");
}

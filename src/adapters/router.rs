use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::adapters::{
    controllers::{file_controller::FileController, health_controller::HealthController},
    state::AppState,
};

/// Permissive CORS when no origins are configured (development only).
pub fn cors_layer(allowed_origins: Option<&[String]>) -> CorsLayer {
    match allowed_origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::permissive(),
    }
}

pub fn build_router(app_state: AppState, allowed_origins: Option<&[String]>) -> Router {
    Router::new()
        .route("/api/v1/health", get(HealthController::health_check))
        .route(
            "/api/v1/files/chunk",
            post(FileController::get_chunk).get(FileController::get_chunk_content),
        )
        .layer(cors_layer(allowed_origins))
        .with_state(app_state)
}

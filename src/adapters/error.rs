use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::application::error::ApplicationError;

/// Client errors share one generic body so callers cannot tell a missing
/// file from a rejected reference.
impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let (status, error_message) = if self.is_client_error() {
            warn!("Rejected chunk request: {}", self);
            (StatusCode::BAD_REQUEST, "Bad request")
        } else {
            error!("Chunk request failed: {}", self);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

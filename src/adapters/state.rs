use axum::extract::FromRef;
use std::sync::Arc;

use crate::application::services::RetrievalService;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub server_id: String,
    pub retrieval_service: Arc<RetrievalService>,
}

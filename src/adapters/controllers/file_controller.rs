use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info_span, warn, Instrument};
use uuid::Uuid;

use crate::{
    adapters::{
        dto::chunk_dto::{ChunkRequestDTO, ChunkResponse},
        state::AppState,
    },
    application::error::ApplicationError,
    domain::models::file::ChunkResult,
};

pub const TOTAL_SIZE_HEADER: HeaderName = HeaderName::from_static("x-total-size");
pub const IS_LAST_CHUNK_HEADER: HeaderName = HeaderName::from_static("x-is-last-chunk");
pub const CHUNK_OFFSET_HEADER: HeaderName = HeaderName::from_static("x-chunk-offset");

pub struct FileController;

impl FileController {
    /// POST /api/v1/files/chunk
    /// Body: {"path": "posts/videos", "file": "clip.mp4", "offset": 0}
    pub async fn get_chunk(
        State(app_state): State<AppState>,
        payload: Result<Json<ChunkRequestDTO>, JsonRejection>,
    ) -> Result<Json<ChunkResponse>, ApplicationError> {
        let Json(body) = payload.map_err(|e| {
            warn!("Invalid chunk request body: {}", e);
            ApplicationError::BadRequest("Invalid request format".to_string())
        })?;

        let (_, chunk) = Self::fetch(&app_state, &body).await?;
        Ok(Json(ChunkResponse::from(chunk)))
    }

    /// GET /api/v1/files/chunk?path=posts/videos&file=clip.mp4&offset=0
    /// Raw chunk bytes; size and end-of-file travel in headers.
    pub async fn get_chunk_content(
        State(app_state): State<AppState>,
        query: Result<Query<ChunkRequestDTO>, QueryRejection>,
    ) -> Result<Response, ApplicationError> {
        let Query(params) = query.map_err(|e| {
            warn!("Invalid chunk request query: {}", e);
            ApplicationError::BadRequest("Invalid request format".to_string())
        })?;

        let (offset, chunk) = Self::fetch(&app_state, &params).await?;

        let headers = [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (TOTAL_SIZE_HEADER, chunk.total_size.to_string()),
            (IS_LAST_CHUNK_HEADER, chunk.is_last_chunk.to_string()),
            (CHUNK_OFFSET_HEADER, offset.to_string()),
        ];

        Ok((StatusCode::OK, headers, chunk.bytes).into_response())
    }

    async fn fetch(
        app_state: &AppState,
        request: &ChunkRequestDTO,
    ) -> Result<(u64, ChunkResult), ApplicationError> {
        let offset = request.offset()?;
        let span = info_span!("chunk_request", request_id = %Uuid::new_v4(), offset);

        let chunk = app_state
            .retrieval_service
            .fetch_chunk(request.path.as_deref(), request.file.as_deref(), offset)
            .instrument(span)
            .await?;

        Ok((offset, chunk))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum_test::TestServer;
    use serde_json::{json, Value};

    use super::*;
    use crate::{
        adapters::router::build_router,
        application::services::RetrievalService,
        domain::config::retrieval::RetrievalConfig,
        services::InMemoryStorageBackend,
    };

    fn test_server(backend: InMemoryStorageBackend) -> TestServer {
        let app_state = AppState {
            server_id: "test-server".to_string(),
            retrieval_service: Arc::new(RetrievalService::new(
                RetrievalConfig::default(),
                Arc::new(backend),
            )),
        };
        TestServer::new(build_router(app_state, None)).unwrap()
    }

    fn video() -> Vec<u8> {
        (0..1_000_000u32).map(|i| (i % 199) as u8).collect()
    }

    fn generic_bad_request() -> Value {
        json!({ "status": 400, "error": "Bad request" })
    }

    #[tokio::test]
    async fn serves_both_chunks_of_a_video() {
        let data = video();
        let server = test_server(
            InMemoryStorageBackend::new().with_object("posts/videos/clip.mp4", data.clone()),
        );

        let response = server
            .post("/api/v1/files/chunk")
            .json(&json!({ "path": "posts/videos", "file": "clip.mp4" }))
            .await;
        response.assert_status_ok();
        let first: ChunkResponse = response.json();
        assert_eq!(first.status, 200);
        assert_eq!(first.buffer.len(), 524_288);
        assert_eq!(first.total_size, 1_000_000);
        assert!(!first.is_last_chunk);

        let response = server
            .post("/api/v1/files/chunk")
            .json(&json!({ "path": "posts/videos", "file": "clip.mp4", "offset": 524_288 }))
            .await;
        response.assert_status_ok();
        let second: ChunkResponse = response.json();
        assert_eq!(second.buffer.len(), 475_712);
        assert!(second.is_last_chunk);

        let mut reassembled = first.buffer;
        reassembled.extend(second.buffer);
        assert_eq!(reassembled, data);
    }

    #[tokio::test]
    async fn client_errors_share_one_generic_response() {
        let server = test_server(
            InMemoryStorageBackend::new()
                .with_object("posts/videos/clip.mp4", vec![0; 100])
                .with_object("unknown/category/a.mp4", vec![0; 100]),
        );

        let bodies = [
            json!({ "path": "posts/videos", "file": "../../etc/passwd" }),
            json!({ "path": "unknown/category", "file": "a.mp4" }),
            json!({ "path": "posts/videos", "file": "a,b.mp4" }),
            json!({ "path": "posts/videos" }),
            json!({ "file": "clip.mp4" }),
            json!({ "path": "posts/videos", "file": "missing.mp4" }),
            json!({ "path": "posts/videos", "file": "clip.mp4", "offset": 101 }),
            json!({ "path": "posts/videos", "file": "clip.mp4", "offset": -1 }),
            json!({ "path": "posts/videos", "file": "clip.mp4", "offset": "ten" }),
        ];

        for body in bodies {
            let response = server.post("/api/v1/files/chunk").json(&body).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_json(&generic_bad_request());
        }
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let server = test_server(InMemoryStorageBackend::new());

        let response = server
            .post("/api/v1/files/chunk")
            .text("{not json")
            .content_type("application/json")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&generic_bad_request());
    }

    #[tokio::test]
    async fn offset_at_end_returns_empty_final_chunk() {
        let server = test_server(
            InMemoryStorageBackend::new().with_object("comments/files/a.txt", vec![1; 10]),
        );

        let response = server
            .post("/api/v1/files/chunk")
            .json(&json!({ "path": "comments/files", "file": "a.txt", "offset": 10 }))
            .await;
        response.assert_status_ok();
        let chunk: ChunkResponse = response.json();
        assert!(chunk.buffer.is_empty());
        assert_eq!(chunk.total_size, 10);
        assert!(chunk.is_last_chunk);
    }

    #[tokio::test]
    async fn storage_failure_is_a_server_error() {
        let server = test_server(
            InMemoryStorageBackend::new()
                .with_object("posts/files/a.pdf", vec![1; 10])
                .failing_reads(),
        );

        let response = server
            .post("/api/v1/files/chunk")
            .json(&json!({ "path": "posts/files", "file": "a.pdf" }))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({ "status": 500, "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn raw_endpoint_returns_bytes_and_headers() {
        let data: Vec<u8> = (0..600_000u32).map(|i| (i % 13) as u8).collect();
        let server = test_server(
            InMemoryStorageBackend::new().with_object("posts/files/report.pdf", data.clone()),
        );

        let response = server
            .get("/api/v1/files/chunk")
            .add_query_param("path", "posts/files")
            .add_query_param("file", "report.pdf")
            .add_query_param("offset", 524_288)
            .await;
        response.assert_status_ok();
        assert_eq!(response.header("x-total-size"), "600000");
        assert_eq!(response.header("x-is-last-chunk"), "true");
        assert_eq!(response.header("x-chunk-offset"), "524288");
        assert_eq!(response.header("content-type"), "application/octet-stream");
        assert_eq!(response.as_bytes().as_ref(), &data[524_288..]);
    }

    #[tokio::test]
    async fn raw_endpoint_rejects_traversal() {
        let server = test_server(
            InMemoryStorageBackend::new().with_object("posts/files/report.pdf", vec![1; 10]),
        );

        let response = server
            .get("/api/v1/files/chunk")
            .add_query_param("path", "posts/files")
            .add_query_param("file", "../files/report.pdf")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .get("/api/v1/files/chunk")
            .add_query_param("path", "posts/files")
            .add_query_param("file", "report.pdf")
            .add_query_param("offset", "abc")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

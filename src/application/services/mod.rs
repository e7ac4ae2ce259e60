mod chunk_resolver;
mod download_cursor;
mod reference_validator;
mod retrieval_service;
mod storage_backend;

pub use chunk_resolver::{ChunkRange, ChunkResolver};
pub use download_cursor::DownloadCursor;
pub use reference_validator::{
    check_segment, ReferenceField, ReferenceValidator, RESERVED_DELIMITER,
};
pub use retrieval_service::RetrievalService;
pub use storage_backend::StorageBackend;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Invalid file reference: {0}")]
    InvalidReference(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Offset {offset} is past the end of a {total_size} byte file")]
    InvalidOffset { offset: u64, total_size: u64 },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ApplicationError {
    /// True when the request itself was at fault rather than the storage layer.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ApplicationError::StorageUnavailable(_))
    }
}

use serde::{Deserialize, Serialize};

use crate::{application::error::ApplicationError, domain::models::file::ChunkResult};

/// Chunk request as sent by clients, either as a JSON body or a query string.
#[derive(Debug, Deserialize)]
pub struct ChunkRequestDTO {
    pub path: Option<String>,
    pub file: Option<String>,
    pub offset: Option<i64>,
}

impl ChunkRequestDTO {
    /// Missing offset means the start of the file.
    pub fn offset(&self) -> Result<u64, ApplicationError> {
        match self.offset {
            None => Ok(0),
            Some(offset) => u64::try_from(offset)
                .map_err(|_| ApplicationError::BadRequest(format!("negative offset {}", offset))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChunkResponse {
    pub status: u16,
    pub buffer: Vec<u8>,
    pub total_size: u64,
    pub is_last_chunk: bool,
}

impl From<ChunkResult> for ChunkResponse {
    fn from(chunk: ChunkResult) -> Self {
        Self {
            status: 200,
            buffer: chunk.bytes.to_vec(),
            total_size: chunk.total_size,
            is_last_chunk: chunk.is_last_chunk,
        }
    }
}

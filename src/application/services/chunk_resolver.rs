use std::{num::NonZeroU64, sync::Arc};

use tracing::{debug, error, warn};

use crate::{
    application::{error::ApplicationError, services::StorageBackend},
    domain::models::file::{ChunkRequest, ChunkResult, FileReference},
};

/// Byte range to read for one chunk request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    pub offset: u64,
    pub length: u64,
    pub is_last_chunk: bool,
}

impl ChunkRange {
    /// Fails when the offset is past the end of the file. An offset equal
    /// to the size yields an empty, final range.
    pub fn compute(request: ChunkRequest, total_size: u64) -> Result<Self, ApplicationError> {
        if request.offset > total_size {
            return Err(ApplicationError::InvalidOffset {
                offset: request.offset,
                total_size,
            });
        }

        let length = request.chunk_size.min(total_size - request.offset);

        Ok(Self {
            offset: request.offset,
            length,
            is_last_chunk: request.offset + length >= total_size,
        })
    }

    pub fn end(&self) -> u64 {
        self.offset + self.length
    }
}

pub struct ChunkResolver {
    backend: Arc<dyn StorageBackend>,
    chunk_size: NonZeroU64,
}

impl ChunkResolver {
    pub fn new(backend: Arc<dyn StorageBackend>, chunk_size: NonZeroU64) -> Self {
        Self {
            backend,
            chunk_size,
        }
    }

    pub fn provider(&self) -> &'static str {
        self.backend.provider()
    }

    pub async fn resolve(
        &self,
        reference: &FileReference,
        offset: u64,
    ) -> Result<ChunkResult, ApplicationError> {
        let key = reference.storage_key();

        let total_size = self.backend.size(&key).await?;

        let request = ChunkRequest {
            offset,
            chunk_size: self.chunk_size.get(),
        };
        let range = ChunkRange::compute(request, total_size).inspect_err(|_| {
            warn!(
                "Offset {} out of range for {:?} ({} bytes)",
                offset, key, total_size
            );
        })?;

        let bytes = self
            .backend
            .read_range(&key, range.offset, range.length)
            .await?;

        if bytes.len() as u64 != range.length {
            error!(
                "Backend {} returned {} bytes for {:?} range {}..{}",
                self.backend.provider(),
                bytes.len(),
                key,
                range.offset,
                range.end()
            );
            return Err(ApplicationError::StorageUnavailable(format!(
                "short read on {}: expected {} bytes, got {}",
                key,
                range.length,
                bytes.len()
            )));
        }

        debug!(
            category = reference.category(),
            name = reference.name(),
            "Served bytes {}..{} of {} (last: {})",
            range.offset,
            range.end(),
            total_size,
            range.is_last_chunk
        );

        Ok(ChunkResult {
            bytes,
            total_size,
            is_last_chunk: range.is_last_chunk,
        })
    }
}

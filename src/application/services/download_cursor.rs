use crate::{
    application::{error::ApplicationError, services::RetrievalService},
    domain::models::file::ChunkResult,
};

/// Streams a whole file through repeated stateless chunk requests.
///
/// The cursor only remembers the next offset to ask for; every call is an
/// ordinary `fetch_chunk`.
pub struct DownloadCursor<'a> {
    service: &'a RetrievalService,
    category: String,
    name: String,
    next_offset: u64,
    finished: bool,
}

impl<'a> DownloadCursor<'a> {
    pub fn new(service: &'a RetrievalService, category: &str, name: &str) -> Self {
        Self {
            service,
            category: category.to_string(),
            name: name.to_string(),
            next_offset: 0,
            finished: false,
        }
    }

    pub fn next_offset(&self) -> u64 {
        self.next_offset
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns `None` once the final chunk has been handed out.
    pub async fn next_chunk(&mut self) -> Result<Option<ChunkResult>, ApplicationError> {
        if self.finished {
            return Ok(None);
        }

        let chunk = self
            .service
            .fetch_chunk(
                Some(self.category.as_str()),
                Some(self.name.as_str()),
                self.next_offset,
            )
            .await?;

        self.next_offset += chunk.len();
        self.finished = chunk.is_last_chunk;
        Ok(Some(chunk))
    }

    pub async fn read_to_end(mut self) -> Result<Vec<u8>, ApplicationError> {
        // Sized by the bytes received, not the reported total.
        let mut content = Vec::new();
        while let Some(chunk) = self.next_chunk().await? {
            content.extend_from_slice(&chunk.bytes);
        }
        Ok(content)
    }
}

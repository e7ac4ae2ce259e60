use std::sync::Arc;

use crate::{
    application::{
        error::ApplicationError,
        services::{ChunkResolver, DownloadCursor, ReferenceValidator, StorageBackend},
    },
    domain::{config::retrieval::RetrievalConfig, models::file::ChunkResult},
};

/// Validates a file reference, then reads one chunk of it.
///
/// Holds no per-request state, so one instance is shared by every handler.
pub struct RetrievalService {
    config: RetrievalConfig,
    validator: ReferenceValidator,
    resolver: ChunkResolver,
}

impl RetrievalService {
    pub fn new(config: RetrievalConfig, backend: Arc<dyn StorageBackend>) -> Self {
        let validator = ReferenceValidator::new(config.categories().clone());
        Self {
            resolver: ChunkResolver::new(backend, config.chunk_size()),
            validator,
            config,
        }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub fn provider(&self) -> &'static str {
        self.resolver.provider()
    }

    pub async fn fetch_chunk(
        &self,
        category: Option<&str>,
        name: Option<&str>,
        offset: u64,
    ) -> Result<ChunkResult, ApplicationError> {
        let reference = self.validator.validate(category, name)?;
        self.resolver.resolve(&reference, offset).await
    }

    pub fn cursor(&self, category: &str, name: &str) -> DownloadCursor<'_> {
        DownloadCursor::new(self, category, name)
    }
}

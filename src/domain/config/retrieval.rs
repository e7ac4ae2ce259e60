use std::{collections::BTreeSet, num::NonZeroU64};

/// Bytes returned per chunk request: 512 KiB.
pub const DEFAULT_CHUNK_SIZE: NonZeroU64 = match NonZeroU64::new(512 * 1024) {
    Some(size) => size,
    None => panic!("chunk size must be non-zero"),
};

/// Storage categories clients may read from. Extending this list requires a redeploy.
pub const DEFAULT_CATEGORIES: [&str; 3] = ["posts/videos", "posts/files", "comments/files"];

/// Immutable settings for the retrieval service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalConfig {
    categories: BTreeSet<String>,
    chunk_size: NonZeroU64,
}

impl RetrievalConfig {
    pub fn new<I, S>(categories: I, chunk_size: NonZeroU64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            chunk_size,
        }
    }

    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    pub fn chunk_size(&self) -> NonZeroU64 {
        self.chunk_size
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORIES, DEFAULT_CHUNK_SIZE)
    }
}

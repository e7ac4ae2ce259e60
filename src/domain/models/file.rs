use bytes::Bytes;

/// Separator used to join a category and a file name into a storage key.
pub const STORAGE_KEY_SEPARATOR: char = '/';

/// A category/name pair that has passed reference validation.
///
/// Only the reference validator builds these, so holding one means both
/// fields are safe to turn into a storage key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
    category: String,
    name: String,
}

impl FileReference {
    pub(crate) fn new(category: &str, name: &str) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn storage_key(&self) -> String {
        format!("{}{}{}", self.category, STORAGE_KEY_SEPARATOR, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRequest {
    pub offset: u64,
    pub chunk_size: u64,
}

/// One segment of a stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkResult {
    pub bytes: Bytes,
    pub total_size: u64,
    pub is_last_chunk: bool,
}

impl ChunkResult {
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

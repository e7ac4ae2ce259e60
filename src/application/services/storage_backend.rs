use async_trait::async_trait;
use bytes::Bytes;

use crate::application::error::ApplicationError;

/// Read-only access to an addressable byte store.
///
/// Keys are `category/name` strings built from a validated reference.
/// Implementations must report a missing object as
/// [`ApplicationError::NotFound`] and every other failure as
/// [`ApplicationError::StorageUnavailable`]. A handle acquired inside a call
/// must not outlive that call.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn provider(&self) -> &'static str;

    async fn size(&self, key: &str) -> Result<u64, ApplicationError>;

    /// Returns bytes `[offset, offset + length)` of the object.
    async fn read_range(
        &self,
        key: &str,
        offset: u64,
        length: u64,
    ) -> Result<Bytes, ApplicationError>;
}

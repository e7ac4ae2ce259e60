use std::{
    io::SeekFrom,
    path::{Component, Path, PathBuf},
};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::{
    fs::{self, File},
    io::{AsyncReadExt, AsyncSeekExt},
};
use tracing::warn;

use crate::{
    application::{error::ApplicationError, services::StorageBackend},
    services::error::StorageError,
};

/// Serves objects from a directory tree on local disk.
///
/// Every resolved path must stay under the root after symlinks are
/// followed. File handles live only for the duration of one call.
pub struct LocalStorageBackend {
    root: PathBuf,
}

impl LocalStorageBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key);
        if key.is_empty()
            || relative
                .components()
                .any(|component| !matches!(component, Component::Normal(_)))
        {
            warn!("Refusing non-relative storage key {:?}", key);
            return Err(StorageError::NotFound(key.to_string()));
        }

        let root = fs::canonicalize(&self.root).await.map_err(|e| {
            StorageError::Io(format!(
                "storage root {} is unavailable: {}",
                self.root.display(),
                e
            ))
        })?;
        let path = fs::canonicalize(root.join(relative))
            .await
            .map_err(|e| not_found_or_io(key, e))?;

        if !path.starts_with(&root) {
            warn!("Storage key {:?} resolves outside the storage root", key);
            return Err(StorageError::NotFound(key.to_string()));
        }

        Ok(path)
    }
}

fn not_found_or_io(key: &str, error: std::io::Error) -> StorageError {
    match StorageError::from(error) {
        StorageError::NotFound(_) => StorageError::NotFound(key.to_string()),
        other => other,
    }
}

#[async_trait]
impl StorageBackend for LocalStorageBackend {
    fn provider(&self) -> &'static str {
        "local"
    }

    async fn size(&self, key: &str) -> Result<u64, ApplicationError> {
        let path = self.resolve(key).await?;
        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| not_found_or_io(key, e))?;

        if !metadata.is_file() {
            return Err(StorageError::NotFound(key.to_string()).into());
        }

        Ok(metadata.len())
    }

    async fn read_range(
        &self,
        key: &str,
        offset: u64,
        length: u64,
    ) -> Result<Bytes, ApplicationError> {
        if length == 0 {
            return Ok(Bytes::new());
        }

        let path = self.resolve(key).await?;
        let mut file = File::open(&path)
            .await
            .map_err(|e| not_found_or_io(key, e))?;

        file.seek(SeekFrom::Start(offset))
            .await
            .map_err(StorageError::from)?;

        let mut buffer = Vec::with_capacity(length as usize);
        file.take(length)
            .read_to_end(&mut buffer)
            .await
            .map_err(StorageError::from)?;

        Ok(Bytes::from(buffer))
    }
}

use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    application::{error::ApplicationError, services::StorageBackend},
    services::error::StorageError,
};

/// Fixed set of objects held in memory, with call counters for assertions.
#[derive(Default)]
pub struct InMemoryStorageBackend {
    objects: HashMap<String, Bytes>,
    fail_reads: bool,
    truncate_reads: bool,
    size_calls: AtomicUsize,
    read_calls: AtomicUsize,
}

impl InMemoryStorageBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, key: &str, data: impl Into<Bytes>) -> Self {
        self.objects.insert(key.to_string(), data.into());
        self
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Range reads return one byte less than requested.
    pub fn truncating_reads(mut self) -> Self {
        self.truncate_reads = true;
        self
    }

    pub fn size_calls(&self) -> usize {
        self.size_calls.load(Ordering::SeqCst)
    }

    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    fn object(&self, key: &str) -> Result<&Bytes, StorageError> {
        self.objects
            .get(key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorageBackend {
    fn provider(&self) -> &'static str {
        "memory"
    }

    async fn size(&self, key: &str) -> Result<u64, ApplicationError> {
        self.size_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.object(key)?.len() as u64)
    }

    async fn read_range(
        &self,
        key: &str,
        offset: u64,
        length: u64,
    ) -> Result<Bytes, ApplicationError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(StorageError::Io("simulated read failure".to_string()).into());
        }

        let object = self.object(key)?;
        let start = offset as usize;
        let mut end = (offset + length) as usize;
        if end > object.len() {
            return Err(StorageError::Io(format!("range past end of {}", key)).into());
        }
        if self.truncate_reads && end > start {
            end -= 1;
        }
        Ok(object.slice(start..end))
    }
}

mod error;
mod local_storage;
#[cfg(test)]
mod memory_storage;
mod s3_storage;
mod supabase_storage;

pub use error::StorageError;
pub use local_storage::LocalStorageBackend;
#[cfg(test)]
pub use memory_storage::InMemoryStorageBackend;
pub use s3_storage::S3StorageBackend;
pub use supabase_storage::SupabaseStorageBackend;

use std::sync::Arc;

use crate::{
    application::services::StorageBackend,
    domain::config::{
        local::{LocalConfig, Provider},
        secrets::Secrets,
    },
};

pub fn create_storage_backend(
    config: &LocalConfig,
    secrets: &Secrets,
) -> Result<Arc<dyn StorageBackend>, StorageError> {
    match config.provider {
        Provider::Local => Ok(Arc::new(LocalStorageBackend::new(&config.storage_root))),
        Provider::Supabase => {
            let supabase_secrets = secrets.supabase_secrets.as_ref().ok_or_else(|| {
                StorageError::InvalidCredentials("Supabase secrets not found".to_string())
            })?;

            Ok(Arc::new(SupabaseStorageBackend::new(
                supabase_secrets.clone(),
            )?))
        }
        Provider::S3 => {
            let s3_secrets = secrets.s3_secrets.as_ref().ok_or_else(|| {
                StorageError::InvalidCredentials("S3 secrets not found".to_string())
            })?;

            Ok(Arc::new(S3StorageBackend::new(s3_secrets.clone())))
        }
    }
}

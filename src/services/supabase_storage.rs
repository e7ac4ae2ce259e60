use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Client, RequestBuilder, StatusCode, Url};

use crate::{
    application::{error::ApplicationError, services::StorageBackend},
    domain::config::secrets::SupabaseSecrets,
    services::error::StorageError,
};

pub struct SupabaseStorageBackend {
    client: Client,
    storage_url: Url,
    api_key: String,
    bucket_name: String,
}

impl SupabaseStorageBackend {
    pub fn new(secrets: SupabaseSecrets) -> Result<Self, StorageError> {
        let storage_url = Url::parse(&secrets.storage_url).map_err(|e| {
            StorageError::InvalidCredentials(format!("Invalid Supabase storage URL: {}", e))
        })?;
        if storage_url.cannot_be_a_base() {
            return Err(StorageError::InvalidCredentials(format!(
                "Supabase storage URL {} cannot carry object paths",
                storage_url
            )));
        }

        Ok(Self {
            client: Client::new(),
            storage_url,
            api_key: secrets.api_key,
            bucket_name: secrets.bucket_name,
        })
    }

    /// Each key segment is percent-encoded on its own, so no part of a key
    /// can add segments, a query or a fragment to the request.
    fn object_url(&self, key: &str) -> Result<Url, StorageError> {
        let mut url = self.storage_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                StorageError::InternalError(format!("Cannot build object URL for {}", key))
            })?
            .pop_if_empty()
            .push("object")
            .push(&self.bucket_name)
            .extend(key.split('/'));
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("apikey", &self.api_key)
    }
}

/// Inclusive HTTP range header value for `[offset, offset + length)`.
fn range_header(offset: u64, length: u64) -> String {
    format!("bytes={}-{}", offset, offset + length - 1)
}

#[async_trait]
impl StorageBackend for SupabaseStorageBackend {
    fn provider(&self) -> &'static str {
        "supabase"
    }

    async fn size(&self, key: &str) -> Result<u64, ApplicationError> {
        let response = self
            .authorized(self.client.head(self.object_url(key)?))
            .send()
            .await
            .map_err(StorageError::from)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(key.to_string()).into());
        }

        if !response.status().is_success() {
            return Err(StorageError::ProviderError(format!(
                "Size query failed with status: {}",
                response.status()
            ))
            .into());
        }

        let content_length = response
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or_else(|| {
                StorageError::ProviderError(format!("No content length reported for {}", key))
            })?;

        Ok(content_length)
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

        let response = self
            .authorized(self.client.get(self.object_url(key)?))
            .header(header::RANGE, range_header(offset, length))
            .send()
            .await
            .map_err(StorageError::from)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(key.to_string()).into());
        }

        if !status.is_success() {
            return Err(StorageError::ProviderError(format!(
                "Range read failed with status: {}",
                status
            ))
            .into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::NetworkError(e.to_string()))?;

        if status == StatusCode::PARTIAL_CONTENT {
            return Ok(bytes);
        }

        // Range ignored: the whole object came back.
        Ok(slice_full_body(key, bytes, offset, length)?)
    }
}

fn slice_full_body(
    key: &str,
    body: Bytes,
    offset: u64,
    length: u64,
) -> Result<Bytes, StorageError> {
    let end = offset
        .checked_add(length)
        .and_then(|end| usize::try_from(end).ok())
        .ok_or_else(|| {
            StorageError::ProviderError(format!(
                "{} bytes at offset {} of {} do not fit in memory",
                length, offset, key
            ))
        })?;
    // offset <= end, so it fits too.
    let start = usize::try_from(offset).unwrap_or(end);

    if body.len() < end {
        return Err(StorageError::ProviderError(format!(
            "Object {} shorter than requested range",
            key
        )));
    }
    Ok(body.slice(start..end))
}

use async_trait::async_trait;
use aws_sdk_s3::{
    config::{BehaviorVersion, Credentials, Region},
    error::{DisplayErrorContext, SdkError},
    operation::{get_object::GetObjectError, head_object::HeadObjectError},
    Client,
};
use bytes::Bytes;

use crate::{
    application::{error::ApplicationError, services::StorageBackend},
    domain::config::secrets::S3Secrets,
    services::error::StorageError,
};

/// Reads objects from an S3-compatible bucket.
pub struct S3StorageBackend {
    client: Client,
    bucket_name: String,
}

impl S3StorageBackend {
    pub fn new(secrets: S3Secrets) -> Self {
        let credentials = Credentials::new(
            secrets.access_key_id,
            secrets.secret_access_key,
            None,
            None,
            "chunk-service",
        );

        let mut config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(secrets.region))
            .credentials_provider(credentials)
            .force_path_style(true);

        if let Some(endpoint) = secrets.endpoint {
            config = config.endpoint_url(endpoint);
        }

        Self {
            client: Client::from_conf(config.build()),
            bucket_name: secrets.bucket_name,
        }
    }
}

fn head_error(key: &str, error: SdkError<HeadObjectError>) -> StorageError {
    if error
        .as_service_error()
        .is_some_and(HeadObjectError::is_not_found)
    {
        return StorageError::NotFound(key.to_string());
    }
    sdk_error(error)
}

fn get_error(key: &str, error: SdkError<GetObjectError>) -> StorageError {
    if error
        .as_service_error()
        .is_some_and(GetObjectError::is_no_such_key)
    {
        return StorageError::NotFound(key.to_string());
    }
    sdk_error(error)
}

fn sdk_error<E>(error: SdkError<E>) -> StorageError
where
    E: std::error::Error + Send + Sync + 'static,
{
    let message = DisplayErrorContext(&error).to_string();
    match error {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => {
            StorageError::NetworkError(message)
        }
        SdkError::ConstructionFailure(_) => StorageError::InternalError(message),
        _ => StorageError::ProviderError(message),
    }
}

#[async_trait]
impl StorageBackend for S3StorageBackend {
    fn provider(&self) -> &'static str {
        "s3"
    }

    async fn size(&self, key: &str) -> Result<u64, ApplicationError> {
        let output = self
            .client
            .head_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await
            .map_err(|e| head_error(key, e))?;

        let content_length = output.content_length().ok_or_else(|| {
            StorageError::ProviderError(format!("No content length reported for {}", key))
        })?;

        u64::try_from(content_length).map_err(|_| {
            StorageError::ProviderError(format!(
                "Negative content length {} for {}",
                content_length, key
            ))
            .into()
        })
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

        let output = self
            .client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .range(format!("bytes={}-{}", offset, offset + length - 1))
            .send()
            .await
            .map_err(|e| get_error(key, e))?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::NetworkError(e.to_string()))?;

        Ok(data.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_s3::types::error::{InvalidObjectState, NoSuchKey, NotFound};
    use aws_smithy_runtime_api::http::{Response, StatusCode};
    use aws_smithy_types::body::SdkBody;

    use super::*;

    fn raw_response(status: u16) -> Response {
        Response::new(StatusCode::try_from(status).unwrap(), SdkBody::empty())
    }

    #[test]
    fn missing_objects_map_to_not_found() {
        let head: SdkError<HeadObjectError> = SdkError::service_error(
            HeadObjectError::NotFound(NotFound::builder().build()),
            raw_response(404),
        );
        assert!(matches!(
            head_error("posts/videos/clip.mp4", head),
            StorageError::NotFound(ref key) if key == "posts/videos/clip.mp4"
        ));

        let get: SdkError<GetObjectError> = SdkError::service_error(
            GetObjectError::NoSuchKey(NoSuchKey::builder().build()),
            raw_response(404),
        );
        assert!(matches!(
            get_error("posts/files/a.pdf", get),
            StorageError::NotFound(ref key) if key == "posts/files/a.pdf"
        ));
    }

    #[test]
    fn transport_failures_map_to_network_errors() {
        let head: SdkError<HeadObjectError> = SdkError::timeout_error("request timed out");
        assert!(matches!(
            head_error("posts/videos/clip.mp4", head),
            StorageError::NetworkError(_)
        ));

        let get: SdkError<GetObjectError> = SdkError::timeout_error("request timed out");
        assert!(matches!(
            get_error("posts/videos/clip.mp4", get),
            StorageError::NetworkError(_)
        ));
    }

    #[test]
    fn construction_failures_map_to_internal_errors() {
        let get: SdkError<GetObjectError> = SdkError::construction_failure("bad request input");
        assert!(matches!(
            get_error("posts/videos/clip.mp4", get),
            StorageError::InternalError(_)
        ));
    }

    #[test]
    fn other_service_errors_are_storage_failures() {
        let get: SdkError<GetObjectError> = SdkError::service_error(
            GetObjectError::InvalidObjectState(InvalidObjectState::builder().build()),
            raw_response(403),
        );
        let err = get_error("posts/videos/clip.mp4", get);
        assert!(matches!(err, StorageError::ProviderError(_)));
        assert!(matches!(
            ApplicationError::from(err),
            ApplicationError::StorageUnavailable(_)
        ));
    }
}

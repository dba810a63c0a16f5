// service/storage.rs
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to store object {key}: {message}")]
    Put { key: String, message: String },

    #[error("failed to presign object {key}: {message}")]
    Presign { key: String, message: String },

    #[error("failed to delete object {key}: {message}")]
    Delete { key: String, message: String },
}

/// Narrow object-storage port. The rest of the system stores only keys and
/// resolves display URLs lazily through `temporary_url`.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;

    async fn temporary_url(&self, key: &str, ttl_secs: u64) -> Result<String, StorageError>;

    async fn delete(&self, key: &str) -> Result<bool, StorageError>;
}

pub struct S3ObjectStorage {
    bucket: String,
    client: aws_sdk_s3::Client,
}

impl S3ObjectStorage {
    pub fn new(bucket: String, aws_config: &aws_config::SdkConfig) -> Self {
        Self {
            bucket,
            client: aws_sdk_s3::Client::new(aws_config),
        }
    }
}

impl std::fmt::Debug for S3ObjectStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3ObjectStorage")
            .field("bucket", &self.bucket)
            .finish()
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|error| StorageError::Put {
                key: key.to_string(),
                message: error.to_string(),
            })?;

        Ok(key.to_string())
    }

    async fn temporary_url(&self, key: &str, ttl_secs: u64) -> Result<String, StorageError> {
        let presigning = PresigningConfig::expires_in(Duration::from_secs(ttl_secs))
            .map_err(|error| StorageError::Presign {
                key: key.to_string(),
                message: error.to_string(),
            })?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|error| StorageError::Presign {
                key: key.to_string(),
                message: error.to_string(),
            })?;

        Ok(presigned.uri().to_string())
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|error| StorageError::Delete {
                key: key.to_string(),
                message: error.to_string(),
            })?;

        Ok(true)
    }
}

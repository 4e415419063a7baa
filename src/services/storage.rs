use std::path::Path;

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, Region};
use tokio::io::AsyncWriteExt;

/// Contract the pipeline holds against object storage: download a source
/// object to a local file, upload a derived artifact from one.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn fetch(&self, bucket: &str, key: &str, dest: &Path) -> Result<(), StorageError>;

    async fn publish(
        &self,
        bucket: &str,
        key: &str,
        src: &Path,
        content_type: &str,
    ) -> Result<(), StorageError>;
}

/// Client for S3-compatible object storage.
///
/// Jobs address storage by bucket name, so the client holds region and
/// credentials and opens bucket handles on demand.
pub struct S3Storage {
    region: Region,
    credentials: Credentials,
}

impl S3Storage {
    pub fn new(
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
    ) -> Result<Self, StorageError> {
        let region = Region::Custom {
            region: region.to_string(),
            endpoint: endpoint.to_string(),
        };

        let credentials = Credentials::new(Some(access_key), Some(secret_key), None, None, None)
            .map_err(|e| StorageError::Config(e.to_string()))?;

        Ok(Self {
            region,
            credentials,
        })
    }

    fn bucket(&self, name: &str) -> Result<Box<Bucket>, StorageError> {
        Bucket::new(name, self.region.clone(), self.credentials.clone())
            .map_err(|e| StorageError::Config(e.to_string()))
    }
}

#[async_trait]
impl BlobStore for S3Storage {
    /// Stream an object into the file at `dest`.
    async fn fetch(&self, bucket: &str, key: &str, dest: &Path) -> Result<(), StorageError> {
        let bucket = self.bucket(bucket)?;
        let mut file = tokio::fs::File::create(dest).await?;

        bucket
            .get_object_to_writer(key, &mut file)
            .await
            .map_err(|e| match e {
                S3Error::HttpFailWithBody(404, _) => StorageError::NotFound,
                other => StorageError::S3(other),
            })?;

        file.flush().await?;
        Ok(())
    }

    /// Stream the file at `src` up under `key`.
    async fn publish(
        &self,
        bucket: &str,
        key: &str,
        src: &Path,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let bucket = self.bucket(bucket)?;
        let mut file = tokio::fs::File::open(src).await?;

        bucket
            .put_object_stream_with_content_type(&mut file, key, content_type)
            .await
            .map_err(StorageError::S3)?;

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("object not found")]
    NotFound,

    #[error("S3 operation failed: {0}")]
    S3(#[from] s3::error::S3Error),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage configuration error: {0}")]
    Config(String),
}

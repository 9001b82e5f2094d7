//! Object storage behind a trait so upload/delete flows stay testable
//! without a running MinIO.
//!
//! `AppState` holds an `Arc<dyn BlobStore>`; production wires `S3BlobStore`,
//! tests wire the in-memory double.

use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

use crate::config::Config;
use crate::errors::AppError;

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under `key`, overwriting any existing object.
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), AppError>;

    /// Removes the object under `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), AppError>;
}

/// S3-compatible store, pointed at MinIO locally or AWS in production.
pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3BlobStore {
    pub async fn from_config(config: &Config) -> Self {
        let credentials = Credentials::new(
            &config.aws_access_key_id,
            &config.aws_secret_access_key,
            None,
            None,
            "joblin-static",
        );

        let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(credentials)
            .endpoint_url(&config.s3_endpoint)
            .load()
            .await;

        Self {
            client: aws_sdk_s3::Client::new(&s3_config),
            bucket: config.s3_bucket.clone(),
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("upload of {key} failed: {e}")))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("delete of {key} failed: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Mutex-guarded map standing in for S3 in tests.
    #[derive(Default)]
    pub struct MemoryBlobStore {
        blobs: Mutex<HashMap<String, (Bytes, String)>>,
    }

    impl MemoryBlobStore {
        pub fn contains(&self, key: &str) -> bool {
            self.blobs.lock().unwrap().contains_key(key)
        }

        pub fn len(&self) -> usize {
            self.blobs.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl BlobStore for MemoryBlobStore {
        async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), AppError> {
            self.blobs
                .lock()
                .unwrap()
                .insert(key.to_string(), (bytes, content_type.to_string()));
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<(), AppError> {
            self.blobs.lock().unwrap().remove(key);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryBlobStore;
    use super::*;

    #[tokio::test]
    async fn test_memory_store_put_then_remove() {
        let store = MemoryBlobStore::default();
        store
            .put("u1/resume.pdf", Bytes::from_static(b"%PDF"), "application/pdf")
            .await
            .unwrap();
        assert!(store.contains("u1/resume.pdf"));

        store.remove("u1/resume.pdf").await.unwrap();
        assert!(!store.contains("u1/resume.pdf"));
    }

    #[tokio::test]
    async fn test_memory_store_remove_missing_key_is_ok() {
        let store = MemoryBlobStore::default();
        assert!(store.remove("nowhere").await.is_ok());
        assert_eq!(store.len(), 0);
    }
}

//! Object storage for uploaded files.
//!
//! The trait keeps services testable without network access; the real
//! implementation writes to S3.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use thiserror::Error;

/// Errors from object storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The upload to the backing store failed.
    #[error("object upload failed: {0}")]
    Upload(String),
}

/// A place to put uploaded objects. Returns the public URL of the stored
/// object.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` under `key` with the given content type.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Upload`] when the store rejects the write.
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;
}

/// S3-backed storage.
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Storage {
    /// Build from the ambient AWS configuration (env credentials, region).
    pub async fn from_env(bucket: String) -> Self {
        let config =
            aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            client: aws_sdk_s3::Client::new(&config),
            bucket,
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
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
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        Ok(format!(
            "https://{}.s3.amazonaws.com/{key}",
            self.bucket
        ))
    }
}

#[cfg(test)]
pub mod memory {
    //! In-memory storage for tests.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::{async_trait, ObjectStorage, StorageError};

    #[derive(Default)]
    pub struct MemoryStorage {
        objects: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl MemoryStorage {
        #[allow(clippy::unwrap_used)]
        pub fn get(&self, key: &str) -> Option<Vec<u8>> {
            self.objects.lock().unwrap().get(key).cloned()
        }
    }

    #[async_trait]
    impl ObjectStorage for MemoryStorage {
        #[allow(clippy::unwrap_used)]
        async fn put(
            &self,
            key: &str,
            bytes: Vec<u8>,
            _content_type: &str,
        ) -> Result<String, StorageError> {
            self.objects.lock().unwrap().insert(key.to_owned(), bytes);
            Ok(format!("memory://{key}"))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::memory::MemoryStorage;
    use super::ObjectStorage;

    #[tokio::test]
    async fn test_memory_put_roundtrip() {
        let storage = MemoryStorage::default();

        let url = storage
            .put("cp5.jpg", vec![0xff, 0xd8], "image/jpeg")
            .await
            .unwrap();
        assert_eq!(url, "memory://cp5.jpg");
        assert_eq!(storage.get("cp5.jpg"), Some(vec![0xff, 0xd8]));
        assert_eq!(storage.get("cp6.jpg"), None);
    }
}

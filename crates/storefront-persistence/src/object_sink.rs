//! # Object Storage Sink
//!
//! S3-compatible export target built on `object_store`.

use async_trait::async_trait;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use std::sync::Arc;

use crate::error::Result;
use crate::repository::traits::ExportSink;

/// S3 connection settings. Credentials come from the standard AWS
/// environment variables.
#[derive(Debug, Clone, Default)]
pub struct ObjectStoreConfig {
    /// Bucket name or access point alias.
    pub bucket: String,
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible servers (MinIO, LocalStack).
    pub endpoint: Option<String>,
    pub allow_http: bool,
}

/// Export sink writing whole objects to any `ObjectStore`.
#[derive(Clone)]
pub struct ObjectStoreSink {
    store: Arc<dyn ObjectStore>,
}

impl ObjectStoreSink {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Build an S3 sink. No request is made until the first put.
    pub fn s3(config: &ObjectStoreConfig) -> Result<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(&config.bucket)
            .with_allow_http(config.allow_http);

        if let Some(region) = &config.region {
            builder = builder.with_region(region);
        }
        if let Some(endpoint) = &config.endpoint {
            builder = builder.with_endpoint(endpoint);
        }

        let store = builder.build()?;
        tracing::info!(bucket = %config.bucket, "Object store sink configured");

        Ok(Self::new(Arc::new(store)))
    }
}

#[async_trait]
impl ExportSink for ObjectStoreSink {
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<()> {
        let location = Path::from(key);
        let size = body.len();

        self.store
            .put(&location, PutPayload::from(body))
            .await
            .inspect_err(|e| tracing::error!(key, error = %e, "Error putting object"))?;

        tracing::debug!(key, size, "Object written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;

    #[tokio::test]
    async fn test_put_overwrites_object() {
        let backend = Arc::new(InMemory::new());
        let sink = ObjectStoreSink::new(backend.clone());

        sink.put("orders_data.json", b"[1]".to_vec()).await.unwrap();
        sink.put("orders_data.json", b"[]".to_vec()).await.unwrap();

        let stored = backend
            .get(&Path::from("orders_data.json"))
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        assert_eq!(stored.as_ref(), b"[]");
    }

    #[test]
    fn test_s3_builder_accepts_endpoint() {
        let config = ObjectStoreConfig {
            bucket: "exports".into(),
            region: Some("us-east-1".into()),
            endpoint: Some("http://localhost:9000".into()),
            allow_http: true,
        };
        assert!(ObjectStoreSink::s3(&config).is_ok());
    }
}

use std::sync::Arc;

use tracing::info;

use crate::{
    base_name, BlobConfig, BlobError, BlobInfo, BlobKeyStrategy, BlobPut, BlobReceipt,
    BlobResult, BlobStore, ByteStream, TimestampKeyStrategy,
};

/// The main blob adapter - this is what the gallery controller embeds
#[derive(Clone)]
pub struct BlobAdapter {
    store: Arc<dyn BlobStore>,
    keys: Arc<dyn BlobKeyStrategy>,
    config: BlobConfig,
}

impl BlobAdapter {
    /// Create a new blob adapter
    pub fn new<S: BlobStore + 'static>(store: S, config: BlobConfig) -> Self {
        Self {
            store: Arc::new(store),
            keys: Arc::new(TimestampKeyStrategy),
            config,
        }
    }

    /// Store a blob from a stream (single-shot upload)
    pub async fn put(&self, put: BlobPut, body: ByteStream) -> BlobResult<BlobReceipt> {
        if base_name(&put.filename).trim().is_empty() {
            return Err(BlobError::invalid("Filename is required"));
        }
        if let Some(size) = put.size_hint {
            if size > self.config.max_blob_bytes {
                return Err(BlobError::invalid(format!(
                    "Blob size {} exceeds maximum {}",
                    size, self.config.max_blob_bytes
                )));
            }
        }

        let stamp_millis = chrono::Utc::now().timestamp_millis();
        let key = self.keys.object_key(&put.filename, stamp_millis);
        let content_type = put
            .content_type
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| self.config.default_content_type.clone());

        let result = self.store.put(&key, &content_type, body).await?;
        info!(
            key = %key,
            size = result.size_bytes,
            content_type = %content_type,
            "stored blob"
        );

        let mut receipt = BlobReceipt::new(key, result.size_bytes, content_type, stamp_millis)
            .with_filename(put.filename);
        if let Some(etag) = result.etag {
            receipt = receipt.with_etag(etag);
        }

        Ok(receipt)
    }

    /// Enumerate every blob in the container
    pub async fn list(&self) -> BlobResult<Vec<BlobInfo>> {
        self.store.list().await
    }

    /// Delete a blob
    pub async fn delete(&self, key: &str) -> BlobResult<()> {
        self.store.delete(key).await?;
        info!(key = %key, "deleted blob");
        Ok(())
    }

    /// Direct fetch URL for a key
    pub fn url(&self, key: &str) -> String {
        self.store.url(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bytes_stream, MemoryBlobStore};
    use bytes::Bytes;

    #[tokio::test]
    async fn put_derives_timestamped_key() {
        let adapter = BlobAdapter::new(MemoryBlobStore::new("media"), BlobConfig::default());
        let receipt = adapter
            .put(
                BlobPut::new("cat.png").with_content_type("image/png"),
                bytes_stream(Bytes::from_static(b"meow")),
            )
            .await
            .unwrap();

        assert_eq!(receipt.key, format!("{}-cat.png", receipt.stamp_millis));
        assert_eq!(receipt.size_bytes, 4);
        assert_eq!(receipt.content_type, "image/png");
        assert!(receipt.etag.is_some());
    }

    #[tokio::test]
    async fn put_defaults_content_type() {
        let adapter = BlobAdapter::new(MemoryBlobStore::default(), BlobConfig::default());
        let receipt = adapter
            .put(BlobPut::new("blob.bin"), bytes_stream(Bytes::from_static(b"x")))
            .await
            .unwrap();
        assert_eq!(receipt.content_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn put_rejects_oversized_hint() {
        let store = MemoryBlobStore::default();
        let adapter = BlobAdapter::new(store.clone(), BlobConfig::new().with_max_blob_bytes(2));
        let err = adapter
            .put(
                BlobPut::new("big.png").with_size_hint(3),
                bytes_stream(Bytes::from_static(b"abc")),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BlobError::Invalid { .. }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn put_rejects_directory_only_filename() {
        let store = MemoryBlobStore::default();
        let adapter = BlobAdapter::new(store.clone(), BlobConfig::default());
        for name in ["photos/", "C:\\Users\\me\\", "  "] {
            let err = adapter
                .put(BlobPut::new(name), bytes_stream(Bytes::from_static(b"x")))
                .await
                .unwrap_err();
            assert!(matches!(err, BlobError::Invalid { .. }), "{name}");
        }
        assert!(store.is_empty());
    }
}

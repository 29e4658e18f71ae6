use async_trait::async_trait;

use crate::{BlobInfo, BlobResult, ByteStream};

/// Core blob storage operations - must be implemented by all storage backends
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Enumerate every object in the container
    async fn list(&self) -> BlobResult<Vec<BlobInfo>>;

    /// Store a blob from a stream
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        stream: ByteStream,
    ) -> BlobResult<PutResult>;

    /// Delete a blob
    async fn delete(&self, key: &str) -> BlobResult<()>;

    /// Direct fetch URL for a key
    fn url(&self, key: &str) -> String;
}

/// Result of a successful put operation
#[derive(Debug, Clone)]
pub struct PutResult {
    pub etag: Option<String>,
    pub size_bytes: u64,
}

/// Last segment of a client-supplied filename.
///
/// Browsers on some platforms send the full client path.
pub fn base_name(filename: &str) -> &str {
    filename
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename)
}

/// Strategy for generating blob keys
pub trait BlobKeyStrategy: Send + Sync {
    /// Generate a key for an uploaded file
    fn object_key(&self, filename: &str, stamp_millis: i64) -> String;
}

/// Default key strategy: `{millis}-{filename}`
#[derive(Debug, Clone, Default)]
pub struct TimestampKeyStrategy;

impl BlobKeyStrategy for TimestampKeyStrategy {
    fn object_key(&self, filename: &str, stamp_millis: i64) -> String {
        format!("{}-{}", stamp_millis, base_name(filename))
    }
}

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use parking_lot::RwLock;

use crate::{BlobError, BlobInfo, BlobResult, BlobStore, ByteStream, PutResult};

#[derive(Debug, Clone)]
struct MemoryObject {
    data: Bytes,
    content_type: String,
    etag: String,
    last_modified: i64,
}

/// In-memory store for testing and local development
#[derive(Clone)]
pub struct MemoryBlobStore {
    container: String,
    objects: Arc<RwLock<BTreeMap<String, MemoryObject>>>,
    available: Arc<AtomicBool>,
}

impl MemoryBlobStore {
    pub fn new<S: Into<String>>(container: S) -> Self {
        Self {
            container: container.into(),
            objects: Arc::new(RwLock::new(BTreeMap::new())),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Simulate an unreachable service: every call fails until re-enabled
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Raw bytes of a stored object
    pub fn bytes(&self, key: &str) -> Option<Bytes> {
        self.objects.read().get(key).map(|o| o.data.clone())
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    fn ensure_available(&self) -> BlobResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(BlobError::status(503, "ServerBusy"))
        }
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new("memory")
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn list(&self) -> BlobResult<Vec<BlobInfo>> {
        self.ensure_available()?;
        let objects = self.objects.read();
        Ok(objects
            .iter()
            .map(|(key, o)| {
                BlobInfo::new(key.clone(), o.data.len() as u64)
                    .with_content_type(o.content_type.clone())
                    .with_etag(o.etag.clone())
                    .with_last_modified(o.last_modified)
            })
            .collect())
    }

    async fn put(
        &self,
        key: &str,
        content_type: &str,
        mut stream: ByteStream,
    ) -> BlobResult<PutResult> {
        self.ensure_available()?;

        let mut data = Vec::new();
        while let Some(chunk) = stream.next().await {
            data.extend_from_slice(&chunk?);
        }
        let size_bytes = data.len() as u64;
        let now = chrono::Utc::now();
        let etag = format!("\"0x{:X}\"", now.timestamp_nanos_opt().unwrap_or_default());

        self.objects.write().insert(
            key.to_string(),
            MemoryObject {
                data: Bytes::from(data),
                content_type: content_type.to_string(),
                etag: etag.clone(),
                last_modified: now.timestamp(),
            },
        );

        Ok(PutResult {
            etag: Some(etag),
            size_bytes,
        })
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        self.ensure_available()?;
        self.objects
            .write()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| BlobError::not_found(key))
    }

    fn url(&self, key: &str) -> String {
        format!("memory://{}/{}", self.container, crate::azure_store::encode_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytes_stream;

    #[tokio::test]
    async fn put_list_delete() {
        let store = MemoryBlobStore::new("media");
        store
            .put("b.mp3", "audio/mpeg", bytes_stream(Bytes::from_static(b"id3")))
            .await
            .unwrap();
        store
            .put("a.png", "image/png", bytes_stream(Bytes::from_static(b"png!")))
            .await
            .unwrap();

        let listed = store.list().await.unwrap();
        let keys: Vec<_> = listed.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["a.png", "b.mp3"]);
        assert_eq!(listed[0].size_bytes, 4);
        assert_eq!(listed[0].content_type.as_deref(), Some("image/png"));

        store.delete("a.png").await.unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.delete("a.png").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = MemoryBlobStore::default();
        store.set_available(false);
        assert!(matches!(
            store.list().await,
            Err(BlobError::Status { status: 503, .. })
        ));
        store.set_available(true);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[test]
    fn memory_urls_are_stable() {
        let store = MemoryBlobStore::new("media");
        assert_eq!(store.url("1-a b.png"), "memory://media/1-a%20b.png");
    }
}

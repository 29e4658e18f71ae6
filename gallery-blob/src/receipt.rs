use serde::{Deserialize, Serialize};

/// Receipt returned after successfully storing a blob
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobReceipt {
    pub key: String,
    pub size_bytes: u64,
    pub content_type: String,
    pub filename: String,
    pub etag: Option<String>,
    /// Millisecond timestamp the key was derived from
    pub stamp_millis: i64,
    pub created_at: i64,
}

impl BlobReceipt {
    pub fn new(key: String, size_bytes: u64, content_type: String, stamp_millis: i64) -> Self {
        Self {
            key,
            size_bytes,
            content_type,
            filename: String::new(),
            etag: None,
            stamp_millis,
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Set filename
    pub fn with_filename<S: Into<String>>(mut self, filename: S) -> Self {
        self.filename = filename.into();
        self
    }

    /// Set etag
    pub fn with_etag<S: Into<String>>(mut self, etag: S) -> Self {
        self.etag = Some(etag.into());
        self
    }
}

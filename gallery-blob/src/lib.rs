//! # gallery-blob: object storage gateway for the media gallery
//!
//! `gallery-blob` hides the storage service behind a small [`BlobStore`] trait
//! so the gallery controller never talks HTTP itself. Two stores ship with the
//! crate:
//!
//! - [`AzureBlobStore`]: Azure Blob REST calls authorised by a SAS token
//! - [`MemoryBlobStore`]: an in-process map for tests and local development
//!
//! ## Quick Start
//!
//! ```rust
//! use gallery_blob::prelude::*;
//! use bytes::Bytes;
//!
//! # #[tokio::main]
//! # async fn main() -> BlobResult<()> {
//! let adapter = BlobAdapter::new(MemoryBlobStore::new("media"), BlobConfig::default());
//!
//! let put = BlobPut::new("sunset.png").with_content_type("image/png");
//! let receipt = adapter.put(put, gallery_blob::bytes_stream(Bytes::from_static(b"png"))).await?;
//!
//! assert!(receipt.key.ends_with("-sunset.png"));
//! assert_eq!(adapter.list().await?.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │ GalleryController   │  ← listing, filtering, refresh
//! ├─────────────────────┤
//! │   BlobAdapter       │  ← keys, size guard, content type
//! ├─────────────────────┤
//! │   BlobStore         │  ← storage primitives
//! └─────────────────────┘
//! ```

pub mod adapter;
mod azure_store;
mod config;
mod error;
mod memory_store;
mod receipt;
pub mod store;
mod types;

pub use adapter::BlobAdapter;
pub use azure_store::AzureBlobStore;
pub use config::{BlobConfig, StorageConfig};
pub use error::{BlobError, BlobResult};
pub use memory_store::MemoryBlobStore;
pub use receipt::BlobReceipt;
pub use store::{base_name, BlobKeyStrategy, BlobStore, PutResult, TimestampKeyStrategy};
pub use types::{bytes_stream, BlobInfo, BlobPut, ByteStream};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BlobAdapter, BlobConfig, BlobError, BlobInfo, BlobPut, BlobReceipt, BlobResult,
        BlobStore, ByteStream, MemoryBlobStore,
    };
}

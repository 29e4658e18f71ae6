//! gallery-core: the media gallery controller.
//!
//! The controller owns the last fetched listing, the filter selection and a
//! loading flag. Storage access goes through an injected
//! [`gallery_blob::BlobAdapter`], so tests substitute an in-memory store.

pub mod config;
pub mod controller;
pub mod errors;
pub mod media;

pub use config::{GalleryConfig, StoreBackend};
pub use controller::{
    GalleryController, GalleryListing, UploadOutcome, ViewState, UPLOAD_VALIDATION_MESSAGE,
};
pub use errors::{ErrorKind, GalleryError, GalleryResult};
pub use media::{
    classify, file_name_without_extension, Classification, FilterKind, LocalFile, MediaItem,
    MediaKind, PendingUpload, DEFAULT_CONTENT_TYPE,
};

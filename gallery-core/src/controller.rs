use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use gallery_blob::{bytes_stream, BlobAdapter, BlobError, BlobPut, BlobReceipt};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::errors::{GalleryError, GalleryResult};
use crate::media::{classify, FilterKind, MediaItem, MediaKind, PendingUpload};

pub const UPLOAD_VALIDATION_MESSAGE: &str = "Please select a file type and file to upload";

/// Filter selection plus the loading flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub filter: FilterKind,
    pub is_loading: bool,
}

/// Items after a mutation, and whether the follow-up listing succeeded
#[derive(Debug, Clone, Serialize)]
pub struct GalleryListing {
    pub items: Vec<MediaItem>,
    pub refreshed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub receipt: BlobReceipt,
    pub declared_kind: MediaKind,
    #[serde(flatten)]
    pub listing: GalleryListing,
}

/// Holds the gallery state and drives the storage gateway.
///
/// Calls are not coordinated: overlapping requests each run to completion
/// and whichever listing finishes last becomes the snapshot.
pub struct GalleryController {
    blobs: BlobAdapter,
    items: RwLock<Arc<Vec<MediaItem>>>,
    filter: RwLock<FilterKind>,
    in_flight: AtomicUsize,
}

/// Marks a gateway call as outstanding for as long as it lives
struct LoadingGuard<'a>(&'a AtomicUsize);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl GalleryController {
    pub fn new(blobs: BlobAdapter) -> Self {
        Self {
            blobs,
            items: RwLock::new(Arc::new(Vec::new())),
            filter: RwLock::new(FilterKind::All),
            in_flight: AtomicUsize::new(0),
        }
    }

    fn begin_call(&self) -> LoadingGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        LoadingGuard(&self.in_flight)
    }

    fn gateway_error(operation: &str, err: BlobError) -> GalleryError {
        match err {
            BlobError::Invalid { message } => GalleryError::validation(message),
            other => GalleryError::gateway(operation, other),
        }
    }

    /// Enumerate the container and replace the snapshot.
    ///
    /// On failure the previous snapshot is kept and the error is logged.
    pub async fn list_all(&self) -> GalleryResult<Vec<MediaItem>> {
        let listed = {
            let _loading = self.begin_call();
            self.blobs.list().await
        };

        match listed {
            Ok(blobs) => {
                let items: Vec<MediaItem> = blobs
                    .into_iter()
                    .map(|info| {
                        let url = self.blobs.url(&info.key);
                        MediaItem::from_blob(info, url)
                    })
                    .collect();
                debug!(count = items.len(), "gallery listing refreshed");
                *self.items.write() = Arc::new(items.clone());
                Ok(items)
            }
            Err(err) => {
                error!(error = %err, "listing failed; keeping previous gallery");
                Err(Self::gateway_error("list", err))
            }
        }
    }

    /// Re-list after a mutation; a failure here does not undo the mutation.
    async fn refresh(&self) -> GalleryListing {
        match self.list_all().await {
            Ok(items) => GalleryListing {
                items,
                refreshed: true,
            },
            Err(_) => GalleryListing {
                items: self.snapshot(),
                refreshed: false,
            },
        }
    }

    /// Store the pending file under `{millis}-{filename}`, then refresh.
    pub async fn upload(&self, pending: PendingUpload) -> GalleryResult<UploadOutcome> {
        let (file, declared_kind) = match (pending.file, pending.declared_kind) {
            (Some(file), Some(kind)) => (file, kind),
            _ => {
                warn!("upload rejected: file or type missing");
                return Err(GalleryError::validation(UPLOAD_VALIDATION_MESSAGE));
            }
        };

        let content_type = file.mime_type();
        if classify(&content_type).media_kind() != Some(declared_kind) {
            debug!(
                declared = %declared_kind,
                content_type = %content_type,
                "declared kind differs from file type"
            );
        }

        let put = BlobPut::new(file.filename.clone())
            .with_content_type(content_type)
            .with_size_hint(file.bytes.len() as u64);

        let stored = {
            let _loading = self.begin_call();
            self.blobs.put(put, bytes_stream(file.bytes)).await
        };
        let receipt = stored.map_err(|err| {
            error!(filename = %file.filename, error = %err, "upload failed");
            Self::gateway_error("upload", err)
        })?;
        info!(
            key = %receipt.key,
            kind = %declared_kind,
            size = receipt.size_bytes,
            "uploaded media"
        );

        let listing = self.refresh().await;
        Ok(UploadOutcome {
            receipt,
            declared_kind,
            listing,
        })
    }

    /// Remove an object by key, then refresh.
    pub async fn delete(&self, key: &str) -> GalleryResult<GalleryListing> {
        let removed = {
            let _loading = self.begin_call();
            self.blobs.delete(key).await
        };
        removed.map_err(|err| {
            error!(key = %key, error = %err, "delete failed");
            Self::gateway_error("delete", err)
        })?;

        Ok(self.refresh().await)
    }

    /// Items of the last fetched list matching `kind`, in listing order.
    pub fn apply_filter(&self, kind: FilterKind) -> Vec<MediaItem> {
        let items = self.items.read().clone();
        items
            .iter()
            .filter(|item| kind.matches(item.classification()))
            .cloned()
            .collect()
    }

    /// Items matching the current filter selection
    pub fn filtered(&self) -> Vec<MediaItem> {
        self.apply_filter(self.filter())
    }

    pub fn snapshot(&self) -> Vec<MediaItem> {
        self.items.read().as_ref().clone()
    }

    pub fn filter(&self) -> FilterKind {
        *self.filter.read()
    }

    pub fn set_filter(&self, kind: FilterKind) {
        *self.filter.write() = kind;
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn view_state(&self) -> ViewState {
        ViewState {
            filter: self.filter(),
            is_loading: self.is_loading(),
        }
    }
}

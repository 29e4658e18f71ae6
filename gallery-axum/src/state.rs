use std::sync::Arc;

use gallery_core::GalleryController;

use crate::upload_form::UploadFormConfig;

/// Shared handler state
pub struct GalleryState {
    pub gallery: Arc<GalleryController>,
    pub upload: Arc<UploadFormConfig>,
}

impl Clone for GalleryState {
    fn clone(&self) -> Self {
        Self {
            gallery: Arc::clone(&self.gallery),
            upload: Arc::clone(&self.upload),
        }
    }
}

impl GalleryState {
    pub fn new(gallery: GalleryController, upload: UploadFormConfig) -> Self {
        Self {
            gallery: Arc::new(gallery),
            upload: Arc::new(upload),
        }
    }
}

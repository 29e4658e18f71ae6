use std::collections::HashSet;

use axum::extract::multipart::{Field, Multipart, MultipartError};
use gallery_core::{GalleryError, GalleryResult, LocalFile, MediaKind, PendingUpload};

/// Configuration for reading an upload form
#[derive(Debug, Clone)]
pub struct UploadFormConfig {
    /// Maximum file size in bytes (None = unlimited)
    pub max_file_size: Option<usize>,
    /// Generic file field; its kind comes from the `kind` text field
    pub file_field: String,
    /// Text field carrying the declared kind
    pub kind_field: String,
    /// Typed picker fields; the field name is the declared kind
    pub typed_fields: HashSet<String>,
}

impl Default for UploadFormConfig {
    fn default() -> Self {
        Self {
            max_file_size: Some(100 * 1024 * 1024), // 100MB
            file_field: "file".to_string(),
            kind_field: "kind".to_string(),
            typed_fields: MediaKind::ALL.iter().map(|k| k.as_str().to_string()).collect(),
        }
    }
}

impl UploadFormConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum file size in bytes
    pub fn max_file_size(mut self, size: usize) -> Self {
        self.max_file_size = Some(size);
        self
    }
}

fn form_error(err: MultipartError) -> GalleryError {
    GalleryError::bad_request(format!("Malformed upload form: {}", err.body_text()))
}

async fn read_file(
    field: Field<'_>,
    config: &UploadFormConfig,
) -> GalleryResult<Option<LocalFile>> {
    let filename = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let data = field.bytes().await.map_err(form_error)?;

    // Untouched file inputs are submitted with an empty filename
    let Some(filename) = filename.filter(|f| !f.is_empty()) else {
        return Ok(None);
    };

    if let Some(max) = config.max_file_size {
        if data.len() > max {
            return Err(GalleryError::bad_request(format!(
                "File {} is {} bytes, larger than the {} byte limit",
                filename,
                data.len(),
                max
            )));
        }
    }

    let mut file = LocalFile::new(filename, data);
    if let Some(ct) = content_type {
        file = file.with_content_type(ct);
    }
    Ok(Some(file))
}

/// Collect a [`PendingUpload`] from a multipart form.
///
/// Accepts either the typed pickers (`image`, `video`, `audio`) or a generic
/// `file` field plus a `kind` text field. The last non-empty file wins.
/// Missing pieces are left as `None`; the controller decides if that is valid.
pub async fn read_pending_upload(
    mut multipart: Multipart,
    config: &UploadFormConfig,
) -> GalleryResult<PendingUpload> {
    let mut pending = PendingUpload::default();
    let mut explicit_kind: Option<MediaKind> = None;

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == config.kind_field {
            let text = field.text().await.map_err(form_error)?;
            if !text.trim().is_empty() {
                explicit_kind = Some(text.parse()?);
            }
        } else if name == config.file_field {
            if let Some(file) = read_file(field, config).await? {
                pending.file = Some(file);
                pending.declared_kind = None;
            }
        } else if config.typed_fields.contains(&name) {
            let kind: MediaKind = name.parse()?;
            if let Some(file) = read_file(field, config).await? {
                pending.select(file, kind);
            }
        }
    }

    if pending.declared_kind.is_none() {
        pending.declared_kind = explicit_kind;
    }
    Ok(pending)
}

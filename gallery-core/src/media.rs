use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use gallery_blob::BlobInfo;
use serde::{Deserialize, Serialize};

use crate::errors::GalleryError;

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Kind a user declares when picking a file to upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

impl MediaKind {
    pub const ALL: [MediaKind; 3] = [MediaKind::Image, MediaKind::Video, MediaKind::Audio];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        }
    }

    /// `accept` pattern for a file picker of this kind
    pub fn accept(&self) -> &'static str {
        match self {
            MediaKind::Image => "image/*",
            MediaKind::Video => "video/*",
            MediaKind::Audio => "audio/*",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(MediaKind::Image),
            "video" => Ok(MediaKind::Video),
            "audio" => Ok(MediaKind::Audio),
            other => Err(GalleryError::bad_request(format!("Unknown media kind: {other}"))),
        }
    }
}

/// What a stored object is, judged by its MIME type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Image,
    Video,
    Audio,
    Other,
}

impl Classification {
    pub fn media_kind(&self) -> Option<MediaKind> {
        match self {
            Classification::Image => Some(MediaKind::Image),
            Classification::Video => Some(MediaKind::Video),
            Classification::Audio => Some(MediaKind::Audio),
            Classification::Other => None,
        }
    }
}

/// Classify a MIME type by its top-level prefix.
pub fn classify(content_type: &str) -> Classification {
    if content_type.starts_with("image/") {
        Classification::Image
    } else if content_type.starts_with("video/") {
        Classification::Video
    } else if content_type.starts_with("audio/") {
        Classification::Audio
    } else {
        Classification::Other
    }
}

/// Strip the trailing extension for display; the key itself is untouched.
///
/// ```rust
/// use gallery_core::file_name_without_extension;
///
/// assert_eq!(file_name_without_extension("a.b.png"), "a.b");
/// assert_eq!(file_name_without_extension("noext"), "noext");
/// ```
pub fn file_name_without_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => &name[..idx],
        None => name,
    }
}

/// Gallery filter selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    #[default]
    All,
    Image,
    Video,
    Audio,
}

impl FilterKind {
    pub const OPTIONS: [(FilterKind, &'static str); 4] = [
        (FilterKind::All, "All"),
        (FilterKind::Image, "Images"),
        (FilterKind::Video, "Videos"),
        (FilterKind::Audio, "Audios"),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::All => "all",
            FilterKind::Image => "image",
            FilterKind::Video => "video",
            FilterKind::Audio => "audio",
        }
    }

    pub fn matches(&self, classification: Classification) -> bool {
        match self {
            FilterKind::All => true,
            FilterKind::Image => classification == Classification::Image,
            FilterKind::Video => classification == Classification::Video,
            FilterKind::Audio => classification == Classification::Audio,
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FilterKind::All),
            "image" => Ok(FilterKind::Image),
            "video" => Ok(FilterKind::Video),
            "audio" => Ok(FilterKind::Audio),
            other => Err(GalleryError::bad_request(format!("Unknown filter: {other}"))),
        }
    }
}

/// One object in the gallery, rebuilt on every listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub name: String,
    pub url: String,
    pub content_type: String,
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<i64>,
}

impl MediaItem {
    pub fn new<N, U, C>(name: N, url: U, content_type: C) -> Self
    where
        N: Into<String>,
        U: Into<String>,
        C: Into<String>,
    {
        Self {
            name: name.into(),
            url: url.into(),
            content_type: content_type.into(),
            size_bytes: 0,
            last_modified: None,
        }
    }

    /// Build from a listing entry and its resolved URL
    pub fn from_blob(info: BlobInfo, url: String) -> Self {
        let content_type = info
            .content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        Self {
            name: info.key,
            url,
            content_type,
            size_bytes: info.size_bytes,
            last_modified: info.last_modified,
        }
    }

    pub fn classification(&self) -> Classification {
        classify(&self.content_type)
    }

    pub fn display_name(&self) -> &str {
        file_name_without_extension(&self.name)
    }
}

/// A file held in memory between selection and upload
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl LocalFile {
    pub fn new<S: Into<String>>(filename: S, bytes: Bytes) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Client-declared MIME type, else sniffed from the filename
    pub fn mime_type(&self) -> String {
        self.content_type
            .as_deref()
            .map(str::trim)
            .filter(|ct| !ct.is_empty() && *ct != DEFAULT_CONTENT_TYPE)
            .map(str::to_string)
            .or_else(|| {
                mime_guess::from_path(&self.filename)
                    .first()
                    .map(|m| m.essence_str().to_string())
            })
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
    }
}

/// Upload form state: a chosen file and the picker it came from
#[derive(Debug, Clone, Default)]
pub struct PendingUpload {
    pub file: Option<LocalFile>,
    pub declared_kind: Option<MediaKind>,
}

impl PendingUpload {
    pub fn new(file: LocalFile, declared_kind: MediaKind) -> Self {
        Self {
            file: Some(file),
            declared_kind: Some(declared_kind),
        }
    }

    /// Selecting a file through a typed picker replaces both fields
    pub fn select(&mut self, file: LocalFile, declared_kind: MediaKind) {
        self.file = Some(file);
        self.declared_kind = Some(declared_kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_prefix() {
        assert_eq!(classify("image/png"), Classification::Image);
        assert_eq!(classify("video/mp4"), Classification::Video);
        assert_eq!(classify("audio/mpeg"), Classification::Audio);
    }

    #[test]
    fn classify_matches_prefix_case_sensitively() {
        assert_eq!(classify("Image/JPEG"), Classification::Other);
        assert_eq!(classify(" video/mp4"), Classification::Other);
        assert_eq!(classify("audio/"), Classification::Audio);
    }

    #[test]
    fn classify_everything_else_as_other() {
        let others = [
            "application/pdf",
            "text/plain",
            "",
            "image",
            "imagex/png",
            "application/octet-stream",
        ];
        for ct in others {
            assert_eq!(classify(ct), Classification::Other, "{ct}");
        }
    }

    #[test]
    fn strips_only_last_extension() {
        assert_eq!(file_name_without_extension("a.b.png"), "a.b");
        assert_eq!(file_name_without_extension("noext"), "noext");
        assert_eq!(file_name_without_extension(".hidden"), "");
        assert_eq!(file_name_without_extension("1700-clip.mp4"), "1700-clip");
    }

    #[test]
    fn filter_parses_the_four_values_only() {
        assert_eq!("all".parse::<FilterKind>().unwrap(), FilterKind::All);
        assert_eq!("Audio".parse::<FilterKind>().unwrap(), FilterKind::Audio);
        assert!("other".parse::<FilterKind>().is_err());
        assert!("".parse::<FilterKind>().is_err());
    }

    #[test]
    fn media_item_defaults_content_type() {
        let info = BlobInfo::new("k", 1).with_content_type("  ");
        let item = MediaItem::from_blob(info, "u".into());
        assert_eq!(item.content_type, DEFAULT_CONTENT_TYPE);
        assert_eq!(item.classification(), Classification::Other);
    }

    #[test]
    fn local_file_sniffs_missing_mime() {
        let file = LocalFile::new("song.mp3", Bytes::new());
        assert_eq!(file.mime_type(), "audio/mpeg");

        let declared = LocalFile::new("clip.bin", Bytes::new()).with_content_type("video/webm");
        assert_eq!(declared.mime_type(), "video/webm");

        let unknown = LocalFile::new("blob.zzz-unknown", Bytes::new());
        assert_eq!(unknown.mime_type(), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn selecting_through_a_picker_replaces_both_fields() {
        let first = LocalFile::new("a.png", Bytes::new());
        let mut pending = PendingUpload::new(first, MediaKind::Image);
        pending.select(LocalFile::new("b.mp3", Bytes::new()), MediaKind::Audio);
        assert_eq!(pending.file.map(|f| f.filename).as_deref(), Some("b.mp3"));
        assert_eq!(pending.declared_kind, Some(MediaKind::Audio));
    }
}

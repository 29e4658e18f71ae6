//! # Errors
//!
//! The gallery has two failure families:
//! - `Validation`: the upload form was incomplete; raised before any gateway call
//! - `Gateway`: the storage service failed a list, upload or delete
//!
//! Both are terminal for the operation that raised them and never fatal to
//! the application. The server crate decides how to render them.

use std::fmt;

use anyhow::Error as AnyError;
use gallery_blob::BlobError;

/// A convenience result type for gallery APIs.
pub type GalleryResult<T> = std::result::Result<T, GalleryError>;

/// Error class names + status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest, // 400
    Validation, // 422
    Gateway,    // 502
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Validation => 422,
            ErrorKind::Gateway => 502,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Gateway => "GatewayError",
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad-request",
            ErrorKind::Validation => "validation",
            ErrorKind::Gateway => "gateway",
        }
    }
}

/// A structured gallery error.
#[derive(Debug)]
pub struct GalleryError {
    pub kind: ErrorKind,
    pub message: String,
    pub data: Option<serde_json::Value>,
    pub source: Option<AnyError>,
}

impl GalleryError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            data: None,
            source: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_source(mut self, source: AnyError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }

    pub fn is_validation(&self) -> bool {
        self.kind == ErrorKind::Validation
    }

    pub fn is_gateway(&self) -> bool {
        self.kind == ErrorKind::Gateway
    }

    /// Wrap a storage failure, keeping the blob error as source
    pub fn gateway(operation: &str, err: BlobError) -> Self {
        Self::new(ErrorKind::Gateway, format!("{operation} failed: {err}"))
            .with_source(AnyError::new(err))
    }

    /// A "safe" version suitable for returning to clients:
    /// drops the inner `source` (URLs, tokens, backend details).
    pub fn sanitize_for_client(&self) -> GalleryError {
        GalleryError {
            kind: self.kind,
            message: self.message.clone(),
            data: self.data.clone(),
            source: None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        let mut base = json!({
            "name": self.name(),
            "message": self.message,
            "code": self.code(),
            "className": self.class_name(),
        });

        if let Some(d) = &self.data {
            base["data"] = d.clone();
        }
        base
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, msg)
    }
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, msg)
    }
}

impl fmt::Display for GalleryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.code(), self.message)
    }
}

impl std::error::Error for GalleryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_error_keeps_source_but_sanitizes() {
        let err = GalleryError::gateway("list", BlobError::status(403, "AuthenticationFailed"));
        assert!(err.is_gateway());
        assert_eq!(err.code(), 502);
        assert!(std::error::Error::source(&err).is_some());

        let safe = err.sanitize_for_client();
        assert!(safe.source.is_none());
        let body = safe.to_json();
        assert_eq!(body["name"], "GatewayError");
        assert_eq!(body["className"], "gateway");
    }

    #[test]
    fn display_includes_code() {
        let err = GalleryError::validation("Please select a file type and file to upload");
        assert_eq!(
            err.to_string(),
            "ValidationError (422): Please select a file type and file to upload"
        );
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gallery_core::GalleryError;

#[derive(Debug)]
pub struct GalleryAxumError(pub GalleryError);

impl From<GalleryError> for GalleryAxumError {
    fn from(e: GalleryError) -> Self {
        Self(e)
    }
}

impl IntoResponse for GalleryAxumError {
    fn into_response(self) -> Response {
        let safe = self.0.sanitize_for_client();
        let status =
            StatusCode::from_u16(safe.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(safe.to_json())).into_response()
    }
}

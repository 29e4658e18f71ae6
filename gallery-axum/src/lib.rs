//! gallery-axum: HTTP surface for the media gallery.
//!
//! Two route groups share one [`GalleryState`]:
//! - a server-rendered page (`/`, `/upload`, `/delete`)
//! - a JSON API (`/media`, `/media/{key}`, `/state`, `/health`)

pub mod app;
pub mod pages;
pub mod render;
pub mod rest;
pub mod state;
pub mod upload_form;
mod error;
pub use error::GalleryAxumError;
pub use state::GalleryState;

pub use app::GalleryApp;
pub use upload_form::{read_pending_upload, UploadFormConfig};

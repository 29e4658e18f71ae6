//! Server-rendered gallery page and its form endpoints.
//!
//! Mutations answer with `303 See Other` back to the page so a refresh does
//! not resubmit. Validation failures re-render the page with an alert.

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use gallery_core::{FilterKind, GalleryError};
use serde::Deserialize;
use tracing::debug;

use crate::render::{gallery_page, PageView};
use crate::state::GalleryState;
use crate::upload_form::read_pending_upload;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub key: String,
    pub filter: Option<String>,
}

/// Apply a `filter` parameter if it names a known filter
fn select_filter(state: &GalleryState, raw: Option<&str>) {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return;
    };
    match raw.parse::<FilterKind>() {
        Ok(kind) => state.gallery.set_filter(kind),
        Err(_) => debug!(filter = %raw, "ignoring unknown filter"),
    }
}

fn back_to_gallery(state: &GalleryState) -> Redirect {
    Redirect::to(&format!("/?filter={}", state.gallery.filter().as_str()))
}

fn render(state: &GalleryState, alert: Option<&str>) -> Html<String> {
    let items = state.gallery.filtered();
    Html(gallery_page(&PageView {
        state: state.gallery.view_state(),
        items: &items,
        alert,
    }))
}

/// `GET /?filter=` refreshes the listing and renders the gallery.
///
/// A failed listing renders the previous items.
pub async fn index(
    State(state): State<GalleryState>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    select_filter(&state, query.filter.as_deref());
    let _ = state.gallery.list_all().await;
    render(&state, None)
}

/// `POST /upload` from the page's multipart form
pub async fn upload(
    State(state): State<GalleryState>,
    Query(query): Query<PageQuery>,
    multipart: Multipart,
) -> Response {
    select_filter(&state, query.filter.as_deref());

    let result = match read_pending_upload(multipart, &state.upload).await {
        Ok(pending) => state.gallery.upload(pending).await.map(|_| ()),
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => back_to_gallery(&state).into_response(),
        Err(err) if err.is_gateway() => back_to_gallery(&state).into_response(),
        Err(err) => rejected(&state, &err),
    }
}

fn rejected(state: &GalleryState, err: &GalleryError) -> Response {
    let status = StatusCode::from_u16(err.code()).unwrap_or(StatusCode::BAD_REQUEST);
    (status, render(state, Some(&err.message))).into_response()
}

/// `POST /delete` from a card's delete button
pub async fn delete(State(state): State<GalleryState>, Form(form): Form<DeleteForm>) -> Redirect {
    select_filter(&state, form.filter.as_deref());
    // Failures are logged by the controller; the page shows the unchanged gallery
    let _ = state.gallery.delete(&form.key).await;
    back_to_gallery(&state)
}

pub fn router() -> Router<GalleryState> {
    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload))
        .route("/delete", post(delete))
}

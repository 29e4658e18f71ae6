use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
        Multipart, Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use gallery_core::{FilterKind, GalleryError, GalleryListing, MediaItem, UploadOutcome, ViewState};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::state::GalleryState;
use crate::upload_form::read_pending_upload;
use crate::GalleryAxumError;

type ApiResult<T> = Result<T, GalleryAxumError>;

fn map_json_rejection(rejection: JsonRejection) -> GalleryAxumError {
    GalleryError::bad_request("Failed to parse the request body as JSON")
        .with_data(json!({"_schema": [rejection.body_text()]}))
        .into()
}

fn map_query_rejection(rejection: QueryRejection) -> GalleryAxumError {
    GalleryError::bad_request("Failed to parse the query string")
        .with_data(json!({"_query": [rejection.body_text()]}))
        .into()
}

fn map_multipart_rejection(rejection: MultipartRejection) -> GalleryAxumError {
    GalleryError::bad_request("Expected a multipart/form-data upload")
        .with_data(json!({"_schema": [rejection.body_text()]}))
        .into()
}

#[derive(Debug, Default, Deserialize)]
pub struct MediaQuery {
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MediaPage {
    pub filter: FilterKind,
    pub items: Vec<MediaItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateView {
    #[serde(flatten)]
    pub view: ViewState,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct FilterPatch {
    pub filter: FilterKind,
}

/// `GET /media?kind=` re-lists the container and returns the matching items.
///
/// Without `kind` the current filter selection applies.
pub async fn find(
    State(state): State<GalleryState>,
    query: Result<Query<MediaQuery>, QueryRejection>,
) -> ApiResult<Json<MediaPage>> {
    let Query(query) = query.map_err(map_query_rejection)?;
    let filter = match query.kind.as_deref().filter(|k| !k.trim().is_empty()) {
        Some(kind) => kind.parse::<FilterKind>()?,
        None => state.gallery.filter(),
    };
    state.gallery.list_all().await?;
    Ok(Json(MediaPage {
        filter,
        items: state.gallery.apply_filter(filter),
    }))
}

pub async fn create(
    State(state): State<GalleryState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<UploadOutcome>)> {
    let multipart = multipart.map_err(map_multipart_rejection)?;
    let pending = read_pending_upload(multipart, &state.upload).await?;
    let outcome = state.gallery.upload(pending).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn remove(
    State(state): State<GalleryState>,
    Path(key): Path<String>,
) -> ApiResult<Json<GalleryListing>> {
    let listing = state.gallery.delete(&key).await?;
    Ok(Json(listing))
}

fn state_view(state: &GalleryState) -> StateView {
    StateView {
        view: state.gallery.view_state(),
        count: state.gallery.filtered().len(),
    }
}

pub async fn view_state(State(state): State<GalleryState>) -> Json<StateView> {
    Json(state_view(&state))
}

/// `PUT /state` changes the filter selection only
pub async fn set_filter(
    State(state): State<GalleryState>,
    patch: Result<Json<FilterPatch>, JsonRejection>,
) -> ApiResult<Json<StateView>> {
    let Json(patch) = patch.map_err(map_json_rejection)?;
    state.gallery.set_filter(patch.filter);
    Ok(Json(state_view(&state)))
}

pub fn router() -> Router<GalleryState> {
    Router::new()
        .route("/media", get(find).post(create))
        .route("/media/{*key}", axum::routing::delete(remove))
        .route("/state", get(view_state).put(set_filter))
        .route("/health", get(|| async { "ok" }))
}

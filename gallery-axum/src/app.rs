use std::path::PathBuf;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use gallery_core::GalleryController;
use tokio::net::{TcpListener, ToSocketAddrs};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::state::GalleryState;
use crate::upload_form::UploadFormConfig;
use crate::{pages, rest};

/// Slack on top of the file limit for multipart framing and text fields
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Builds the gallery router around a controller.
#[derive(Clone)]
pub struct GalleryApp {
    pub state: GalleryState,
    static_dir: Option<PathBuf>,
    cors: bool,
}

impl GalleryApp {
    pub fn new(gallery: GalleryController) -> Self {
        Self::with_upload_config(gallery, UploadFormConfig::default())
    }

    pub fn with_upload_config(gallery: GalleryController, upload: UploadFormConfig) -> Self {
        Self {
            state: GalleryState::new(gallery, upload),
            static_dir: None,
            cors: false,
        }
    }

    /// Serve files from `dir` under `/static`
    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Allow any origin to call the JSON API
    pub fn permissive_cors(mut self) -> Self {
        self.cors = true;
        self
    }

    pub fn router(&self) -> Router {
        let body_limit = match self.state.upload.max_file_size {
            Some(max) => DefaultBodyLimit::max(max.saturating_add(FORM_OVERHEAD_BYTES)),
            None => DefaultBodyLimit::disable(),
        };

        let mut router = Router::new()
            .merge(pages::router())
            .merge(rest::router())
            .with_state(self.state.clone());

        if let Some(dir) = &self.static_dir {
            router = router.nest_service("/static", ServeDir::new(dir));
        }
        if self.cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        // Outermost first on the way in: assign id, trace, echo id back
        router
            .layer(body_limit)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    pub async fn listen<A>(self, addr: A) -> anyhow::Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "gallery listening");
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

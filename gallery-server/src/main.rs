use anyhow::Result;
use gallery_axum::{GalleryApp, UploadFormConfig};
use gallery_blob::{AzureBlobStore, BlobAdapter, BlobConfig, MemoryBlobStore};
use gallery_core::{GalleryConfig, GalleryController, StoreBackend};
use tracing::{info, warn};

fn build(config: &GalleryConfig) -> GalleryApp {
    let max_file = config.max_file_bytes();
    let blob_config = BlobConfig::new().with_max_blob_bytes(max_file as u64);

    let adapter = match config.backend() {
        StoreBackend::Azure => {
            let storage = config.storage();
            info!(
                account = %storage.account,
                container = %storage.container,
                "using azure blob storage"
            );
            BlobAdapter::new(AzureBlobStore::new(storage), blob_config)
        }
        StoreBackend::Memory => {
            warn!("using in-memory storage; uploads are lost on restart");
            BlobAdapter::new(MemoryBlobStore::new("media"), blob_config)
        }
    };

    let upload = UploadFormConfig::new().max_file_size(max_file);
    let mut app = GalleryApp::with_upload_config(GalleryController::new(adapter), upload)
        .permissive_cors();
    if let Some(dir) = config.get("http.static_dir").filter(|d| !d.is_empty()) {
        app = app.static_dir(dir);
    }
    app
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = GalleryConfig::load_env();
    let app = build(&config);

    let addr = config.http_addr();
    println!("[gallery] listening on http://{addr}");

    app.listen(addr).await?;

    Ok(())
}

// Main entry point for the media-upload-server application.
// Parses configuration, prepares the storage directories, builds the Axum router
// and serves until a shutdown signal arrives.

mod media;
mod models;
mod shutdown_signal;
mod storage;
mod web;

use clap::Parser;
use media::{FfmpegTranscoder, ImageCrateResizer};
use std::sync::Arc;
use storage::StorageLayout;
use tracing::Level;
use web::AppState;

/// Command line arguments for media-upload-server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct AppConfig {
    /// Hostname/IP to bind the server to.
    /// "*" (also used when the option is given without a value) listens on all interfaces.
    #[arg(long, env = "HOST", default_value = "*", num_args = 0..=1, default_missing_value = "*")]
    host: String,

    /// Port number to listen on.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Directory uploaded originals are stored in.
    #[arg(long, env = "UPLOADS_DIR", default_value = "uploads")]
    uploads_dir: String,

    /// Directory generated thumbnails and clips are written to.
    #[arg(long, env = "PROCESSED_DIR", default_value = "processed")]
    processed_dir: String,

    /// ffmpeg executable used for video derivatives.
    #[arg(long, env = "FFMPEG_PATH", default_value = "ffmpeg")]
    ffmpeg_path: String,
}

#[tokio::main]
async fn main() {
    let config = AppConfig::parse();

    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting media-upload-server...");

    let layout = StorageLayout::new(&config.uploads_dir, &config.processed_dir);
    if let Err(e) = layout.ensure_dirs().await {
        tracing::error!(
            "FATAL: Failed to create storage directories ({}, {}): {}",
            layout.uploads_dir.display(),
            layout.processed_dir.display(),
            e
        );
        std::process::exit(1);
    }
    tracing::info!(
        "Storing uploads in {} and derivatives in {}",
        layout.uploads_dir.display(),
        layout.processed_dir.display()
    );
    tracing::info!("Using ffmpeg at: {}", config.ffmpeg_path);
    tracing::warn!(
        "GET /download serves any readable path on this host without access control; do not expose it publicly"
    );

    let state = AppState::new(
        layout,
        Arc::new(FfmpegTranscoder::new(&config.ffmpeg_path)),
        Arc::new(ImageCrateResizer),
    );
    let app = web::create_app(state);

    let listener = match web::create_listener(&config.host, config.port).await {
        Ok((addr, listener)) => {
            tracing::info!("Server started on port {} (listening on {})", config.port, addr);
            listener
        }
        Err(e) => {
            tracing::error!("FATAL: Failed to bind server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal::shutdown_signal())
        .await
    {
        tracing::error!("Server run error: {}", e);
    }

    tracing::info!("media-upload-server has shut down.");
}

// Web server module
// Handles the upload and download HTTP endpoints

mod app;
mod error;
mod extract_request_data;
mod handlers;
mod listeners;
mod models;

pub use app::create_app;
pub use listeners::create_listener;

use crate::media::{ImageResizer, VideoTranscoder};
use crate::storage::StorageLayout;
use std::sync::Arc;

/// Shared handler state. Holds configuration and collaborators only, nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub layout: Arc<StorageLayout>,
    pub transcoder: Arc<dyn VideoTranscoder>,
    pub resizer: Arc<dyn ImageResizer>,
}

impl AppState {
    pub fn new(
        layout: StorageLayout,
        transcoder: Arc<dyn VideoTranscoder>,
        resizer: Arc<dyn ImageResizer>,
    ) -> Self {
        Self {
            layout: Arc::new(layout),
            transcoder,
            resizer,
        }
    }
}

// Records produced by the ingestion workflow.

use serde::{Deserialize, Serialize};

/// Paths of an upload and its derivatives, as they would be saved to a database.
/// Every field is always serialized; absent ones become `null`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivativeRecord {
    pub video_thumbnail: Option<String>,
    pub image_thumbnail: Option<String>,
    pub video_clip: Option<String>,
    pub full_video_file: Option<String>,
    pub full_image_file: Option<String>,
}

impl DerivativeRecord {
    pub fn is_video(&self) -> bool {
        self.video_thumbnail.is_some()
            && self.video_clip.is_some()
            && self.full_video_file.is_some()
            && self.image_thumbnail.is_none()
            && self.full_image_file.is_none()
    }

    pub fn is_image(&self) -> bool {
        self.image_thumbnail.is_some()
            && self.full_image_file.is_some()
            && self.video_thumbnail.is_none()
            && self.video_clip.is_none()
            && self.full_video_file.is_none()
    }
}

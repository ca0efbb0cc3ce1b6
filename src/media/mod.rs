// Media classification and derivative generation.
// The heavy lifting is delegated to the collaborators in `transcoder` and `resizer`.

mod error;
#[cfg(test)]
pub(crate) mod fakes;
mod pipeline;
mod resizer;
mod transcoder;

pub use error::ProcessingError;
pub use pipeline::generate_derivatives;
pub use resizer::{ImageCrateResizer, ImageResizer};
pub use transcoder::{FfmpegTranscoder, VideoTranscoder};

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi"];
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Timestamp of the still frame taken from videos.
pub const VIDEO_THUMBNAIL_AT_SECS: u32 = 5;
pub const VIDEO_CLIP_START_SECS: u32 = 0;
pub const VIDEO_CLIP_DURATION_SECS: u32 = 5;
pub const IMAGE_THUMBNAIL_WIDTH: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Image,
}

impl MediaKind {
    /// Classifies a lowercased extension (without the leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        if VIDEO_EXTENSIONS.contains(&ext) {
            Some(MediaKind::Video)
        } else if IMAGE_EXTENSIONS.contains(&ext) {
            Some(MediaKind::Image)
        } else {
            None
        }
    }
}

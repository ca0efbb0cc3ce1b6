// Derivative generation for one stored upload.

use super::{
    IMAGE_THUMBNAIL_WIDTH, ImageResizer, MediaKind, ProcessingError, VIDEO_CLIP_DURATION_SECS,
    VIDEO_CLIP_START_SECS, VIDEO_THUMBNAIL_AT_SECS, VideoTranscoder,
};
use crate::{models::DerivativeRecord, storage::StorageLayout, storage::UploadedFile};
use std::path::Path;
use tracing::info;

/// Runs the collaborator steps for `kind` and returns the populated record.
///
/// Video steps run strictly in order and the first failure aborts the rest.
/// Outputs written before a failure are left on disk, as is the original upload.
pub async fn generate_derivatives(
    kind: MediaKind,
    upload: &UploadedFile,
    layout: &StorageLayout,
    transcoder: &dyn VideoTranscoder,
    resizer: &dyn ImageResizer,
) -> Result<DerivativeRecord, ProcessingError> {
    let source = upload.stored_path.as_path();
    let thumbnail_path = layout.thumbnail_path(&upload.base_name);

    match kind {
        MediaKind::Video => {
            let clip_path = layout.clip_path(&upload.base_name);

            transcoder
                .extract_frame(source, VIDEO_THUMBNAIL_AT_SECS, &thumbnail_path)
                .await?;
            info!("Screenshot taken: {}", thumbnail_path.display());

            transcoder
                .trim(
                    source,
                    VIDEO_CLIP_START_SECS,
                    VIDEO_CLIP_DURATION_SECS,
                    &clip_path,
                )
                .await?;
            info!(
                "{}-second clip created: {}",
                VIDEO_CLIP_DURATION_SECS,
                clip_path.display()
            );

            Ok(DerivativeRecord {
                video_thumbnail: Some(path_string(&thumbnail_path)),
                video_clip: Some(path_string(&clip_path)),
                full_video_file: Some(path_string(source)),
                ..Default::default()
            })
        }
        MediaKind::Image => {
            resizer
                .resize_to_width(source, IMAGE_THUMBNAIL_WIDTH, &thumbnail_path)
                .await?;

            Ok(DerivativeRecord {
                image_thumbnail: Some(path_string(&thumbnail_path)),
                full_image_file: Some(path_string(source)),
                ..Default::default()
            })
        }
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

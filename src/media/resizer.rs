// Image collaborator backed by the `image` crate.

use super::error::ProcessingError;
use async_trait::async_trait;
use image::{ImageFormat, ImageReader, Limits, imageops::FilterType};
use std::path::Path;
use tracing::debug;

#[async_trait]
pub trait ImageResizer: Send + Sync {
    /// Scales `source` to `width`, keeping its aspect ratio, and writes a PNG to `output`.
    async fn resize_to_width(
        &self,
        source: &Path,
        width: u32,
        output: &Path,
    ) -> Result<(), ProcessingError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateResizer;

#[async_trait]
impl ImageResizer for ImageCrateResizer {
    async fn resize_to_width(
        &self,
        source: &Path,
        width: u32,
        output: &Path,
    ) -> Result<(), ProcessingError> {
        let source = source.to_path_buf();
        let output = output.to_path_buf();

        // Decoding and resampling are CPU bound.
        tokio::task::spawn_blocking(move || resize_blocking(&source, width, &output)).await?
    }
}

fn resize_blocking(source: &Path, width: u32, output: &Path) -> Result<(), ProcessingError> {
    // Stored uploads carry no extension, so the format is sniffed from the content.
    let img = ImageReader::open(source)?.with_guessed_format()?.decode()?;

    let height = scaled_height(img.width(), img.height(), width);
    debug!(
        "Resizing {}: {}x{} -> {}x{}",
        source.display(),
        img.width(),
        img.height(),
        width,
        height
    );

    reserve_resize(&mut Limits::default(), img.width(), width, height)?;

    let resized = img.resize_exact(width, height, FilterType::Lanczos3);
    resized.save_with_format(output, ImageFormat::Png)?;
    Ok(())
}

/// Charges the buffers a resize allocates against `limits`: the f32 intermediate
/// (source width by target height) and the output, both at four channels.
fn reserve_resize(
    limits: &mut Limits,
    src_width: u32,
    width: u32,
    height: u32,
) -> image::ImageResult<()> {
    let intermediate = u64::from(src_width) * u64::from(height) * 4 * 4;
    let output = u64::from(width) * u64::from(height) * 4;
    limits.reserve(intermediate)?;
    limits.reserve(output)
}

/// Height matching `target_width` with the source aspect ratio, rounded, never zero.
pub(crate) fn scaled_height(src_width: u32, src_height: u32, target_width: u32) -> u32 {
    if src_width == 0 {
        return 1;
    }
    let height = (src_height as f64 * target_width as f64 / src_width as f64).round() as u32;
    height.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    #[test]
    fn test_scaled_height() {
        assert_eq!(scaled_height(1000, 800, 200), 160);
        assert_eq!(scaled_height(100, 100, 200), 200);
        assert_eq!(scaled_height(333, 100, 200), 60);
        assert_eq!(scaled_height(10000, 10, 200), 1);
    }

    #[test]
    fn test_reserve_resize_rejects_huge_output() {
        assert!(reserve_resize(&mut Limits::default(), 1000, 200, 160).is_ok());
        assert!(matches!(
            reserve_resize(&mut Limits::default(), 1, 200, 20_000_000),
            Err(image::ImageError::Limits(_))
        ));
    }

    #[tokio::test]
    async fn test_resize_tall_thin_image_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("upload");
        let output = dir.path().join("out.png");
        // Tiny on disk, but a 200 px wide thumbnail would be 20 million rows tall.
        RgbImage::new(1, 100_000)
            .save_with_format(&source, ImageFormat::Png)
            .unwrap();

        let err = ImageCrateResizer
            .resize_to_width(&source, 200, &output)
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessingError::Image(_)));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_resize_png_preserves_aspect() {
        let dir = tempfile::tempdir().unwrap();
        // No extension, like a stored upload.
        let source = dir.path().join("upload");
        let output = dir.path().join("upload_thumbnail.png");
        RgbImage::from_pixel(1000, 800, Rgb([10, 200, 30]))
            .save_with_format(&source, ImageFormat::Png)
            .unwrap();

        ImageCrateResizer
            .resize_to_width(&source, 200, &output)
            .await
            .unwrap();

        let thumb = image::open(&output).unwrap();
        assert_eq!(thumb.dimensions(), (200, 160));
        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    }

    #[tokio::test]
    async fn test_resize_jpeg_source_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("upload");
        let output = dir.path().join("out.png");
        RgbImage::from_pixel(50, 100, Rgb([0, 0, 0]))
            .save_with_format(&source, ImageFormat::Jpeg)
            .unwrap();

        ImageCrateResizer
            .resize_to_width(&source, 200, &output)
            .await
            .unwrap();

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
        assert_eq!(image::open(&output).unwrap().dimensions(), (200, 400));
    }

    #[tokio::test]
    async fn test_resize_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("upload");
        std::fs::write(&source, b"definitely not an image").unwrap();

        let err = ImageCrateResizer
            .resize_to_width(&source, 200, &dir.path().join("out.png"))
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessingError::Image(_)));
        assert!(!dir.path().join("out.png").exists());
    }
}

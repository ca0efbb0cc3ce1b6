// Filesystem layout for uploaded originals and their generated derivatives.

use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Directories the handlers read from and write to.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    pub uploads_dir: PathBuf,
    pub processed_dir: PathBuf,
}

impl StorageLayout {
    pub fn new(uploads_dir: impl Into<PathBuf>, processed_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
            processed_dir: processed_dir.into(),
        }
    }

    /// Creates both directories if they are missing.
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.uploads_dir).await?;
        tokio::fs::create_dir_all(&self.processed_dir).await?;
        Ok(())
    }

    /// Reserves a fresh base name and the path its original will be stored at.
    pub fn allocate_upload(&self) -> (String, PathBuf) {
        let base_name = Uuid::new_v4().simple().to_string();
        let path = self.uploads_dir.join(&base_name);
        (base_name, path)
    }

    pub fn thumbnail_path(&self, base_name: &str) -> PathBuf {
        self.processed_dir.join(format!("{}_thumbnail.png", base_name))
    }

    pub fn clip_path(&self, base_name: &str) -> PathBuf {
        self.processed_dir.join(format!("{}_clip.mp4", base_name))
    }
}

/// A file received from a client and already written to the uploads directory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub stored_path: PathBuf,
    pub base_name: String,
}

impl UploadedFile {
    /// Lowercased extension of the client-supplied filename, without the dot.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uploaded(name: &str) -> UploadedFile {
        UploadedFile {
            original_name: name.to_string(),
            stored_path: PathBuf::from("uploads/x"),
            base_name: "x".to_string(),
        }
    }

    #[test]
    fn test_derivative_paths_use_base_name() {
        let layout = StorageLayout::new("uploads", "processed");
        assert_eq!(
            layout.thumbnail_path("abc"),
            PathBuf::from("processed/abc_thumbnail.png")
        );
        assert_eq!(
            layout.clip_path("abc"),
            PathBuf::from("processed/abc_clip.mp4")
        );
    }

    #[test]
    fn test_allocate_upload_is_unique_and_inside_uploads_dir() {
        let layout = StorageLayout::new("uploads", "processed");
        let (first_name, first_path) = layout.allocate_upload();
        let (second_name, _) = layout.allocate_upload();

        assert_ne!(first_name, second_name);
        assert_eq!(first_name.len(), 32);
        assert!(first_name.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(first_path, PathBuf::from("uploads").join(&first_name));
    }

    #[test]
    fn test_extension_is_lowercased() {
        assert_eq!(uploaded("CLIP.MOV").extension().as_deref(), Some("mov"));
        assert_eq!(uploaded("a/b/photo.Jpeg").extension().as_deref(), Some("jpeg"));
        assert_eq!(uploaded("archive.tar.mp4").extension().as_deref(), Some("mp4"));
    }

    #[test]
    fn test_extension_missing() {
        assert_eq!(uploaded("README").extension(), None);
        assert_eq!(uploaded(".png").extension(), None);
        assert_eq!(uploaded("").extension(), None);
    }

    #[tokio::test]
    async fn test_ensure_dirs_creates_both() {
        let root = tempfile::tempdir().unwrap();
        let layout = StorageLayout::new(root.path().join("u"), root.path().join("p/q"));

        layout.ensure_dirs().await.unwrap();
        // Second call is a no-op.
        layout.ensure_dirs().await.unwrap();

        assert!(layout.uploads_dir.is_dir());
        assert!(layout.processed_dir.is_dir());
    }
}

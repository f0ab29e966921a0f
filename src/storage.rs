//! Disk-backed store for uploaded post images.
//!
//! Blobs land under `<root>/posts/<uuid>.<ext>`; the post row keeps the
//! relative path. Rendering and serving the files is the web layer's
//! business, not ours.

use std::fs;
use std::path::PathBuf;

use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::forms::ImageUpload;

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Write a validated image and return its relative media path.
    pub fn store_post_image(&self, image: &ImageUpload) -> Result<String> {
        let relative = format!("posts/{}.{}", Uuid::new_v4(), image.extension);
        let path = self.root.join(&relative);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &image.bytes)?;

        debug!(path = %path.display(), bytes = image.bytes.len(), "stored post image");
        Ok(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_bytes_under_posts_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = MediaStore::new(dir.path());

        let image = ImageUpload {
            bytes: vec![1, 2, 3],
            extension: "png",
        };
        let relative = store.store_post_image(&image).expect("store");

        assert!(relative.starts_with("posts/"));
        assert!(relative.ends_with(".png"));
        assert_eq!(fs::read(dir.path().join(&relative)).unwrap(), vec![1, 2, 3]);
    }
}

//! Image asset lifecycle.
//!
//! Uploaded files live under one uploads root and are referenced from
//! products as web paths (`/uploads/<name>`). This module owns three
//! things: storing freshly uploaded bytes, merging upload results with
//! caller-supplied existing references into the final image list, and
//! best-effort cleanup when a product is deleted.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::Rng;

use bijoux_core::Product;

use crate::store;

/// Web path prefix under which uploads are served.
pub const WEB_PREFIX: &str = "/uploads/";

/// Per-file upload size ceiling (10 MiB).
pub const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

/// Maximum uploaded images per request.
pub const MAX_FILES_PER_REQUEST: usize = 5;

/// Handle to the uploads directory.
#[derive(Debug, Clone)]
pub struct Assets {
    root: PathBuf,
}

impl Assets {
    /// Create the handle, ensuring the uploads directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(root: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Store uploaded bytes under a fresh collision-resistant filename,
    /// returning the web path to reference it by.
    ///
    /// The filename keeps the original extension so image content types
    /// survive; everything else about the original name is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> store::Result<String> {
        let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
        let extension = Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or_else(String::new, |ext| format!(".{ext}"));
        let name = format!("{}-{suffix}{extension}", Utc::now().timestamp_millis());

        tokio::fs::write(self.root.join(&name), bytes).await?;
        Ok(format!("{WEB_PREFIX}{name}"))
    }

    /// Delete every image file a removed product references, best-effort.
    ///
    /// Runs after the record removal (record-then-files order): a missing
    /// file is a no-op and any other failure is logged, never raised, so
    /// the delete as a whole cannot fail here.
    pub async fn remove_product_images(&self, product: &Product) {
        let mut refs: Vec<&str> = product.images.iter().map(String::as_str).collect();
        // Legacy single-image records may reference a file outside the list.
        if !product.image.is_empty() && !product.images.contains(&product.image) {
            refs.push(&product.image);
        }

        for web_path in refs {
            let Some(path) = self.resolve(web_path) else {
                tracing::warn!(web_path, "skipping image reference outside uploads root");
                continue;
            };
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "failed to delete image file");
                }
            }
        }
    }

    /// Map a web path back to a file under the uploads root.
    ///
    /// Returns `None` for references that do not use the uploads prefix or
    /// that try to traverse out of the root.
    fn resolve(&self, web_path: &str) -> Option<PathBuf> {
        let name = web_path.strip_prefix(WEB_PREFIX)?;
        let name = Path::new(name);
        let is_plain_file = name
            .components()
            .all(|c| matches!(c, std::path::Component::Normal(_)))
            && name.components().count() == 1;
        is_plain_file.then(|| self.root.join(name))
    }

    /// Uploads root on disk, for serving static files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Merge caller-supplied existing references with newly stored uploads and
/// resolve the primary image.
///
/// Existing references come first, preserving caller order; uploads are
/// appended. The primary is the explicit choice when supplied, otherwise
/// the first element of the merged list, otherwise empty.
#[must_use]
pub fn merge_images(
    existing: Vec<String>,
    uploaded: Vec<String>,
    explicit_primary: Option<String>,
) -> (Vec<String>, String) {
    let mut images = existing;
    images.extend(uploaded);

    let primary = explicit_primary
        .filter(|image| !image.is_empty())
        .or_else(|| images.first().cloned())
        .unwrap_or_default();

    (images, primary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_existing_first() {
        let (images, primary) = merge_images(
            vec!["/uploads/a.png".to_string()],
            vec!["/uploads/b.png".to_string()],
            None,
        );
        assert_eq!(images, vec!["/uploads/a.png", "/uploads/b.png"]);
        assert_eq!(primary, "/uploads/a.png");
    }

    #[test]
    fn explicit_primary_wins() {
        let (_, primary) = merge_images(
            vec!["/uploads/a.png".to_string()],
            vec!["/uploads/b.png".to_string()],
            Some("/uploads/b.png".to_string()),
        );
        assert_eq!(primary, "/uploads/b.png");
    }

    #[test]
    fn empty_merge_has_empty_primary() {
        let (images, primary) = merge_images(Vec::new(), Vec::new(), None);
        assert!(images.is_empty());
        assert_eq!(primary, "");
    }

    #[test]
    fn resolve_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let assets = Assets::new(dir.path()).unwrap();
        assert!(assets.resolve("/uploads/../etc/passwd").is_none());
        assert!(assets.resolve("/elsewhere/a.png").is_none());
        assert!(assets.resolve("/uploads/a.png").is_some());
    }

    #[tokio::test]
    async fn save_keeps_extension_and_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let assets = Assets::new(dir.path()).unwrap();

        let web_path = assets.save("ring.png", b"bytes").await.unwrap();
        assert!(web_path.starts_with(WEB_PREFIX));
        assert!(web_path.ends_with(".png"));

        let stored = assets.resolve(&web_path).unwrap();
        assert_eq!(tokio::fs::read(stored).await.unwrap(), b"bytes");
    }

    #[tokio::test]
    async fn remove_tolerates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let assets = Assets::new(dir.path()).unwrap();

        let kept = assets.save("a.png", b"a").await.unwrap();
        let mut product = Product::from_draft(bijoux_core::ProductDraft {
            name: "Ring".to_string(),
            images: vec![kept.clone(), "/uploads/never-existed.png".to_string()],
            ..Default::default()
        });
        product.image.clone_from(&kept);

        assets.remove_product_images(&product).await;
        assert!(!assets.resolve(&kept).unwrap().exists());
    }
}

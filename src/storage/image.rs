//! Image lookup for embedded figures.

use super::{join_vault_path, parent_folder, Storage};
use crate::error::{Error, Result};
use crate::model::ImageResource;
use async_trait::async_trait;

/// Resolves an image reference found in a note to its binary content.
#[async_trait]
pub trait ImageResolver: Send + Sync {
    /// Resolve `src` as referenced from the note at `source_location`.
    ///
    /// Returns `Ok(None)` when the image does not exist. Failing to read an
    /// image that does exist is an error.
    async fn resolve(&self, source_location: Option<&str>, src: &str) -> Result<Option<ImageResource>>;
}

/// Resolver that looks next to the note first, then from the storage root.
pub struct StorageImageResolver<'a> {
    storage: &'a dyn Storage,
}

impl<'a> StorageImageResolver<'a> {
    /// Create a resolver over a storage backend.
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// Candidate paths for an image reference, in lookup order.
    pub fn candidates(source_location: Option<&str>, src: &str) -> Vec<String> {
        let clean = src.replace('\\', "/");
        let near = match source_location.map(parent_folder) {
            Some(folder) if !folder.is_empty() => join_vault_path(&[folder, &clean]),
            _ => join_vault_path(&[&clean]),
        };
        let from_root = join_vault_path(&[&clean]);

        if near == from_root {
            vec![near]
        } else {
            vec![near, from_root]
        }
    }
}

#[async_trait]
impl ImageResolver for StorageImageResolver<'_> {
    async fn resolve(&self, source_location: Option<&str>, src: &str) -> Result<Option<ImageResource>> {
        for path in Self::candidates(source_location, src) {
            if !self.storage.is_file(&path).await {
                continue;
            }
            let data = self
                .storage
                .read_binary(&path)
                .await
                .map_err(|source| Error::ImageUnreadable {
                    path: path.clone(),
                    source,
                })?;
            log::debug!("resolved image {} -> {} ({} bytes)", src, path, data.len());
            return Ok(Some(ImageResource::new(data, path)));
        }

        log::warn!("image not found: {}", src);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    #[test]
    fn test_candidates() {
        assert_eq!(
            StorageImageResolver::candidates(Some("notes/a.md"), "img\\x.png"),
            vec!["notes/img/x.png".to_string(), "img/x.png".to_string()]
        );
        assert_eq!(
            StorageImageResolver::candidates(Some("a.md"), "x.png"),
            vec!["x.png".to_string()]
        );
        assert_eq!(
            StorageImageResolver::candidates(None, "x.png"),
            vec!["x.png".to_string()]
        );
    }

    #[tokio::test]
    async fn test_prefers_note_folder() {
        let storage = MemoryStorage::new()
            .with_file("notes/x.png", PNG)
            .with_file("x.png", b"GIF89a-root".to_vec());
        let resolver = StorageImageResolver::new(&storage);

        let image = resolver.resolve(Some("notes/a.md"), "x.png").await.unwrap().unwrap();
        assert_eq!(image.path, "notes/x.png");
        assert_eq!(image.mime_type, "image/png");

        let image = resolver.resolve(Some("other/b.md"), "x.png").await.unwrap().unwrap();
        assert_eq!(image.path, "x.png");
    }

    #[tokio::test]
    async fn test_skips_folder_with_image_name() {
        let storage = MemoryStorage::new().with_file("x.png", PNG);
        storage.ensure_folder("notes/x.png").await.unwrap();
        let resolver = StorageImageResolver::new(&storage);

        let image = resolver.resolve(Some("notes/a.md"), "x.png").await.unwrap().unwrap();
        assert_eq!(image.path, "x.png");

        let empty = MemoryStorage::new();
        empty.ensure_folder("pics").await.unwrap();
        let resolver = StorageImageResolver::new(&empty);
        assert!(resolver.resolve(None, "pics").await.unwrap().is_none());
    }

    /// Storage whose files are listed but cannot be read.
    struct LockedStorage;

    #[async_trait]
    impl Storage for LockedStorage {
        async fn read_text(&self, _path: &str) -> std::io::Result<String> {
            Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied))
        }

        async fn read_binary(&self, _path: &str) -> std::io::Result<Vec<u8>> {
            Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied))
        }

        async fn exists(&self, _path: &str) -> bool {
            true
        }

        async fn is_file(&self, _path: &str) -> bool {
            true
        }

        async fn write_binary(&self, _path: &str, _data: &[u8]) -> std::io::Result<()> {
            Ok(())
        }

        async fn ensure_folder(&self, _path: &str) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_unreadable_image_is_error() {
        let resolver = StorageImageResolver::new(&LockedStorage);
        let err = resolver.resolve(Some("notes/a.md"), "x.png").await.unwrap_err();

        match err {
            Error::ImageUnreadable { path, source } => {
                assert_eq!(path, "notes/x.png");
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_image() {
        let storage = MemoryStorage::new();
        let resolver = StorageImageResolver::new(&storage);
        assert!(resolver.resolve(Some("a.md"), "nope.png").await.unwrap().is_none());
    }
}

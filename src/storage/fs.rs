//! Filesystem-backed storage rooted at a vault folder.

use super::Storage;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Storage over a local folder. Vault paths resolve relative to the root.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Create storage rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the root folder.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a vault path to a local path.
    pub fn full_path(&self, path: &str) -> PathBuf {
        let relative = super::join_vault_path(&[path]);
        if relative.is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        }
    }
}

#[async_trait]
impl Storage for FsStorage {
    async fn read_text(&self, path: &str) -> io::Result<String> {
        fs::read_to_string(self.full_path(path)).await
    }

    async fn read_binary(&self, path: &str) -> io::Result<Vec<u8>> {
        fs::read(self.full_path(path)).await
    }

    async fn exists(&self, path: &str) -> bool {
        fs::try_exists(self.full_path(path)).await.unwrap_or(false)
    }

    async fn is_file(&self, path: &str) -> bool {
        fs::metadata(self.full_path(path))
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    async fn write_binary(&self, path: &str, data: &[u8]) -> io::Result<()> {
        let full = self.full_path(path);
        log::debug!("writing {} bytes to {}", data.len(), full.display());
        fs::write(full, data).await
    }

    async fn ensure_folder(&self, path: &str) -> io::Result<()> {
        fs::create_dir_all(self.full_path(path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_path_stays_under_root() {
        let storage = FsStorage::new("/vault");
        assert_eq!(storage.full_path("notes/a.md"), PathBuf::from("/vault/notes/a.md"));
        assert_eq!(storage.full_path("/abs.md"), PathBuf::from("/vault/abs.md"));
        assert_eq!(storage.full_path("../../etc/passwd"), PathBuf::from("/vault/etc/passwd"));
        assert_eq!(storage.full_path(""), PathBuf::from("/vault"));
    }

    #[tokio::test]
    async fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());

        storage.ensure_folder("out/nested").await.unwrap();
        storage.write_binary("out/nested/x.bin", &[1, 2, 3]).await.unwrap();

        assert!(storage.exists("out/nested/x.bin").await);
        assert!(!storage.exists("out/missing.bin").await);
        assert!(storage.is_file("out/nested/x.bin").await);
        assert!(storage.exists("out/nested").await);
        assert!(!storage.is_file("out/nested").await);
        assert_eq!(storage.read_binary("out/nested/x.bin").await.unwrap(), vec![1, 2, 3]);
    }
}

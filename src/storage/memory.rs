//! In-memory storage.

use super::{join_vault_path, Storage};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::sync::Mutex;

/// Storage kept entirely in memory, keyed by normalized vault path.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
    folders: Mutex<BTreeSet<String>>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file.
    pub fn with_file(self, path: &str, data: impl Into<Vec<u8>>) -> Self {
        self.insert(path, data);
        self
    }

    /// Insert or replace a file.
    pub fn insert(&self, path: &str, data: impl Into<Vec<u8>>) {
        let mut files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        files.insert(join_vault_path(&[path]), data.into());
    }

    /// Get a copy of a file's content.
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        let files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        files.get(&join_vault_path(&[path])).cloned()
    }

    /// List every stored file path.
    pub fn paths(&self) -> Vec<String> {
        let files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        files.keys().cloned().collect()
    }

    fn not_found(path: &str) -> io::Error {
        io::Error::new(io::ErrorKind::NotFound, format!("{path} not found"))
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read_text(&self, path: &str) -> io::Result<String> {
        let data = self.get(path).ok_or_else(|| Self::not_found(path))?;
        String::from_utf8(data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    async fn read_binary(&self, path: &str) -> io::Result<Vec<u8>> {
        self.get(path).ok_or_else(|| Self::not_found(path))
    }

    async fn exists(&self, path: &str) -> bool {
        let key = join_vault_path(&[path]);
        let has_file = self
            .files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(&key);
        has_file
            || self
                .folders
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .contains(&key)
    }

    async fn is_file(&self, path: &str) -> bool {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(&join_vault_path(&[path]))
    }

    async fn write_binary(&self, path: &str, data: &[u8]) -> io::Result<()> {
        self.insert(path, data.to_vec());
        Ok(())
    }

    async fn ensure_folder(&self, path: &str) -> io::Result<()> {
        let mut folders = self.folders.lock().unwrap_or_else(|e| e.into_inner());
        folders.insert(join_vault_path(&[path]));
        Ok(())
    }
}

//! Storage collaborator.
//!
//! The exporter reads notes and images and writes the output through the
//! [`Storage`] trait. Paths are vault-relative, `/`-separated strings; use
//! [`join_vault_path`] to build them.

mod fs;
mod image;
mod memory;

pub use fs::FsStorage;
pub use image::{ImageResolver, StorageImageResolver};
pub use memory::MemoryStorage;

use async_trait::async_trait;
use std::io;

/// Asynchronous access to a tree of text and binary files.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read a UTF-8 text file.
    async fn read_text(&self, path: &str) -> io::Result<String>;

    /// Read a binary file.
    async fn read_binary(&self, path: &str) -> io::Result<Vec<u8>>;

    /// Check if a file or folder exists.
    async fn exists(&self, path: &str) -> bool;

    /// Check if a regular file exists. Folders do not count.
    async fn is_file(&self, path: &str) -> bool;

    /// Write a binary file, replacing any existing content.
    async fn write_binary(&self, path: &str, data: &[u8]) -> io::Result<()>;

    /// Create a folder (and its parents) if it does not exist yet.
    async fn ensure_folder(&self, path: &str) -> io::Result<()>;
}

/// Join path segments into a normalized vault path.
///
/// Backslashes become `/`, empty and `.` segments are dropped, `..` pops the
/// previous segment and never escapes the root. The result has no leading or
/// trailing slash; the root itself is the empty string.
pub fn join_vault_path(parts: &[&str]) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for part in parts {
        for segment in part.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                s => segments.push(s),
            }
        }
    }

    segments.join("/")
}

/// Folder containing a vault path, or the root for top-level files.
pub fn parent_folder(path: &str) -> &str {
    path.rfind('/').map_or("", |i| &path[..i])
}

/// File name without folder and extension.
pub fn file_stem(path: &str) -> &str {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match name.rfind('.') {
        Some(i) if i > 0 => &name[..i],
        _ => name,
    }
}

//! Filesystem access for static files
//!
//! The static file responder only needs two operations, so the storage
//! behind it is pluggable: the host filesystem, or an in-memory map for tests
//! and for assets baked into a firmware image.

use bytes::Bytes;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Read-only file access used by [`StaticFiles`](crate::StaticFiles)
pub trait FileSystem: Send + Sync {
    /// True if `path` names a readable regular file
    fn exists(&self, path: &Path) -> bool;

    /// Whole contents of the file at `path`
    fn read(&self, path: &Path) -> io::Result<Bytes>;
}

/// Host filesystem through `std::fs`
///
/// Every call opens and closes its own handle; nothing is cached, so files
/// added while serving are visible on the next request.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
    }

    fn read(&self, path: &Path) -> io::Result<Bytes> {
        std::fs::read(path).map(Bytes::from)
    }
}

/// In-memory file map
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: HashMap<PathBuf, Bytes>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file
    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<Bytes>) -> &mut Self {
        self.files.insert(path.into(), contents.into());
        self
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Bytes>) -> Self {
        self.insert(path, contents);
        self
    }
}

impl FileSystem for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read(&self, path: &Path) -> io::Result<Bytes> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }
}

//! Static file serving handler
//!
//! Fallback for requests no route matched. Looks the path up under a fixed
//! root and, when the file itself is missing, serves a `.gzip` sibling with
//! `Content-Encoding: gzip` instead.

use crate::fs::{FileSystem, LocalFs};
use crate::{Response, Result};
use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// Suffix of precompressed variants
pub const GZIP_SUFFIX: &str = ".gzip";

/// Static file configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFileConfig {
    /// Root directory
    pub root: PathBuf,
    /// File served for paths ending in `/`
    pub index: String,
}

impl Default for StaticFileConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/static"),
            index: "index.html".to_string(),
        }
    }
}

impl StaticFileConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    pub fn index(mut self, name: impl Into<String>) -> Self {
        self.index = name.into();
        self
    }
}

/// A file chosen to answer a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAsset {
    /// Request path without query string
    pub logical_path: String,
    /// File that will be read
    pub resolved_path: PathBuf,
    /// Derived from the extension of the un-suffixed name
    pub content_type: &'static str,
    /// `Some("gzip")` when the `.gzip` variant was substituted
    pub content_encoding: Option<&'static str>,
}

/// Static file handler
pub struct StaticFiles {
    config: StaticFileConfig,
    fs: Box<dyn FileSystem>,
}

impl StaticFiles {
    pub fn new(config: StaticFileConfig, fs: impl FileSystem + 'static) -> Self {
        Self {
            config,
            fs: Box::new(fs),
        }
    }

    /// Serve static files from a directory on the host filesystem
    pub fn serve(root: impl Into<PathBuf>) -> Self {
        Self::new(StaticFileConfig::new(root), LocalFs)
    }

    /// Pick the file for a request path
    ///
    /// Returns `None` when neither the file nor its `.gzip` variant exists,
    /// or when the path tries to leave the root.
    pub fn resolve(&self, path: &str) -> Option<StaticAsset> {
        let logical = path.split_once('?').map_or(path, |(p, _)| p);

        let mut relative = self.sanitize_path(logical)?;
        if logical.ends_with('/') {
            relative.push(&self.config.index);
        }
        let candidate = self.config.root.join(&relative);
        let content_type = mime_type(&candidate);

        if self.fs.exists(&candidate) {
            return Some(StaticAsset {
                logical_path: logical.to_string(),
                resolved_path: candidate,
                content_type,
                content_encoding: None,
            });
        }

        let mut gzipped = OsString::from(candidate.as_os_str());
        gzipped.push(GZIP_SUFFIX);
        let gzipped = PathBuf::from(gzipped);
        if self.fs.exists(&gzipped) {
            return Some(StaticAsset {
                logical_path: logical.to_string(),
                resolved_path: gzipped,
                content_type,
                content_encoding: Some("gzip"),
            });
        }

        None
    }

    /// Resolve and read a file into a response
    ///
    /// `Ok(None)` means not found. A file that vanished between lookup and
    /// read also counts as not found; other read failures are errors.
    pub fn handle(&self, path: &str) -> Result<Option<Response>> {
        let Some(asset) = self.resolve(path) else {
            return Ok(None);
        };

        match self.fs.read(&asset.resolved_path) {
            Ok(contents) => Ok(Some(Response::from_asset(&asset, contents))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Turn a request path into a path relative to the root
    ///
    /// Rejects `..` components.
    fn sanitize_path(&self, path: &str) -> Option<PathBuf> {
        let trimmed = path.trim_start_matches('/');

        let mut result = PathBuf::new();
        for component in Path::new(trimmed).components() {
            match component {
                Component::Normal(c) => result.push(c),
                Component::ParentDir => {
                    warn!(path, "rejected static path outside root");
                    return None;
                }
                Component::Prefix(_) => return None,
                Component::RootDir | Component::CurDir => {}
            }
        }

        Some(result)
    }
}

impl std::fmt::Debug for StaticFiles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticFiles").field("config", &self.config).finish_non_exhaustive()
    }
}

/// Content type for a file name, by extension
pub fn mime_type(path: &Path) -> &'static str {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext.to_lowercase().as_str() {
        // Text
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain",
        "csv" => "text/csv",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",

        // Documents
        "pdf" => "application/pdf",

        // WebAssembly
        "wasm" => "application/wasm",

        // Default
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFs;
    use crate::StatusCode;
    use bytes::Bytes;

    fn files() -> StaticFiles {
        let fs = MemoryFs::new()
            .with_file("/static/testing.txt", "Testing 1 2 3")
            .with_file("/static/index.html", "<title>Testing</title>")
            .with_file("/static/style.css.gzip", vec![0x1f_u8, 0x8b, 0x08])
            .with_file("/static/app.js", "plain")
            .with_file("/static/app.js.gzip", "compressed")
            .with_file("/static/docs/index.html", "docs");
        StaticFiles::new(StaticFileConfig::default(), fs)
    }

    #[test]
    fn test_resolve_literal_file() {
        let asset = files().resolve("/testing.txt").unwrap();

        assert_eq!(asset.resolved_path, PathBuf::from("/static/testing.txt"));
        assert_eq!(asset.content_type, "text/plain");
        assert_eq!(asset.content_encoding, None);
    }

    #[test]
    fn test_gzip_substitution() {
        let asset = files().resolve("/style.css").unwrap();

        assert_eq!(asset.logical_path, "/style.css");
        assert_eq!(asset.resolved_path, PathBuf::from("/static/style.css.gzip"));
        assert_eq!(asset.content_type, "text/css");
        assert_eq!(asset.content_encoding, Some("gzip"));
    }

    #[test]
    fn test_literal_file_preferred_over_gzip() {
        let asset = files().resolve("/app.js").unwrap();

        assert_eq!(asset.resolved_path, PathBuf::from("/static/app.js"));
        assert_eq!(asset.content_encoding, None);
        assert_eq!(asset.content_type, "application/javascript");
    }

    #[test]
    fn test_index_file() {
        let handler = files();
        assert_eq!(
            handler.resolve("/").unwrap().resolved_path,
            PathBuf::from("/static/index.html")
        );
        assert_eq!(
            handler.resolve("/docs/").unwrap().resolved_path,
            PathBuf::from("/static/docs/index.html")
        );
        assert!(handler.resolve("/docs").is_none());
    }

    #[test]
    fn test_query_string_ignored() {
        let asset = files().resolve("/testing.txt?v=2").unwrap();
        assert_eq!(asset.logical_path, "/testing.txt");
    }

    #[test]
    fn test_missing_file() {
        assert!(files().resolve("/bogus.txt").is_none());
    }

    #[test]
    fn test_traversal_rejected() {
        let fs = MemoryFs::new().with_file("/etc/passwd", "root");
        let handler = StaticFiles::new(StaticFileConfig::new("/static"), fs);

        assert!(handler.resolve("/../etc/passwd").is_none());
        assert!(handler.resolve("/docs/../../etc/passwd").is_none());
    }

    #[test]
    fn test_handle_reads_contents() {
        let res = files().handle("/style.css").unwrap().unwrap();

        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.header("Content-Encoding"), Some("gzip"));
        assert_eq!(res.content_type(), Some("text/css"));
        assert_eq!(res.body, Bytes::from(vec![0x1f, 0x8b, 0x08]));

        assert!(files().handle("/nope.html").unwrap().is_none());
    }

    #[test]
    fn test_local_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.html"), "<p>Testing 1 2 3</p>").unwrap();

        let handler = StaticFiles::serve(dir.path());
        let res = handler.handle("/").unwrap().unwrap();
        assert_eq!(res.content_type(), Some("text/html"));
        assert_eq!(res.body_string().as_deref(), Some("<p>Testing 1 2 3</p>"));
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(mime_type(Path::new("index.html")), "text/html");
        assert_eq!(mime_type(Path::new("style.css")), "text/css");
        assert_eq!(mime_type(Path::new("app.js")), "application/javascript");
        assert_eq!(mime_type(Path::new("data.json")), "application/json");
        assert_eq!(mime_type(Path::new("logo.svg")), "image/svg+xml");
        assert_eq!(mime_type(Path::new("LOGO.PNG")), "image/png");
        assert_eq!(mime_type(Path::new("firmware.bin")), "application/octet-stream");
        assert_eq!(mime_type(Path::new("unknown")), "application/octet-stream");
    }
}

//! Dispatcher configuration

use crate::handlers::StaticFileConfig;
use crate::parser::ReadLimits;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for one [`Dispatcher`](crate::Dispatcher)
///
/// Passed by value at construction; there is no global configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Bind address for [`Dispatcher::run`](crate::Dispatcher::run)
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Content type for replies that do not choose one
    pub default_content_type: String,
    /// Read window for the request line and headers, in bytes
    pub req_buffer_size: usize,
    /// Largest accepted request body, in bytes
    pub max_body_size: usize,
    /// Time a client gets to deliver the whole request
    pub read_timeout: Duration,
    /// Root directory for static files
    pub static_root: PathBuf,
    /// File served for paths ending in `/`
    pub index_file: String,
    /// `Server` response header
    pub server_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 80,
            default_content_type: "text/plain".to_string(),
            req_buffer_size: 1024,
            max_body_size: 4096,
            read_timeout: Duration::from_secs(5),
            static_root: PathBuf::from("/static"),
            index_file: "index.html".to_string(),
            server_name: "Thimble (Rust)".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn default_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.default_content_type = content_type.into();
        self
    }

    pub fn req_buffer_size(mut self, bytes: usize) -> Self {
        self.req_buffer_size = bytes;
        self
    }

    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.max_body_size = bytes;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn static_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.static_root = root.into();
        self
    }

    pub fn index_file(mut self, name: impl Into<String>) -> Self {
        self.index_file = name.into();
        self
    }

    pub fn server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = name.into();
        self
    }

    /// `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn read_limits(&self) -> ReadLimits {
        ReadLimits {
            max_head: self.req_buffer_size,
            max_body: self.max_body_size,
        }
    }

    pub fn static_files(&self) -> StaticFileConfig {
        StaticFileConfig::new(&self.static_root).index(&self.index_file)
    }
}

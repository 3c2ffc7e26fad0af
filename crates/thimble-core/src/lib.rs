//! thimble-core: a small HTTP responder for microcontroller-class targets
//!
//! One request per connection, handled to completion before the next one is
//! accepted. Requests are parsed from a bounded read window, routed through
//! [`thimble_router`], answered by a handler or a static file, and written
//! back with `Connection: close`.
//!
//! ```no_run
//! use thimble_core::{Config, Dispatcher, Routes};
//!
//! let mut routes = Routes::new();
//! routes.get("/", |_, _| "Hello!")?;
//! routes.get("/items/([0-9]+)", |_, id| format!("item {}", id.unwrap_or_default()))?;
//!
//! Dispatcher::new(Config::default().port(8080), routes).run_blocking()?;
//! # Ok::<(), thimble_core::Error>(())
//! ```
//!
//! ## Features
//! - `native` - TCP accept loop on tokio (default)

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod fs;
pub mod handlers;
pub mod logging;
pub mod parser;
pub mod reply;
pub mod request;
pub mod response;
pub mod router;

#[cfg(feature = "native")]
pub mod server;

// Re-exports
pub use config::Config;
pub use dispatcher::{Dispatched, Dispatcher, Outcome};
pub use error::{Error, Result};
pub use fs::{FileSystem, LocalFs, MemoryFs};
pub use handlers::{StaticAsset, StaticFileConfig, StaticFiles};
pub use parser::Method;
pub use reply::{HandlerError, HandlerResult, IntoHandlerResult, Reply};
pub use request::{Request, RequestBuilder};
pub use response::{Response, ResponseBuilder, StatusCode};
pub use router::Routes;
pub use thimble_router::Resolution;

#[cfg(feature = "native")]
pub use server::{bind_listener, create_listener_socket};

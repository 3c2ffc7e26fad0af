//! Request dispatch
//!
//! One connection in, one response out:
//!
//! ```text
//! AWAITING_REQUEST -> PARSED -> ROUTED -> HANDLED | STATIC_SERVED | NOT_FOUND
//!                  \                  \-> METHOD_NOT_ALLOWED
//!                   \-> MALFORMED
//! ```
//!
//! Every path ends in exactly one written response and a closed connection.
//! Parse errors, handler errors and handler panics are all turned into
//! responses here so the serving loop never stops because of one request.

use crate::fs::{FileSystem, LocalFs};
use crate::handlers::StaticFiles;
use crate::parser::{parse_request, read_request};
use crate::reply::BoxedHandler;
use crate::{Config, Error, Request, Response, Result, Routes};
use std::panic::{self, AssertUnwindSafe};
use thimble_router::Resolution;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::time;
use tracing::{error, info, warn};

/// How a request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A route handler produced the response
    Handled,
    /// A static file was served
    StaticServed,
    /// No route and no file
    NotFound,
    /// The first matching route does not allow the method
    MethodNotAllowed,
    /// The request could not be parsed or was over a limit
    Malformed,
    /// Handler error, handler panic, or unreadable file
    Failed,
}

/// A response and the path that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    pub outcome: Outcome,
    pub response: Response,
}

/// Turns requests into responses
///
/// Owns the configuration, the route table and the static file fallback.
/// Immutable once built, so one instance can serve any number of
/// connections without locking.
#[derive(Debug)]
pub struct Dispatcher {
    config: Config,
    routes: Routes,
    static_files: StaticFiles,
}

impl Dispatcher {
    /// Dispatcher serving static files from the host filesystem
    pub fn new(config: Config, routes: Routes) -> Self {
        Self::with_fs(config, routes, LocalFs)
    }

    /// Dispatcher serving static files from `fs`
    pub fn with_fs(config: Config, routes: Routes, fs: impl FileSystem + 'static) -> Self {
        let static_files = StaticFiles::new(config.static_files(), fs);
        Self {
            config,
            routes,
            static_files,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    /// Route a parsed request
    pub fn dispatch(&self, req: &Request) -> Dispatched {
        let (outcome, response) = match self.routes.resolve(&req.method, &req.path) {
            Resolution::Matched(m) => self.invoke(m.value, req, m.capture.as_deref()),
            Resolution::MethodNotAllowed { allowed } => {
                (Outcome::MethodNotAllowed, Response::method_not_allowed(allowed))
            }
            Resolution::NotFound => self.serve_static(req),
        };

        info!(
            method = %req.method,
            path = %req.path,
            status = response.status.as_u16(),
            outcome = ?outcome,
            "request"
        );
        self.finish(outcome, response)
    }

    /// Response for a request that failed before routing
    pub fn reject(&self, err: &Error) -> Dispatched {
        warn!(error = %err, "rejected request");
        let response = Response::text(err.status(), err.status().reason_phrase());
        self.finish(Outcome::Malformed, response)
    }

    /// Parse and dispatch a complete request held in memory
    pub fn respond(&self, raw: &[u8]) -> Dispatched {
        match parse_request(raw) {
            Ok(req) => self.dispatch(&req),
            Err(e) => self.reject(&e),
        }
    }

    /// Serve one connection
    ///
    /// Reads a request, writes exactly one response, and shuts the write
    /// side down. A request that has not fully arrived within
    /// `read_timeout` is answered with 400. Only transport errors are returned; everything else has
    /// already been answered.
    pub async fn handle_connection<S>(&self, stream: &mut S) -> Result<Outcome>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let limit = self.config.read_timeout;
        let read = match time::timeout(limit, read_request(stream, self.config.read_limits())).await {
            Ok(read) => read,
            Err(_) => Err(Error::malformed(format!("request incomplete after {limit:?}"))),
        };
        let dispatched = match read {
            Ok(req) => self.dispatch(&req),
            Err(Error::Io(e)) => return Err(Error::Io(e)),
            Err(e) => self.reject(&e),
        };

        stream.write_all(&dispatched.response.to_http1_bytes()).await?;
        stream.flush().await?;
        // The response is out; a peer that already hung up is not an error.
        let _ = stream.shutdown().await;

        Ok(dispatched.outcome)
    }

    fn invoke(&self, handler: &BoxedHandler, req: &Request, capture: Option<&str>) -> (Outcome, Response) {
        match panic::catch_unwind(AssertUnwindSafe(|| handler(req, capture))) {
            Ok(Ok(reply)) => (
                Outcome::Handled,
                Response::from_reply(reply, &self.config.default_content_type),
            ),
            Ok(Err(e)) => {
                error!(path = %req.path, error = %e, "handler failed");
                (Outcome::Failed, Response::internal_error())
            }
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_default();
                error!(path = %req.path, panic = %message, "handler panicked");
                (Outcome::Failed, Response::internal_error())
            }
        }
    }

    fn serve_static(&self, req: &Request) -> (Outcome, Response) {
        match self.static_files.handle(&req.path) {
            Ok(Some(response)) => (Outcome::StaticServed, response),
            Ok(None) => (Outcome::NotFound, Response::not_found()),
            Err(e) => {
                error!(path = %req.path, error = %e, "static file read failed");
                (Outcome::Failed, Response::internal_error())
            }
        }
    }

    fn finish(&self, outcome: Outcome, mut response: Response) -> Dispatched {
        response.set_header("Server", self.config.server_name.as_str());
        Dispatched { outcome, response }
    }
}

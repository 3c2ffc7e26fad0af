//! HTTP Response types and wire formatting

use crate::handlers::StaticAsset;
use crate::Reply;
use bytes::{Bytes, BytesMut};
use smallvec::SmallVec;

/// HTTP Status Code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode(pub u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const CREATED: StatusCode = StatusCode(201);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    pub const METHOD_NOT_ALLOWED: StatusCode = StatusCode(405);
    pub const PAYLOAD_TOO_LARGE: StatusCode = StatusCode(413);
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);

    /// Get the numeric code
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Get the reason phrase
    pub fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            304 => "Not Modified",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            409 => "Conflict",
            413 => "Payload Too Large",
            422 => "Unprocessable Entity",
            500 => "Internal Server Error",
            501 => "Not Implemented",
            503 => "Service Unavailable",
            _ => "Unknown",
        }
    }

    /// Code as written on the wire; anything outside 100..=599 becomes 500
    pub fn on_wire(&self) -> StatusCode {
        if (100..=599).contains(&self.0) {
            *self
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

/// HTTP Response
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Status code
    pub status: StatusCode,
    /// Response headers (stack-allocated for small header counts).
    /// `Content-Length` and `Connection` are added when serialising.
    pub headers: SmallVec<[(String, String); 8]>,
    /// Response body
    pub body: Bytes,
}

impl Response {
    /// Create a new response
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: SmallVec::new(),
            body: Bytes::new(),
        }
    }

    /// Plain-text response with a status and body
    pub fn text(status: StatusCode, body: impl Into<Bytes>) -> Self {
        ResponseBuilder::new(status)
            .header("Content-Type", "text/plain")
            .body(body)
            .build()
    }

    /// Build from a handler reply
    ///
    /// `default_content_type` applies when the reply does not choose one.
    /// CR and LF are removed so the value stays on its own header line.
    pub fn from_reply(reply: Reply, default_content_type: &str) -> Self {
        let status = reply.status();
        let content_type = reply
            .content_type()
            .unwrap_or(default_content_type)
            .replace(['\r', '\n'], "");
        ResponseBuilder::new(status)
            .header("Content-Type", content_type)
            .body(reply.into_body())
            .build()
    }

    /// Build from a resolved static file and its contents
    pub fn from_asset(asset: &StaticAsset, contents: impl Into<Bytes>) -> Self {
        let mut builder = ResponseBuilder::new(StatusCode::OK).header("Content-Type", asset.content_type);
        if let Some(encoding) = asset.content_encoding {
            builder = builder.header("Content-Encoding", encoding);
        }
        builder.body(contents).build()
    }

    /// Create a 404 Not Found response
    pub fn not_found() -> Self {
        Self::text(StatusCode::NOT_FOUND, "Not Found")
    }

    /// Create a 405 response listing the allowed methods
    pub fn method_not_allowed(allowed: &[String]) -> Self {
        let mut res = Self::text(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
        res.headers.push(("Allow".to_string(), allowed.join(", ")));
        res
    }

    /// Create a 500 Internal Server Error response
    pub fn internal_error() -> Self {
        Self::text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set a header, replacing an existing one with the same name
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name.to_string(), value)),
        }
    }

    /// Get content-type header
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Get body as string (if UTF-8)
    pub fn body_string(&self) -> Option<String> {
        std::str::from_utf8(&self.body).ok().map(|s| s.to_string())
    }

    /// HTTP/1.1 wire bytes
    ///
    /// `Content-Length` and `Connection: close` are always written here;
    /// copies set by the caller are skipped.
    pub fn to_http1_bytes(&self) -> Bytes {
        let status = self.status.on_wire();
        let mut head = format!("HTTP/1.1 {} {}\r\n", status.0, status.reason_phrase());

        let framing = |name: &str| {
            name.eq_ignore_ascii_case("content-length") || name.eq_ignore_ascii_case("connection")
        };
        for (name, value) in self.headers.iter().filter(|(name, _)| !framing(name.as_str())) {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str(&format!("Content-Length: {}\r\nConnection: close\r\n\r\n", self.body.len()));

        let mut wire = BytesMut::with_capacity(head.len() + self.body.len());
        wire.extend_from_slice(head.as_bytes());
        wire.extend_from_slice(&self.body);
        wire.freeze()
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(StatusCode::OK)
    }
}

/// Builder for constructing responses
pub struct ResponseBuilder {
    response: Response,
}

impl ResponseBuilder {
    /// Create a new builder
    pub fn new(status: StatusCode) -> Self {
        Self {
            response: Response::new(status),
        }
    }

    /// Add a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.response.headers.push((name.into(), value.into()));
        self
    }

    /// Set body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.response.body = body.into();
        self
    }

    /// Build the response
    pub fn build(self) -> Response {
        self.response
    }
}

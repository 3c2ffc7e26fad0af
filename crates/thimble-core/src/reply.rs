//! Handler return values
//!
//! Handlers return anything convertible into a [`Reply`]: text, bytes,
//! numbers, `(body, status)` or `(body, status, content_type)` tuples, or a
//! `Result` of those.

use crate::{Request, StatusCode};
use bytes::Bytes;

/// Error type a handler may fail with
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// What a handler produced
pub type HandlerResult = std::result::Result<Reply, HandlerError>;

/// Boxed route handler; receives the request and the pattern's capture
pub type BoxedHandler = Box<dyn Fn(&Request, Option<&str>) -> HandlerResult + Send + Sync>;

/// Body plus optional status and content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// 200 with the configured default content type
    Body(Bytes),
    /// Explicit status and, optionally, content type
    WithMeta {
        body: Bytes,
        status: u16,
        content_type: Option<String>,
    },
}

impl Reply {
    /// Plain body reply
    pub fn new(body: impl Into<Bytes>) -> Self {
        Reply::Body(body.into())
    }

    /// Set the status code
    pub fn with_status(self, status: u16) -> Self {
        match self {
            Reply::Body(body) => Reply::WithMeta {
                body,
                status,
                content_type: None,
            },
            Reply::WithMeta { body, content_type, .. } => Reply::WithMeta {
                body,
                status,
                content_type,
            },
        }
    }

    /// Set the content type
    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        let status = self.status().as_u16();
        Reply::WithMeta {
            body: self.into_body(),
            status,
            content_type: Some(content_type.into()),
        }
    }

    /// JSON text with `application/json`
    pub fn json(body: impl Into<Bytes>) -> Self {
        Reply::new(body).with_content_type("application/json")
    }

    /// Status code, 200 unless set
    pub fn status(&self) -> StatusCode {
        match self {
            Reply::Body(_) => StatusCode::OK,
            Reply::WithMeta { status, .. } => StatusCode(*status),
        }
    }

    /// Content type, if the handler chose one
    pub fn content_type(&self) -> Option<&str> {
        match self {
            Reply::Body(_) => None,
            Reply::WithMeta { content_type, .. } => content_type.as_deref(),
        }
    }

    /// Body bytes
    pub fn body(&self) -> &Bytes {
        match self {
            Reply::Body(body) | Reply::WithMeta { body, .. } => body,
        }
    }

    /// Take the body
    pub fn into_body(self) -> Bytes {
        match self {
            Reply::Body(body) | Reply::WithMeta { body, .. } => body,
        }
    }
}

impl From<&str> for Reply {
    fn from(s: &str) -> Self {
        Reply::Body(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for Reply {
    fn from(s: String) -> Self {
        Reply::Body(Bytes::from(s))
    }
}

impl From<Vec<u8>> for Reply {
    fn from(v: Vec<u8>) -> Self {
        Reply::Body(Bytes::from(v))
    }
}

impl From<&[u8]> for Reply {
    fn from(v: &[u8]) -> Self {
        Reply::Body(Bytes::copy_from_slice(v))
    }
}

impl From<Bytes> for Reply {
    fn from(b: Bytes) -> Self {
        Reply::Body(b)
    }
}

/// A handler that returns nothing sends an empty 200
impl From<()> for Reply {
    fn from(_: ()) -> Self {
        Reply::Body(Bytes::new())
    }
}

impl<B: Into<Reply>> From<(B, u16)> for Reply {
    fn from((body, status): (B, u16)) -> Self {
        Reply::WithMeta {
            body: body.into().into_body(),
            status,
            content_type: None,
        }
    }
}

impl<B: Into<Reply>, C: Into<String>> From<(B, u16, C)> for Reply {
    fn from((body, status, content_type): (B, u16, C)) -> Self {
        Reply::WithMeta {
            body: body.into().into_body(),
            status,
            content_type: Some(content_type.into()),
        }
    }
}

// Scalars become their text form
macro_rules! reply_from_display {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Reply {
                fn from(v: $t) -> Self {
                    Reply::Body(Bytes::from(v.to_string()))
                }
            }
        )*
    };
}

reply_from_display!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, char);

/// Conversion from a handler's return value into a [`HandlerResult`]
pub trait IntoHandlerResult {
    fn into_handler_result(self) -> HandlerResult;
}

impl<T, E> IntoHandlerResult for std::result::Result<T, E>
where
    T: Into<Reply>,
    E: Into<HandlerError>,
{
    fn into_handler_result(self) -> HandlerResult {
        self.map(Into::into).map_err(Into::into)
    }
}

impl<'a> IntoHandlerResult for &'a str {
    fn into_handler_result(self) -> HandlerResult {
        Ok(self.into())
    }
}

impl<B: Into<Reply>> IntoHandlerResult for (B, u16) {
    fn into_handler_result(self) -> HandlerResult {
        Ok(self.into())
    }
}

impl<B: Into<Reply>, C: Into<String>> IntoHandlerResult for (B, u16, C) {
    fn into_handler_result(self) -> HandlerResult {
        Ok(self.into())
    }
}

macro_rules! into_handler_result {
    ($($t:ty),*) => {
        $(
            impl IntoHandlerResult for $t {
                fn into_handler_result(self) -> HandlerResult {
                    Ok(self.into())
                }
            }
        )*
    };
}

into_handler_result!(
    Reply, String, Vec<u8>, Bytes, (),
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, char
);

//! Reading one request from a connection stream

use super::{body_length, find_head_end, parse_head, HEAD_TERMINATOR};
use crate::{Config, Error, Request, Result};
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

const CHUNK_SIZE: usize = 512;

/// Bounds applied while reading a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadLimits {
    /// Largest request line + headers, terminator included
    pub max_head: usize,
    /// Largest accepted Content-Length
    pub max_body: usize,
}

impl Default for ReadLimits {
    fn default() -> Self {
        Config::default().read_limits()
    }
}

/// Read and parse one request from `stream`
///
/// The head must arrive within `limits.max_head` bytes. The body is read
/// according to `Content-Length`; a stream that ends early is malformed.
pub async fn read_request<R>(stream: &mut R, limits: ReadLimits) -> Result<Request>
where
    R: AsyncRead + Unpin,
{
    let mut buf = BytesMut::with_capacity(limits.max_head.min(1024));
    let mut chunk = [0u8; CHUNK_SIZE];

    let head_end = loop {
        if let Some(end) = find_head_end(&buf) {
            break end;
        }
        if buf.len() >= limits.max_head {
            return Err(Error::HeadersTooLarge {
                limit: limits.max_head,
            });
        }

        let want = (limits.max_head - buf.len()).min(CHUNK_SIZE);
        let n = stream.read(&mut chunk[..want]).await?;
        if n == 0 {
            let reason = if buf.is_empty() {
                "connection closed before request"
            } else {
                "connection closed mid-request"
            };
            return Err(Error::malformed(reason));
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let mut body = buf.split_off(head_end);
    let mut request = parse_head(&buf[..head_end - HEAD_TERMINATOR.len()])?;
    debug!(method = %request.method, path = %request.path, "parsed request line");

    let length = body_length(&request)?;
    if length > limits.max_body {
        return Err(Error::BodyTooLarge {
            size: length,
            limit: limits.max_body,
        });
    }

    if body.len() >= length {
        body.truncate(length);
    } else {
        let have = body.len();
        body.resize(length, 0);
        stream.read_exact(&mut body[have..]).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => {
                Error::malformed(format!("body ended before {length} declared bytes"))
            }
            _ => Error::Io(e),
        })?;
    }
    request.body = body.freeze();

    Ok(request)
}

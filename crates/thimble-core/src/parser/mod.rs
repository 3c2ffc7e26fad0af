//! HTTP/1.x request parser
//!
//! Turns the raw bytes of one connection into a [`Request`]. Only what a tiny
//! device needs: request line, headers, and a `Content-Length` body. No
//! chunked encoding, no percent-decoding, no query splitting.

mod method;
mod reader;

pub use method::Method;
pub use reader::{read_request, ReadLimits};

use crate::{Error, Request, Result};
use bytes::Bytes;

/// Blank line ending the request head
pub const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Offset just past the head terminator, if the buffer contains one
pub fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEAD_TERMINATOR.len())
        .position(|w| w == HEAD_TERMINATOR)
        .map(|i| i + HEAD_TERMINATOR.len())
}

/// Parse the request line and headers
///
/// `head` is everything before the blank line. The returned request has an
/// empty body.
pub fn parse_head(head: &[u8]) -> Result<Request> {
    let head = std::str::from_utf8(head).map_err(|_| Error::malformed("request head is not UTF-8"))?;
    let mut lines = head.split("\r\n");

    // Example first line: GET /page.html HTTP/1.1
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.splitn(3, ' ');
    let (Some(method), Some(path), Some(version)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::malformed(format!("bad request line {request_line:?}")));
    };
    if method.is_empty() || path.is_empty() {
        return Err(Error::malformed(format!("bad request line {request_line:?}")));
    }

    let mut request = Request::new(method, path);
    request.version = version.to_string();

    for line in lines.take_while(|l| !l.is_empty()) {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| Error::malformed(format!("header without colon {line:?}")))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::malformed("empty header name"));
        }
        request.set_header(name, value.trim());
    }

    Ok(request)
}

/// Declared body length; zero when the header is absent
pub fn body_length(request: &Request) -> Result<usize> {
    match request.header("content-length") {
        Some(value) => value
            .parse()
            .map_err(|_| Error::malformed(format!("invalid Content-Length {value:?}"))),
        None => Ok(0),
    }
}

/// Parse a complete request held in memory
///
/// Bytes after the declared body are ignored. A body shorter than its
/// `Content-Length` is malformed.
pub fn parse_request(buf: &[u8]) -> Result<Request> {
    let end = find_head_end(buf).ok_or_else(|| Error::malformed("missing blank line after headers"))?;
    let mut request = parse_head(&buf[..end - HEAD_TERMINATOR.len()])?;

    let length = body_length(&request)?;
    let rest = &buf[end..];
    if rest.len() < length {
        return Err(Error::malformed(format!(
            "body has {} of {} declared bytes",
            rest.len(),
            length
        )));
    }
    request.body = Bytes::copy_from_slice(&rest[..length]);

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_get() {
        let req = parse_request(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").unwrap();

        assert_eq!(req.method, "GET");
        assert_eq!(req.path, "/");
        assert_eq!(req.version, "HTTP/1.1");
        assert_eq!(req.header("host"), Some("localhost"));
        assert!(req.body.is_empty());
    }

    #[test]
    fn test_parse_put_with_body() {
        let raw = b"PUT /gpio/2 HTTP/1.1\r\nHost: 192.168.4.1\r\nUser-Agent: Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:105.0) Gecko/20100101 Firefox/105.0\r\nAccept: */*\r\nContent-Type: text/plain;charset=UTF-8\r\nContent-Length: 2\r\nOrigin: moz-extension://ae025f41\r\nConnection: keep-alive\r\n\r\non";
        let req = parse_request(raw).unwrap();

        assert_eq!(req.method, "PUT");
        assert_eq!(req.path, "/gpio/2");
        assert_eq!(
            req.header("User-Agent"),
            Some("Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:105.0) Gecko/20100101 Firefox/105.0")
        );
        assert_eq!(req.header("origin"), Some("moz-extension://ae025f41"));
        assert_eq!(req.content_type(), Some("text/plain;charset=UTF-8"));
        assert_eq!(&req.body[..], b"on");
    }

    #[test]
    fn test_query_kept_in_path() {
        let req = parse_request(b"GET /users?page=1&limit=10 HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(req.path, "/users?page=1&limit=10");
    }

    #[test]
    fn test_header_value_trimmed() {
        let req = parse_request(b"GET / HTTP/1.1\r\nX-Pad:    spaced \t\r\n\r\n").unwrap();
        assert_eq!(req.header("x-pad"), Some("spaced"));
    }

    #[test]
    fn test_header_value_keeps_later_colons() {
        let req = parse_request(b"GET / HTTP/1.1\r\nHost: 10.0.0.1:8080\r\n\r\n").unwrap();
        assert_eq!(req.header("host"), Some("10.0.0.1:8080"));
    }

    #[test]
    fn test_extra_bytes_after_body_ignored() {
        let req = parse_request(b"POST /x HTTP/1.1\r\nContent-Length: 3\r\n\r\nabcdef").unwrap();
        assert_eq!(&req.body[..], b"abc");
    }

    #[test]
    fn test_body_without_content_length_is_dropped() {
        let req = parse_request(b"POST /x HTTP/1.1\r\n\r\nignored").unwrap();
        assert!(req.body.is_empty());
    }

    #[test]
    fn test_malformed_request_line() {
        assert!(matches!(parse_request(b"GET /\r\n\r\n"), Err(Error::Malformed(_))));
        assert!(matches!(parse_request(b"GARBAGE\r\n\r\n"), Err(Error::Malformed(_))));
        assert!(matches!(parse_request(b"GET  HTTP/1.1\r\n\r\n"), Err(Error::Malformed(_))));
    }

    #[test]
    fn test_malformed_header() {
        let err = parse_request(b"GET / HTTP/1.1\r\nNoColonHere\r\n\r\n").unwrap_err();
        assert!(matches!(err, Error::Malformed(_)));
    }

    #[test]
    fn test_missing_terminator() {
        assert!(matches!(
            parse_request(b"GET / HTTP/1.1\r\nHost: x\r\n"),
            Err(Error::Malformed(_))
        ));
    }

    #[test]
    fn test_truncated_body() {
        assert!(matches!(
            parse_request(b"PUT /x HTTP/1.1\r\nContent-Length: 10\r\n\r\nshort"),
            Err(Error::Malformed(_))
        ));
    }

    #[test]
    fn test_invalid_content_length() {
        assert!(matches!(
            parse_request(b"PUT /x HTTP/1.1\r\nContent-Length: two\r\n\r\non"),
            Err(Error::Malformed(_))
        ));
    }

    #[test]
    fn test_non_utf8_head() {
        assert!(matches!(
            parse_request(b"GET /\xff HTTP/1.1\r\n\r\n"),
            Err(Error::Malformed(_))
        ));
    }

    #[test]
    fn test_find_head_end() {
        assert_eq!(find_head_end(b"GET / HTTP/1.1\r\n\r\nbody"), Some(18));
        assert_eq!(find_head_end(b"GET / HTTP/1.1\r\n"), None);
    }
}

//! HTTP Request types

use bytes::Bytes;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Parsed HTTP request
///
/// Built once per connection by the parser and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Raw method token, e.g. `GET`
    pub method: String,
    /// Raw request target, including any `?query`. Not percent-decoded.
    pub path: String,
    /// Protocol version token, e.g. `HTTP/1.1`
    pub version: String,
    /// Headers with lower-cased names; a repeated name keeps the last value
    headers: SmallVec<[(String, String); 16]>,
    /// Request body
    pub body: Bytes,
}

impl Request {
    /// Create a new request
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            version: "HTTP/1.1".to_string(),
            headers: SmallVec::new(),
            body: Bytes::new(),
        }
    }

    /// Get a header value (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Insert a header, replacing any earlier value with the same name
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        match self.headers.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    /// All headers as `(lower-cased name, value)` pairs
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Get content-type header
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Body as text, if it is valid UTF-8
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Path with any query string removed
    pub fn path_only(&self) -> &str {
        self.path.split_once('?').map_or(self.path.as_str(), |(p, _)| p)
    }

    /// Raw query string (without leading ?)
    pub fn query(&self) -> Option<&str> {
        self.path.split_once('?').map(|(_, q)| q)
    }

    /// Split the query string into key-value pairs
    ///
    /// Values are returned verbatim; `a=1&b` yields `a -> 1` and `b -> ""`.
    pub fn query_params(&self) -> HashMap<String, String> {
        let mut params = HashMap::new();
        if let Some(query) = self.query() {
            for pair in query.split('&').filter(|p| !p.is_empty()) {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                params.insert(key.to_string(), value.to_string());
            }
        }
        params
    }
}

/// Builder for constructing requests
pub struct RequestBuilder {
    request: Request,
}

impl RequestBuilder {
    /// Create a new builder
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            request: Request::new(method, path),
        }
    }

    /// Set the protocol version token
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.request.version = version.into();
        self
    }

    /// Add a header
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.request.set_header(name, value);
        self
    }

    /// Set body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.request.body = body.into();
        self
    }

    /// Build the request
    pub fn build(self) -> Request {
        self.request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_header() {
        let req = RequestBuilder::new("GET", "/")
            .header("Content-Type", "application/json")
            .build();

        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(req.content_type(), Some("application/json"));
    }

    #[test]
    fn test_duplicate_header_overwrites() {
        let req = RequestBuilder::new("GET", "/")
            .header("X-Mode", "a")
            .header("x-mode", "b")
            .build();

        assert_eq!(req.header("X-Mode"), Some("b"));
        assert_eq!(req.headers().count(), 1);
    }

    #[test]
    fn test_body_and_length_header() {
        let req = RequestBuilder::new("PUT", "/gpio/2")
            .header("Content-Length", "2")
            .body("on")
            .build();

        assert_eq!(req.header("content-length"), Some("2"));
        assert_eq!(req.body_str(), Some("on"));
    }

    #[test]
    fn test_query_params() {
        let req = RequestBuilder::new("GET", "/pets?pet=panda&color=red&flag").build();

        assert_eq!(req.path, "/pets?pet=panda&color=red&flag");
        assert_eq!(req.path_only(), "/pets");
        assert_eq!(req.query(), Some("pet=panda&color=red&flag"));

        let params = req.query_params();
        assert_eq!(params.get("pet"), Some(&"panda".to_string()));
        assert_eq!(params.get("color"), Some(&"red".to_string()));
        assert_eq!(params.get("flag"), Some(&String::new()));
    }

    #[test]
    fn test_query_not_decoded() {
        let req = RequestBuilder::new("GET", "/s?q=a%20b").build();
        assert_eq!(req.query_params().get("q"), Some(&"a%20b".to_string()));
    }

    #[test]
    fn test_no_query() {
        let req = Request::new("GET", "/plain");
        assert_eq!(req.query(), None);
        assert!(req.query_params().is_empty());
        assert_eq!(req.path_only(), "/plain");
    }
}

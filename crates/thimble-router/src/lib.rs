//! thimble-router: Ordered first-match HTTP route table
//!
//! Route table used by thimble-core. It stores an arbitrary value per route
//! (thimble-core stores boxed handlers) and knows nothing about requests or
//! responses.
//!
//! ## Features
//! - Literal paths: `/`, `/gpio/2`, `/index.html`
//! - Single-capture patterns: `/items/([0-9]+)`, `/files/(.*)`
//! - Per-route method sets
//!
//! ## Pattern Syntax
//! A pattern containing any of `^ $ * + ? ( ) [ ] { } | \` is compiled as a
//! regular expression anchored at the start of the path. Everything else is
//! compared byte-for-byte. At most one capture group is allowed.
//!
//! ## Priority
//! Routes are tried in registration order and the first route whose pattern
//! matches the path decides the outcome, whatever the method. If that route
//! does not allow the method the result is [`Resolution::MethodNotAllowed`];
//! later routes with the same pattern are never consulted.
//!
//! ## Example
//! ```
//! use thimble_router::{Resolution, Router};
//!
//! let mut router = Router::new();
//! router.insert("/items", &["GET"], 0).unwrap();
//! router.insert("/items/([0-9]+)", &["GET", "PUT"], 1).unwrap();
//!
//! match router.resolve("PUT", "/items/42") {
//!     Resolution::Matched(m) => {
//!         assert_eq!(*m.value, 1);
//!         assert_eq!(m.capture.as_deref(), Some("42"));
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

mod pattern;

pub use pattern::{Pattern, PatternError, PathMatch};

/// A registered route
#[derive(Debug)]
struct Route<T> {
    pattern: Pattern,
    /// Method tokens, upper-cased at registration
    methods: Vec<String>,
    value: T,
}

/// Successful route lookup
#[derive(Debug, PartialEq)]
pub struct Match<'a, T> {
    /// The value registered with the route
    pub value: &'a T,
    /// Text captured by the pattern's group, if it has one
    pub capture: Option<String>,
}

/// Outcome of [`Router::resolve`]
#[derive(Debug, PartialEq)]
pub enum Resolution<'a, T> {
    /// Pattern matched and the method is allowed
    Matched(Match<'a, T>),
    /// The first matching pattern does not allow the method
    MethodNotAllowed {
        /// Methods allowed by that route
        allowed: &'a [String],
    },
    /// No pattern matched the path
    NotFound,
}

/// Append-only ordered route table
///
/// Built once before serving starts and read-only afterwards.
#[derive(Debug)]
pub struct Router<T> {
    routes: Vec<Route<T>>,
}

impl<T> Router<T> {
    /// Create an empty router
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Register a route
    ///
    /// # Arguments
    /// * `pattern` - literal path or single-capture pattern
    /// * `methods` - HTTP method tokens, normalised to upper case
    /// * `value` - value returned on a match
    ///
    /// # Errors
    /// Returns [`PatternError`] if the pattern is not a valid regular
    /// expression or has more than one capture group.
    pub fn insert(&mut self, pattern: &str, methods: &[&str], value: T) -> Result<(), PatternError> {
        let pattern = Pattern::new(pattern)?;
        let methods = methods.iter().map(|m| m.to_uppercase()).collect();
        self.routes.push(Route { pattern, methods, value });
        Ok(())
    }

    /// Resolve a request method and path
    ///
    /// The request method is compared exactly; method tokens are
    /// case-sensitive, so `get` does not match a GET route.
    ///
    /// # Example
    /// ```
    /// use thimble_router::{Resolution, Router};
    ///
    /// let mut router = Router::new();
    /// router.insert("/x", &["GET"], "get").unwrap();
    /// router.insert("/x", &["PUT"], "put").unwrap();
    ///
    /// // The first `/x` route shadows the second one.
    /// assert!(matches!(
    ///     router.resolve("PUT", "/x"),
    ///     Resolution::MethodNotAllowed { .. }
    /// ));
    /// ```
    pub fn resolve(&self, method: &str, path: &str) -> Resolution<'_, T> {
        for route in &self.routes {
            let Some(matched) = route.pattern.matches(path) else {
                continue;
            };

            if route.methods.iter().any(|m| m == method) {
                return Resolution::Matched(Match {
                    value: &route.value,
                    capture: matched.capture,
                });
            }
            return Resolution::MethodNotAllowed {
                allowed: &route.methods,
            };
        }

        Resolution::NotFound
    }

    /// Number of registered routes
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True if no routes are registered
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Registered patterns in priority order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.pattern.as_str())
    }
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched<'a, T>(res: Resolution<'a, T>) -> Match<'a, T> {
        match res {
            Resolution::Matched(m) => m,
            other => panic!("expected match, got {:?}", std::mem::discriminant(&other)),
        }
    }

    #[test]
    fn test_literal_routes() {
        let mut router = Router::new();
        router.insert("/", &["GET"], 0).unwrap();
        router.insert("/world", &["GET"], 1).unwrap();
        router.insert("/cleveland", &["GET", "POST"], 2).unwrap();

        assert_eq!(*matched(router.resolve("GET", "/")).value, 0);
        assert_eq!(*matched(router.resolve("GET", "/world")).value, 1);
        assert_eq!(*matched(router.resolve("POST", "/cleveland")).value, 2);
        assert_eq!(router.resolve("GET", "/unknown"), Resolution::NotFound);
        assert_eq!(router.resolve("GET", "/world/"), Resolution::NotFound);
        assert_eq!(router.resolve("GET", "/worl"), Resolution::NotFound);
    }

    #[test]
    fn test_literal_route_has_no_capture() {
        let mut router = Router::new();
        router.insert("/gpio/2", &["GET"], ()).unwrap();

        assert_eq!(matched(router.resolve("GET", "/gpio/2")).capture, None);
    }

    #[test]
    fn test_method_not_allowed() {
        let mut router = Router::new();
        router.insert("/get/plain", &["GET"], 0).unwrap();

        match router.resolve("DELETE", "/get/plain") {
            Resolution::MethodNotAllowed { allowed } => {
                assert_eq!(allowed, &["GET".to_string()]);
            }
            _ => panic!("expected method not allowed"),
        }
    }

    #[test]
    fn test_first_registered_route_wins() {
        let mut router = Router::new();
        router.insert("/nightlight", &["GET"], "get").unwrap();
        router.insert("/nightlight", &["PUT"], "put").unwrap();

        assert_eq!(*matched(router.resolve("GET", "/nightlight")).value, "get");
        assert!(matches!(
            router.resolve("PUT", "/nightlight"),
            Resolution::MethodNotAllowed { .. }
        ));
    }

    #[test]
    fn test_duplicate_route_is_shadowed() {
        let mut router = Router::new();
        router.insert("/bpm", &["GET"], 1).unwrap();
        router.insert("/bpm", &["GET"], 2).unwrap();

        assert_eq!(*matched(router.resolve("GET", "/bpm")).value, 1);
    }

    #[test]
    fn test_wildcard_capture() {
        let mut router = Router::new();
        router.insert("/items/([0-9]+)", &["GET"], 7).unwrap();

        let m = matched(router.resolve("GET", "/items/42"));
        assert_eq!(*m.value, 7);
        assert_eq!(m.capture.as_deref(), Some("42"));

        assert_eq!(router.resolve("GET", "/items/abc"), Resolution::NotFound);
    }

    #[test]
    fn test_wildcard_mismatch_falls_through() {
        let mut router = Router::new();
        router.insert("/gpio/([0-9]+)$", &["GET"], "pin").unwrap();
        router.insert("/gpio/(.*)", &["GET"], "any").unwrap();

        assert_eq!(*matched(router.resolve("GET", "/gpio/2")).value, "pin");

        let m = matched(router.resolve("GET", "/gpio/led"));
        assert_eq!(*m.value, "any");
        assert_eq!(m.capture.as_deref(), Some("led"));
    }

    #[test]
    fn test_registration_methods_normalised() {
        let mut router = Router::new();
        router.insert("/users", &["get"], 1).unwrap();

        assert_eq!(*matched(router.resolve("GET", "/users")).value, 1);
    }

    #[test]
    fn test_request_method_is_case_sensitive() {
        let mut router = Router::new();
        router.insert("/users", &["GET"], 1).unwrap();

        match router.resolve("get", "/users") {
            Resolution::MethodNotAllowed { allowed } => assert_eq!(allowed, &["GET".to_string()]),
            _ => panic!("expected method not allowed"),
        }
        assert!(matches!(
            router.resolve("Get", "/users"),
            Resolution::MethodNotAllowed { .. }
        ));
    }

    #[test]
    fn test_unknown_method_token() {
        let mut router = Router::new();
        router.insert("/users", &["GET"], 1).unwrap();

        assert!(matches!(
            router.resolve("BREW", "/users"),
            Resolution::MethodNotAllowed { .. }
        ));
    }

    #[test]
    fn test_query_string_is_part_of_path() {
        let mut router = Router::new();
        router.insert("/search", &["GET"], 1).unwrap();
        router.insert("/find(\\?.*)?$", &["GET"], 2).unwrap();

        assert_eq!(router.resolve("GET", "/search?q=1"), Resolution::NotFound);
        assert_eq!(*matched(router.resolve("GET", "/find?q=1")).value, 2);
    }

    #[test]
    fn test_rejects_invalid_patterns() {
        let mut router: Router<u32> = Router::new();

        assert!(matches!(
            router.insert("/a/([0-9]+)/([0-9]+)", &["GET"], 0),
            Err(PatternError::TooManyCaptures { .. })
        ));
        assert!(matches!(
            router.insert("/broken/(", &["GET"], 0),
            Err(PatternError::Invalid { .. })
        ));
        assert!(router.is_empty());
    }

    #[test]
    fn test_patterns_in_order() {
        let mut router = Router::new();
        router.insert("/b", &["GET"], 0).unwrap();
        router.insert("a", &["GET"], 1).unwrap();

        assert_eq!(router.len(), 2);
        assert_eq!(router.patterns().collect::<Vec<_>>(), vec!["/b", "/a"]);
    }
}

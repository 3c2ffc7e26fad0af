//! Handler registration
//!
//! Wraps [`thimble_router::Router`] with typed methods and boxed handlers.
//! Routes are registered before serving starts; the table is moved into the
//! [`Dispatcher`](crate::Dispatcher) and never changes afterwards.

use crate::reply::{BoxedHandler, IntoHandlerResult};
use crate::{Method, Request, Result};
use thimble_router::{Resolution, Router};

/// Ordered handler table
#[derive(Default)]
pub struct Routes {
    router: Router<BoxedHandler>,
}

impl Routes {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler
    ///
    /// `handler` receives the request and the text captured by the
    /// pattern's group. An empty `methods` slice means GET only.
    ///
    /// # Example
    /// ```
    /// use thimble_core::{Method, Routes};
    ///
    /// let mut routes = Routes::new();
    /// routes
    ///     .route("/items/([0-9]+)", &[Method::Get, Method::Put], |_req, id| {
    ///         format!("item {}", id.unwrap_or_default())
    ///     })
    ///     .unwrap();
    /// ```
    pub fn route<F, R>(&mut self, pattern: &str, methods: &[Method], handler: F) -> Result<&mut Self>
    where
        F: Fn(&Request, Option<&str>) -> R + Send + Sync + 'static,
        R: IntoHandlerResult,
    {
        let methods: Vec<&str> = if methods.is_empty() {
            vec![Method::Get.as_str()]
        } else {
            methods.iter().map(Method::as_str).collect()
        };
        let handler: BoxedHandler = Box::new(move |req: &Request, capture: Option<&str>| {
            handler(req, capture).into_handler_result()
        });
        self.router.insert(pattern, &methods, handler)?;
        Ok(self)
    }

    /// Add a GET route
    pub fn get<F, R>(&mut self, pattern: &str, handler: F) -> Result<&mut Self>
    where
        F: Fn(&Request, Option<&str>) -> R + Send + Sync + 'static,
        R: IntoHandlerResult,
    {
        self.route(pattern, &[Method::Get], handler)
    }

    /// Add a POST route
    pub fn post<F, R>(&mut self, pattern: &str, handler: F) -> Result<&mut Self>
    where
        F: Fn(&Request, Option<&str>) -> R + Send + Sync + 'static,
        R: IntoHandlerResult,
    {
        self.route(pattern, &[Method::Post], handler)
    }

    /// Add a PUT route
    pub fn put<F, R>(&mut self, pattern: &str, handler: F) -> Result<&mut Self>
    where
        F: Fn(&Request, Option<&str>) -> R + Send + Sync + 'static,
        R: IntoHandlerResult,
    {
        self.route(pattern, &[Method::Put], handler)
    }

    /// Add a DELETE route
    pub fn delete<F, R>(&mut self, pattern: &str, handler: F) -> Result<&mut Self>
    where
        F: Fn(&Request, Option<&str>) -> R + Send + Sync + 'static,
        R: IntoHandlerResult,
    {
        self.route(pattern, &[Method::Delete], handler)
    }

    /// Look up the handler for a method token and raw path
    pub fn resolve(&self, method: &str, path: &str) -> Resolution<'_, BoxedHandler> {
        self.router.resolve(method, path)
    }

    /// Number of registered routes
    pub fn len(&self) -> usize {
        self.router.len()
    }

    pub fn is_empty(&self) -> bool {
        self.router.is_empty()
    }
}

impl std::fmt::Debug for Routes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.router.patterns()).finish()
    }
}

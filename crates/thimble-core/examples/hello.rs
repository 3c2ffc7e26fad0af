//! Minimal device web server
//!
//! ```sh
//! cargo run -p thimble-core --example hello
//! curl http://localhost:8080/world
//! curl -X PUT -d 75 http://localhost:8080/brightness
//! ```

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use thimble_core::logging::{init_logging, LogConfig};
use thimble_core::{Config, Dispatcher, HandlerResult, Method, Reply, Routes};

fn main() -> thimble_core::Result<()> {
    init_logging(&LogConfig::development())?;

    let brightness = Arc::new(AtomicU8::new(50));
    let mut routes = Routes::new();

    routes
        .get("/", |_, _| "Hello!")?
        .get("/world", |_, _| "Hello World!")?
        .get("/items/([0-9]+)", |_, id| format!("item {}", id.unwrap_or_default()))?
        .get("/status", |_, _| Reply::json(r#"{"ok":true}"#))?;

    let level = Arc::clone(&brightness);
    routes.route("/brightness", &[Method::Get, Method::Put], move |req, _| -> HandlerResult {
        if req.method == "PUT" {
            let value: u8 = req.body_str().unwrap_or("").trim().parse()?;
            if value > 100 {
                return Ok(Reply::from(("Value out of range", 400u16)));
            }
            level.store(value, Ordering::Relaxed);
        }
        Ok(Reply::from(level.load(Ordering::Relaxed)))
    })?;

    let config = Config::default().port(8080).static_root("./static");
    Dispatcher::new(config, routes).run_blocking()
}

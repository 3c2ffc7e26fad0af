//! TCP accept loop
//!
//! Connections are served strictly one at a time: the next `accept` only
//! happens after the previous response has been written and the socket
//! closed.

use crate::{Dispatcher, Error, Result};
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

/// Pending connections the kernel may queue while one is being served
const LISTEN_BACKLOG: i32 = 8;

/// Pause after a failed `accept`; errors like EMFILE repeat immediately
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Create a listening TCP socket
pub fn create_listener_socket(addr: &SocketAddr) -> io::Result<Socket> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // Rebind immediately after a restart instead of waiting out TIME_WAIT
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;

    socket.bind(&(*addr).into())?;
    socket.listen(LISTEN_BACKLOG)?;

    Ok(socket)
}

/// Bind a tokio listener on `addr`
///
/// Must be called from within a tokio runtime.
pub fn bind_listener(addr: &SocketAddr) -> io::Result<TcpListener> {
    let socket = create_listener_socket(addr)?;
    TcpListener::from_std(socket.into())
}

impl Dispatcher {
    /// Bind `host:port` from the configuration and serve forever
    pub async fn run(&self) -> Result<()> {
        let address = self.config().bind_address();
        let addr = tokio::net::lookup_host(address.as_str()).await?.next().ok_or_else(|| {
            Error::Io(io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("no address for {address}"),
            ))
        })?;

        let listener = bind_listener(&addr)?;
        info!(%addr, routes = self.routes().len(), "listening");
        self.serve(listener).await
    }

    /// Serve connections from an already bound listener
    ///
    /// Accept and connection errors are logged and the loop continues.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        loop {
            let (mut stream, peer) = match listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            };
            debug!(%peer, "connection accepted");

            if let Err(e) = stream.set_nodelay(true) {
                debug!(%peer, error = %e, "set_nodelay failed");
            }
            if let Err(e) = self.handle_connection(&mut stream).await {
                warn!(%peer, error = %e, "connection failed");
            }
        }
    }

    /// [`run`](Self::run) on a single-threaded runtime, blocking the caller
    pub fn run_blocking(&self) -> Result<()> {
        runtime()?.block_on(self.run())
    }
}

/// Single-threaded runtime with the IO driver and the timers used for read
/// timeouts and accept backoff
fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .enable_time()
        .build()
}

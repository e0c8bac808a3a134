//! Thin wrapper over the `may_minihttp` listener with a handle for tests
//! and embedders.

use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;

use may::coroutine::JoinHandle;
use may_minihttp::HttpService;
use tracing::info;

/// Typed wrapper around the `may_minihttp` server for a given service.
pub struct HttpServer<T>(pub T);

/// Handle to a running HTTP server.
///
/// Lets callers wait until the listener accepts connections, stop it, or
/// block until it exits.
pub struct ServerHandle {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the server is bound to.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Wait for the server to be ready to accept connections.
    ///
    /// Polls the bound address with TCP connects. Useful in tests to avoid
    /// racing the listener startup.
    ///
    /// # Errors
    ///
    /// Returns `TimedOut` if the server is not accepting within ~250ms.
    pub fn wait_ready(&self) -> io::Result<()> {
        for _ in 0..50 {
            if TcpStream::connect(self.addr).is_ok() {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(5));
        }
        Err(io::Error::new(io::ErrorKind::TimedOut, "server not ready"))
    }

    /// Stop the server and wait for the listener coroutine to finish.
    ///
    /// Consumes the handle, preventing further operations.
    pub fn stop(self) {
        // SAFETY: cancellation is the intended shutdown path; the handle is
        // owned here so the coroutine is still valid.
        unsafe {
            self.handle.coroutine().cancel();
        }
        let _ = self.handle.join();
    }

    /// Block until the server coroutine finishes.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener coroutine panicked.
    pub fn join(self) -> std::thread::Result<()> {
        self.handle.join()
    }
}

impl<T: HttpService + Clone + Send + Sync + 'static> HttpServer<T> {
    /// Bind the listener and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or the port cannot be
    /// bound.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid address"))?;
        let handle = may_minihttp::HttpServer(self.0).start(addr)?;
        info!(%addr, "listening");
        Ok(ServerHandle { addr, handle })
    }
}

use may::coroutine::JoinHandle;
use may_minihttp::HttpService;
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;

/// Wrapper around may_minihttp's HTTP server
pub struct HttpServer<T>(pub T);

/// Handle to a running HTTP server
pub struct ServerHandle {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the server is bound to
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Poll the listening address until a TCP connection succeeds.
    ///
    /// # Errors
    ///
    /// `TimedOut` if the server does not accept within ~250ms.
    pub fn wait_ready(&self) -> io::Result<()> {
        for _ in 0..50 {
            if TcpStream::connect(self.addr).is_ok() {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(5));
        }
        Err(io::Error::new(io::ErrorKind::TimedOut, "server not ready"))
    }

    /// Cancel the accept loop and wait for it to finish
    pub fn stop(self) {
        // SAFETY: `cancel` is unsafe because the coroutine is unwound at its
        // next yield point. The accept loop owns no state that outlives it.
        #[allow(unsafe_code)]
        unsafe {
            self.handle.coroutine().cancel();
        }
        if self.handle.join().is_err() {
            tracing::debug!(addr = %self.addr, "Server coroutine ended by cancellation");
        }
    }

    /// Block until the server coroutine finishes.
    ///
    /// # Errors
    ///
    /// Returns the panic payload if the server coroutine panicked.
    pub fn join(self) -> std::thread::Result<()> {
        self.handle.join()
    }
}

impl<T: HttpService + Clone + Send + Sync + 'static> HttpServer<T> {
    /// Start serving on `addr`.
    ///
    /// # Errors
    ///
    /// The address does not resolve, or the port cannot be bound.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid address"))?;
        let handle = may_minihttp::HttpServer(self.0).start(addr)?;
        Ok(ServerHandle { addr, handle })
    }
}

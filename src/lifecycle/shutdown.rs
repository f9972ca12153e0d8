//! Shutdown of a running listener.

use std::net::SocketAddr;
use std::time::Duration;

use axum_server::Handle;
use tokio::task::JoinHandle;

/// A bound, serving listener.
///
/// Dropping it without calling [`ServerHandle::shutdown`] closes the
/// listener immediately, without draining.
pub struct ServerHandle {
    handle: Handle,
    task: Option<JoinHandle<std::io::Result<()>>>,
    local_addr: SocketAddr,
}

impl ServerHandle {
    pub fn new(handle: Handle, task: JoinHandle<std::io::Result<()>>, local_addr: SocketAddr) -> Self {
        Self {
            handle,
            task: Some(task),
            local_addr,
        }
    }

    /// Address the listener is bound to (real port when 0 was requested).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Connections currently open.
    pub fn connection_count(&self) -> usize {
        self.handle.connection_count()
    }

    /// Stop accepting, let in-flight requests finish for at most `drain`,
    /// then close. Resolves once the socket is released.
    pub async fn shutdown(mut self, drain: Duration) -> std::io::Result<()> {
        tracing::info!(
            address = %self.local_addr,
            open_connections = self.handle.connection_count(),
            drain_secs = drain.as_secs(),
            "Stopping listener"
        );
        self.handle.graceful_shutdown(Some(drain));

        let result = match self.task.take() {
            Some(task) => match task.await {
                Ok(result) => result,
                Err(join) => Err(std::io::Error::other(join)),
            },
            None => Ok(()),
        };
        tracing::info!(address = %self.local_addr, "Listener stopped");
        result
    }
}

impl std::fmt::Debug for ServerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerHandle")
            .field("local_addr", &self.local_addr)
            .field("serving", &self.task.is_some())
            .finish()
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.handle.shutdown();
        }
    }
}

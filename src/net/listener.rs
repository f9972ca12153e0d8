//! Listener binding.
//!
//! # Responsibilities
//! - Resolve the configured host/port to a socket address
//! - Bind a plain or TLS listener and serve the pipeline on it
//! - Report readiness only once connections are actually accepted

use std::net::SocketAddr;

use axum::Router;
use axum_server::Handle;

use crate::config::schema::{AppConfig, Protocol};
use crate::config::validation::resolve;
use crate::lifecycle::shutdown::ServerHandle;
use crate::net::tls::load_tls_config;

/// Error type for listener operations.
#[derive(Debug)]
pub enum ListenerError {
    /// Host/port did not resolve to an address.
    Resolve(String, std::io::Error),
    /// Failed to load certificate material.
    Tls(std::io::Error),
    /// Failed to bind to address.
    Bind(SocketAddr, std::io::Error),
}

impl std::fmt::Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerError::Resolve(host, e) => write!(f, "Failed to resolve {}: {}", host, e),
            ListenerError::Tls(e) => write!(f, "Failed to load TLS configuration: {}", e),
            ListenerError::Bind(addr, e) => write!(f, "Failed to bind {}: {}", addr, e),
        }
    }
}

impl std::error::Error for ListenerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListenerError::Resolve(_, e) | ListenerError::Tls(e) | ListenerError::Bind(_, e) => Some(e),
        }
    }
}

/// Resolve `host:port`, taking the first address.
pub async fn resolve_bind_address(host: &str, port: u16) -> Result<SocketAddr, ListenerError> {
    let target = format!("{}:{}", host, port);
    let mut addrs = tokio::net::lookup_host(&target)
        .await
        .map_err(|e| ListenerError::Resolve(target.clone(), e))?;
    addrs.next().ok_or_else(|| {
        ListenerError::Resolve(
            target.clone(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses"),
        )
    })
}

/// Bind according to `config` and serve `router`.
///
/// Returns once the listener accepts connections.
pub async fn serve(config: &AppConfig, router: Router) -> Result<ServerHandle, ListenerError> {
    let addr = resolve_bind_address(&config.host, config.port).await?;
    let handle = Handle::new();
    let service = router.into_make_service();

    let task = match (config.protocol, &config.tls) {
        (Protocol::Https, Some(tls)) => {
            let root = config.root.clone().unwrap_or_default();
            let mut tls = tls.clone();
            tls.cert_path = resolve(&root, &tls.cert_path);
            tls.key_path = resolve(&root, &tls.key_path);
            let rustls = load_tls_config(&tls).await.map_err(ListenerError::Tls)?;
            let server = axum_server::bind_rustls(addr, rustls).handle(handle.clone());
            tokio::spawn(async move { server.serve(service).await })
        }
        (Protocol::Https, None) => {
            return Err(ListenerError::Tls(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "https requires a tls section",
            )))
        }
        (Protocol::Http, _) => {
            let server = axum_server::bind(addr).handle(handle.clone());
            tokio::spawn(async move { server.serve(service).await })
        }
    };

    match handle.listening().await {
        Some(local_addr) => {
            tracing::info!(address = %local_addr, protocol = %config.protocol, "Listening for connections");
            Ok(ServerHandle::new(handle, task, local_addr))
        }
        None => {
            let err = match task.await {
                Ok(Err(e)) => e,
                Ok(Ok(())) => std::io::Error::other("listener exited before accepting connections"),
                Err(join) => std::io::Error::other(join),
            };
            Err(ListenerError::Bind(addr, err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_localhost() {
        let addr = resolve_bind_address("127.0.0.1", 0).await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 0);
    }

    #[tokio::test]
    async fn bind_conflict_is_reported() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = taken.local_addr().unwrap().port();
        let config = AppConfig {
            host: "127.0.0.1".into(),
            port,
            ..Default::default()
        };
        let err = serve(&config, Router::new()).await.err().unwrap();
        assert!(matches!(err, ListenerError::Bind(..)));
    }
}

//! HTTP transport
//!
//! Serves an axum router, with graceful shutdown on cancellation or Ctrl+C.

use crate::error::TransportError;
use crate::util::bind_with_fallback;
use axum::Router;
use std::net::{IpAddr, SocketAddr};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Default port for the HTTP server
pub const DEFAULT_HTTP_PORT: u16 = 20290;

/// Configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Preferred address to bind to (e.g., "127.0.0.1:20290")
    pub bind: SocketAddr,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], DEFAULT_HTTP_PORT)),
        }
    }
}

impl HttpConfig {
    pub fn new(bind: SocketAddr) -> Self {
        Self { bind }
    }

    /// Create config from a host IP and port
    ///
    /// IPv6 hosts may be given bare (`::1`) or bracketed (`[::1]`).
    pub fn from_host_port(host: &str, port: u16) -> Result<Self, TransportError> {
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        let ip: IpAddr = host.parse()?;
        Ok(Self::new(SocketAddr::new(ip, port)))
    }
}

/// A running server
pub struct HttpServer {
    /// Address actually bound (may differ from the preferred one)
    pub local_addr: SocketAddr,
    /// Cancel to begin graceful shutdown
    pub shutdown: CancellationToken,
    handle: JoinHandle<Result<(), TransportError>>,
}

impl HttpServer {
    /// Wait for the server task to finish
    pub async fn join(self) -> Result<(), TransportError> {
        self.handle
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?
    }
}

/// Start serving `router` in the background
///
/// Falls back to a nearby port if the configured one is taken.
pub async fn run_http(router: Router, config: HttpConfig) -> Result<HttpServer, TransportError> {
    let listener = bind_with_fallback(config.bind).await?;
    let local_addr = listener.local_addr()?;
    let shutdown = CancellationToken::new();

    info!("HTTP server listening on http://{}", local_addr);

    let signal = shutdown.clone();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(signal.cancelled_owned())
            .await
            .map_err(TransportError::Io)
    });

    Ok(HttpServer {
        local_addr,
        shutdown,
        handle,
    })
}

/// Serve `router` until Ctrl+C
pub async fn run_http_blocking(router: Router, config: HttpConfig) -> anyhow::Result<()> {
    let server = run_http(router, config).await?;

    info!("Press Ctrl+C to stop the server");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
        _ = server.shutdown.cancelled() => {
            info!("Server cancelled");
        }
    }

    server.shutdown.cancel();
    if let Err(e) = server.join().await {
        error!(error = %e, "HTTP server exited with an error");
        return Err(e.into());
    }

    info!("HTTP server stopped");
    Ok(())
}

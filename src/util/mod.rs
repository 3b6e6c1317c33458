//! Utility types and functions shared across the crate.

mod secret;

pub use secret::SecretString;

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::warn;

/// How many ports above the preferred one to try before asking the OS
const PORT_FALLBACK_RANGE: u16 = 10;

/// Bind a listener, preferring `addr` and falling back to nearby ports.
///
/// Tries `addr`, then the next ten ports, then an OS-assigned port. The
/// listener is returned still bound, so nothing can take the port between
/// discovery and serving.
pub async fn bind_with_fallback(addr: SocketAddr) -> std::io::Result<TcpListener> {
    if let Ok(listener) = TcpListener::bind(addr).await {
        return Ok(listener);
    }

    for offset in 1..=PORT_FALLBACK_RANGE {
        let Some(port) = addr.port().checked_add(offset) else {
            break;
        };
        if let Ok(listener) = TcpListener::bind(SocketAddr::new(addr.ip(), port)).await {
            warn!(
                preferred = addr.port(),
                actual = port,
                "Preferred port unavailable, using alternate"
            );
            return Ok(listener);
        }
    }

    let listener = TcpListener::bind(SocketAddr::new(addr.ip(), 0)).await?;
    warn!(
        preferred = addr.port(),
        actual = listener.local_addr()?.port(),
        "Using OS-assigned port"
    );
    Ok(listener)
}

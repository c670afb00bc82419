//! TCP listener setup.

use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Bind a TCP listener on `address`.
pub async fn bind(address: &str) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind(address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");
    Ok(listener)
}

/// Parse `address` for the TLS path, which binds inside axum-server.
pub fn parse_addr(address: &str) -> std::io::Result<SocketAddr> {
    address.parse().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid bind address '{}': {}", address, e),
        )
    })
}

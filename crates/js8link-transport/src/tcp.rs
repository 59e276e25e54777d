//! TCP transport for the JS8Call API connection.
//!
//! This module provides [`TcpTransport`], which implements the
//! [`Transport`] trait over the single long-lived TCP connection JS8Call
//! accepts on its API port (default 2442, enabled under
//! File -> Settings -> Reporting).
//!
//! Connection refusal is surfaced as the distinct
//! [`Error::ConnectionRefused`] variant so callers can tell "JS8Call is
//! not running" apart from transient network trouble.
//!
//! # Example
//!
//! ```no_run
//! use js8link_transport::TcpTransport;
//! use js8link_core::Transport;
//! use std::time::Duration;
//!
//! # async fn example() -> js8link_core::Result<()> {
//! let mut transport = TcpTransport::connect("127.0.0.1:2442").await?;
//!
//! transport.send(b"{\"type\":\"PING\",\"value\":\"\",\"params\":{}}\n").await?;
//!
//! let mut buf = [0u8; 4096];
//! let n = transport.receive(&mut buf, Duration::from_secs(5)).await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use js8link_core::error::{Error, Result};
use js8link_core::transport::Transport;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Default connection timeout (5 seconds).
///
/// Generous for a loopback or LAN connection to JS8Call, short enough
/// that a misconfigured host address fails promptly.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// TCP transport for the JS8Call API connection.
///
/// Implements the [`Transport`] trait. The connection is established
/// eagerly via [`connect`](TcpTransport::connect) or
/// [`connect_with_timeout`](TcpTransport::connect_with_timeout).
#[derive(Debug)]
pub struct TcpTransport {
    /// The underlying TCP stream, `None` after `close()` is called.
    stream: Option<TcpStream>,
    /// The address string for logging/debugging.
    addr: String,
}

impl TcpTransport {
    /// Connect to a TCP endpoint using the default timeout.
    ///
    /// The `addr` parameter should be a `host:port` string, e.g.
    /// `"127.0.0.1:2442"`.
    pub async fn connect(addr: &str) -> Result<Self> {
        Self::connect_with_timeout(addr, DEFAULT_CONNECT_TIMEOUT).await
    }

    /// Connect to a TCP endpoint with a specified timeout.
    ///
    /// # Arguments
    ///
    /// * `addr` - A `host:port` string (e.g. `"127.0.0.1:2442"`)
    /// * `timeout` - Maximum time to wait for the connection
    pub async fn connect_with_timeout(addr: &str, timeout: Duration) -> Result<Self> {
        tracing::debug!(
            addr = %addr,
            timeout_ms = timeout.as_millis(),
            "Connecting to JS8Call API"
        );

        let stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| {
                tracing::error!(addr = %addr, "TCP connection timed out");
                Error::Timeout("connect".into())
            })?
            .map_err(|e| {
                tracing::error!(addr = %addr, error = %e, "TCP connection failed");
                map_connect_error(e, addr)
            })?;

        // Disable Nagle's algorithm; API requests are small and
        // latency-sensitive.
        if let Err(e) = stream.set_nodelay(true) {
            tracing::warn!(
                addr = %addr,
                error = %e,
                "Failed to set TCP_NODELAY (continuing anyway)"
            );
        }

        tracing::info!(addr = %addr, "JS8Call API connection established");

        Ok(Self {
            stream: Some(stream),
            addr: addr.to_string(),
        })
    }

    /// Wrap an existing `TcpStream` as a `TcpTransport`.
    ///
    /// Useful when a TCP connection has already been established
    /// externally (e.g. accepted from a listener in tests).
    ///
    /// # Arguments
    ///
    /// * `stream` - An already-connected `TcpStream`
    /// * `addr` - A label for logging (typically the peer address)
    pub fn from_stream(stream: TcpStream, addr: String) -> Self {
        tracing::debug!(addr = %addr, "Wrapping existing TCP stream");
        Self {
            stream: Some(stream),
            addr,
        }
    }

    /// Get the address string this transport was connected to.
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        tracing::trace!(
            addr = %self.addr,
            bytes = data.len(),
            "Sending data"
        );

        stream.write_all(data).await.map_err(|e| {
            tracing::error!(addr = %self.addr, error = %e, "Failed to send data");
            map_io_error(e)
        })?;

        stream.flush().await.map_err(|e| {
            tracing::error!(addr = %self.addr, error = %e, "Failed to flush TCP stream");
            map_io_error(e)
        })?;

        Ok(())
    }

    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        let result = tokio::time::timeout(timeout, stream.read(buf)).await;

        match result {
            Ok(Ok(0)) => {
                // TCP: 0 bytes read means the peer has closed the connection.
                tracing::warn!(addr = %self.addr, "Peer closed connection (0 bytes read)");
                Err(Error::ConnectionLost)
            }
            Ok(Ok(n)) => {
                tracing::trace!(addr = %self.addr, bytes = n, "Received data");
                Ok(n)
            }
            Ok(Err(e)) => {
                tracing::error!(addr = %self.addr, error = %e, "Failed to receive data");
                Err(map_io_error(e))
            }
            Err(_) => {
                tracing::trace!(
                    addr = %self.addr,
                    timeout_ms = timeout.as_millis(),
                    "Timeout waiting for data"
                );
                Err(Error::Timeout("read".into()))
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            tracing::debug!(addr = %self.addr, "Closing TCP connection");

            if let Err(e) = stream.flush().await {
                tracing::warn!(
                    addr = %self.addr,
                    error = %e,
                    "Failed to flush before closing (continuing anyway)"
                );
            }

            if let Err(e) = stream.shutdown().await {
                tracing::warn!(
                    addr = %self.addr,
                    error = %e,
                    "Failed to shutdown TCP stream (continuing anyway)"
                );
            }

            tracing::info!(addr = %self.addr, "TCP connection closed");
        }

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        if self.stream.is_some() {
            tracing::debug!(addr = %self.addr, "TcpTransport dropped, closing connection");
            // The stream is closed when dropped.
        }
    }
}

/// Map a connection-time I/O error to the appropriate [`Error`] variant.
fn map_connect_error(e: std::io::Error, addr: &str) -> Error {
    match e.kind() {
        std::io::ErrorKind::ConnectionRefused => Error::ConnectionRefused(addr.to_string()),
        _ => Error::Io(e),
    }
}

/// Map a data-path I/O error to the appropriate [`Error`] variant.
fn map_io_error(e: std::io::Error) -> Error {
    match e.kind() {
        std::io::ErrorKind::ConnectionReset
        | std::io::ErrorKind::BrokenPipe
        | std::io::ErrorKind::NotConnected
        | std::io::ErrorKind::ConnectionAborted => Error::ConnectionLost,
        _ => Error::Io(e),
    }
}

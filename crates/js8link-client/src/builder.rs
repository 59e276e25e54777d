//! Js8CallBuilder -- fluent builder for constructing [`Js8CallClient`]
//! sessions.
//!
//! Separates configuration from connection so callers can set the host,
//! port, and per-request timeout before the TCP session is established.
//! All three are fixed for the lifetime of the client.
//!
//! # Example
//!
//! ```no_run
//! use js8link_client::Js8CallBuilder;
//! use std::time::Duration;
//!
//! # async fn example() -> js8link_core::Result<()> {
//! let client = Js8CallBuilder::new()
//!     .host("127.0.0.1")
//!     .port(2442)
//!     .request_timeout(Duration::from_secs(5))
//!     .connect()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use js8link_core::error::Result;
use js8link_core::transport::Transport;
use js8link_transport::TcpTransport;

use crate::client::{Js8CallClient, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT};

/// Fluent builder for [`Js8CallClient`].
///
/// The defaults match a stock JS8Call installation on the local machine,
/// so the simplest usage is `Js8CallBuilder::new().connect().await`.
#[derive(Debug, Clone)]
pub struct Js8CallBuilder {
    host: String,
    port: u16,
    request_timeout: Duration,
}

impl Js8CallBuilder {
    /// Create a builder with the stock defaults: `127.0.0.1:2442`,
    /// 5 second request timeout.
    pub fn new() -> Self {
        Js8CallBuilder {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set the JS8Call host name or address.
    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Set the JS8Call TCP API port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the wall-clock budget for one correlated reply
    /// (default: 5 seconds).
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Establish the TCP session and build the client.
    ///
    /// Fails with [`Error::ConnectionRefused`](js8link_core::Error::ConnectionRefused)
    /// when JS8Call is not running or its API is not enabled.
    pub async fn connect(self) -> Result<Js8CallClient> {
        let addr = format!("{}:{}", self.host, self.port);
        let transport = TcpTransport::connect(&addr).await?;
        Ok(Js8CallClient::from_transport(
            Box::new(transport),
            self.request_timeout,
        ))
    }

    /// Build a client over a caller-provided transport.
    ///
    /// The primary entry point for testing (pass a transport wired to a
    /// mock server) and for callers managing the connection themselves.
    pub fn build_with_transport(self, transport: Box<dyn Transport>) -> Js8CallClient {
        Js8CallClient::from_transport(transport, self.request_timeout)
    }
}

impl Default for Js8CallBuilder {
    fn default() -> Self {
        Self::new()
    }
}

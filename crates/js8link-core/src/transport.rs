//! Transport trait for the JS8Call stream connection.
//!
//! The [`Transport`] trait abstracts over the byte stream carrying the
//! JSON protocol. The production implementation is the TCP transport in
//! `js8link-transport`; tests substitute mock transports or sockets
//! connected to the scripted server in `js8link-test-harness`.
//!
//! The client's correlation engine operates on a `Transport` rather than
//! on a socket directly, which is what makes the whole session testable
//! without a running JS8Call instance.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// Asynchronous byte-level stream to the JS8Call application.
///
/// Implementations handle connection state and raw I/O. Framing (newline
/// delimiters) and message semantics are handled above this trait by the
/// wire codec and the correlation engine.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send raw bytes, blocking until all bytes are written.
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive bytes into the provided buffer.
    ///
    /// Returns the number of bytes read. Waits up to `timeout` for data;
    /// returns [`Error::Timeout`](crate::Error::Timeout) if none arrives,
    /// and [`Error::ConnectionLost`](crate::Error::ConnectionLost) when the
    /// peer has closed the stream.
    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Close the connection.
    ///
    /// After `close()`, subsequent `send()` and `receive()` calls return
    /// [`Error::NotConnected`](crate::Error::NotConnected).
    async fn close(&mut self) -> Result<()>;

    /// Whether the transport is currently connected.
    fn is_connected(&self) -> bool;
}

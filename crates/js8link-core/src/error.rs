//! Error types for js8link.
//!
//! All fallible operations across the library return [`Result<T>`], which
//! uses [`Error`] as the error type. Transport-layer, protocol-layer, and
//! session-layer errors are all captured here.

/// The error type for all js8link operations.
///
/// Variants cover the full range of failure modes encountered when talking
/// to a JS8Call instance over its TCP API: connect failures, mid-session
/// stream loss, reply timeouts, and position-source failures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The initial TCP connection was refused.
    ///
    /// This almost always means JS8Call is not running, or its TCP API is
    /// not enabled (File -> Settings -> Reporting -> API).
    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    /// A transport-level error (socket setup, write failure).
    #[error("transport error: {0}")]
    Transport(String),

    /// A protocol-level error (an envelope that cannot be encoded).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Timed out waiting for a correlated reply.
    ///
    /// Carries the request type (e.g. `RIG.GET_FREQ`) so callers can tell
    /// which command went unanswered. Recoverable: the caller may retry.
    #[error("timeout waiting for {0}")]
    Timeout(String),

    /// No connection has been established, or the client was closed.
    #[error("not connected")]
    NotConnected,

    /// The connection to JS8Call was lost mid-session.
    ///
    /// Fatal to any in-progress wait; the client is unusable until a new
    /// session is connected.
    #[error("connection lost")]
    ConnectionLost,

    /// The position source reported no fix.
    ///
    /// Distinct from a stale-but-present fix, which succeeds.
    #[error("no position fix available")]
    NoFix,

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

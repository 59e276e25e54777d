//! # js8link -- JS8Call API Client for Rust
//!
//! `js8link` is an asynchronous Rust client for the TCP API exposed by
//! [JS8Call], the keyboard-to-keyboard weak-signal mode built on FT8
//! modulation. It is designed for station automation, logging tools, and
//! messaging gateways that drive JS8Call programmatically.
//!
//! [JS8Call]: http://js8call.com
//!
//! ## Quick Start
//!
//! Enable the TCP API in JS8Call (File -> Settings -> Reporting), then:
//!
//! ```no_run
//! use js8link::Js8CallBuilder;
//!
//! #[tokio::main]
//! async fn main() -> js8link::Result<()> {
//!     let mut client = Js8CallBuilder::new()
//!         .host("127.0.0.1")
//!         .port(2442)
//!         .connect()
//!         .await?;
//!
//!     let callsign = client.callsign().await?;
//!     let freq = client.frequency().await?;
//!     println!("{} on {}", callsign, freq);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized as a workspace of focused crates:
//!
//! | Crate                  | Purpose                                         |
//! |------------------------|-------------------------------------------------|
//! | `js8link-core`         | Envelope, typed values, traits, errors          |
//! | `js8link-transport`    | TCP transport implementation                    |
//! | `js8link-client`       | Wire codec, correlation engine, command facade  |
//! | `js8link-test-harness` | Scripted mock JS8Call server for tests          |
//! | **`js8link`**          | This facade crate -- re-exports everything      |
//!
//! ## Requests, replies, and notifications
//!
//! JS8Call multiplexes three kinds of traffic over one newline-delimited
//! JSON stream. The client stamps each request with a correlation ID and
//! matches the reply back to it; unsolicited notifications (spots,
//! directed messages, transmit frames, shutdown) are dispatched to
//! registered handlers as they are encountered:
//!
//! ```no_run
//! use js8link::{Js8CallBuilder, NotificationKind};
//!
//! # async fn example() -> js8link::Result<()> {
//! let mut client = Js8CallBuilder::new().connect().await?;
//!
//! client.on_notification(NotificationKind::Spot, |envelope| {
//!     println!(
//!         "spot: {} at {} Hz",
//!         envelope.param_str("CALL"),
//!         envelope.param_u64("FREQ"),
//!     );
//! });
//! # Ok(())
//! # }
//! ```
//!
//! There is no background reader: notifications are observed while a
//! request is waiting for its reply. An application that wants a steady
//! stream of notifications polls with any query (or [`ping`]) at its own
//! cadence.
//!
//! [`ping`]: Js8CallClient::ping
//!
//! ## Fire-and-forget commands
//!
//! `RIG.SET_FREQ`, `TX.SEND_MESSAGE`, `WINDOW.RAISE`, and `PING` are
//! documented by the upstream API as producing no reply; for these,
//! success means the command was transmitted. All other operations wait
//! for the correlated reply, up to the per-request timeout configured at
//! construction (default 5 seconds).

pub use js8link_core::*;

pub use js8link_client::{
    FrameBuffer, Js8CallBuilder, Js8CallClient, RequestType, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_REQUEST_TIMEOUT,
};

/// Transport implementations.
///
/// Provides [`TcpTransport`](transport::TcpTransport), the production
/// [`Transport`] implementation. Supply your own implementation (or a
/// mock) via [`Js8CallBuilder::build_with_transport`].
pub mod transport {
    pub use js8link_transport::*;
}

//! js8link-core: Core types, traits, and error definitions for js8link.
//!
//! This crate defines the protocol-agnostic building blocks the js8link
//! client is assembled from. Applications that only need the data types
//! (envelopes, notification kinds, grid squares) can depend on this crate
//! without pulling in any I/O.
//!
//! # Key types
//!
//! - [`Envelope`] -- one JS8Call API message (request, reply, or notification)
//! - [`NotificationKind`] -- the closed set of unsolicited message types
//! - [`Transport`] -- byte-level communication channel
//! - [`PositionSource`] -- external position provider for the grid helper
//! - [`Error`] / [`Result`] -- error handling

pub mod envelope;
pub mod error;
pub mod events;
pub mod locator;
pub mod position;
pub mod transport;
pub mod types;

// Re-export key types at crate root for ergonomic `use js8link_core::*`.
pub use envelope::{Envelope, ID_PARAM};
pub use error::{Error, Result};
pub use events::NotificationKind;
pub use locator::grid_square;
pub use position::{FixQuality, Position, PositionSource};
pub use transport::Transport;
pub use types::*;

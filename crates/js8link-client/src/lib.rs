//! js8link-client: the JS8Call TCP API client.
//!
//! This crate contains the three layers the session is built from:
//!
//! - [`codec`] -- newline-delimited JSON framing and the closed
//!   [`RequestType`](codec::RequestType) set with its per-operation
//!   reply attributes.
//! - [`client`] -- [`Js8CallClient`], the correlation engine that owns
//!   the stream, stamps request IDs, and demultiplexes replies from
//!   unsolicited notifications.
//! - [`commands`] -- the typed command facade: one method per JS8Call
//!   API operation, decoding replies with the protocol's
//!   absence-means-empty defaults.
//!
//! Construction goes through [`Js8CallBuilder`]; see the `js8link`
//! facade crate for crate-level documentation and runnable examples.

pub mod builder;
pub mod client;
pub mod codec;
pub mod commands;

pub use builder::Js8CallBuilder;
pub use client::{Js8CallClient, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT};
pub use codec::{FrameBuffer, RequestType};

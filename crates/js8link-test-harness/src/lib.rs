//! js8link-test-harness: Mock infrastructure for testing js8link.
//!
//! Provides [`MockJs8Server`], a scripted TCP server that speaks the
//! JS8Call newline-delimited JSON protocol, enabling deterministic
//! session tests without a running JS8Call instance.

pub mod mock_server;

pub use mock_server::{Expect, MockJs8Server};

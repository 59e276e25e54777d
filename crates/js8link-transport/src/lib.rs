//! js8link-transport: Transport implementations for js8link.
//!
//! Provides [`TcpTransport`], the production implementation of the
//! [`Transport`](js8link_core::Transport) trait. JS8Call exposes its API
//! on a plain TCP socket (default port 2442), so TCP is the only
//! transport the client needs.

pub mod tcp;

pub use tcp::TcpTransport;

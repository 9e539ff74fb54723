//! # exolink-client
//!
//! Websocket transport for hosts running tokio.
//!
//! [`WsTransport`] owns a background task that keeps one websocket link
//! open, reconnecting at a fixed interval, and exposes it through the
//! synchronous [`exolink_core::Transport`] trait.

pub mod transport;

pub use transport::{LinkOptions, WsTransport};

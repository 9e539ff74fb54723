//! # exolink-core
//!
//! Core logic for the exolink device client.
//!
//! This crate provides:
//! - Link configuration with the built-in defaults
//! - The synthetic waveform payload
//! - Link events and the pure event handler
//! - The periodic payload emitter
//! - Bounded WiFi association
//! - The session poll loop and its action executor
//!
//! This crate is intentionally runtime-agnostic and contains no async code,
//! making it usable on both Linux (tokio) and ESP32 (esp-idf) targets.
//! Platform specifics enter through the traits in [`platform`] and
//! [`bootstrap::Station`].

pub mod bootstrap;
pub mod config;
pub mod emitter;
pub mod error;
pub mod event;
pub mod payload;
pub mod platform;
pub mod session;

pub use bootstrap::{associate, Association, Station};
pub use config::{LinkConfig, ServerEndpoint, Timing, WifiCredentials};
pub use emitter::Emitter;
pub use error::{ConfigError, StationError, TransportError};
pub use event::{handle_event, Action, LinkEvent, LogLevel};
pub use payload::{waveform, PAYLOAD_LEN};
pub use platform::{AlwaysUp, Clock, Delay, MonotonicClock, Network, ThreadDelay, Transport};
pub use session::Session;

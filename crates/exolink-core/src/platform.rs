//! Platform seams.
//!
//! The session only talks to the outside world through these traits:
//! - Linux: tokio-tungstenite transport, std clock and sleep
//! - ESP32: esp-idf websocket client, WiFi station, FreeRTOS delay
//!
//! All methods are synchronous and must not block for long; transports do
//! their I/O elsewhere and queue events for [`Transport::poll`].

use std::time::Instant;

use crate::error::TransportError;
use crate::event::LinkEvent;

/// Monotonic millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Blocking pause.
pub trait Delay {
    fn pause_ms(&mut self, ms: u64);
}

/// Reports whether the network link (WiFi association) is up.
pub trait Network {
    fn is_up(&self) -> bool;
}

/// A persistent websocket link.
pub trait Transport {
    /// Take all events queued since the previous poll, oldest first.
    fn poll(&mut self) -> Vec<LinkEvent>;

    /// Queue a text frame.
    fn send_text(&mut self, text: &str) -> Result<(), TransportError>;

    /// Queue a binary frame.
    fn send_binary(&mut self, data: &[u8]) -> Result<(), TransportError>;
}

/// A link that was never opened polls nothing and rejects sends.
impl<T: Transport> Transport for Option<T> {
    fn poll(&mut self) -> Vec<LinkEvent> {
        match self {
            Some(transport) => transport.poll(),
            None => Vec::new(),
        }
    }

    fn send_text(&mut self, text: &str) -> Result<(), TransportError> {
        match self {
            Some(transport) => transport.send_text(text),
            None => Err(TransportError::NotOpen),
        }
    }

    fn send_binary(&mut self, data: &[u8]) -> Result<(), TransportError> {
        match self {
            Some(transport) => transport.send_binary(data),
            None => Err(TransportError::NotOpen),
        }
    }
}

/// [`Clock`] counting from its own creation.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// [`Delay`] backed by `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn pause_ms(&mut self, ms: u64) {
        std::thread::sleep(std::time::Duration::from_millis(ms));
    }
}

/// [`Network`] for hosts with a wired or OS-managed connection.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysUp;

impl Network for AlwaysUp {
    fn is_up(&self) -> bool {
        true
    }
}

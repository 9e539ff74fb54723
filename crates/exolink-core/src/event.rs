//! Link events and the actions they produce.
//!
//! Transports translate whatever their websocket library reports into a
//! [`LinkEvent`]. [`handle_event`] turns each event into a list of
//! [`Action`]s without touching any I/O, so every reaction can be checked
//! directly. The session executes the actions afterwards.

use std::fmt;

/// Lifecycle and message events reported by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// The websocket handshake completed against `url`.
    Connected(String),

    /// The link closed or dropped.
    Disconnected,

    /// A text frame arrived.
    Text(String),

    /// A binary frame arrived.
    Binary(Vec<u8>),

    /// The transport reported an error.
    Error(String),
}

/// Severity of an [`Action::Log`] line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// Side effect requested by the handler or the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Emit one human-readable log line.
    Log(LogLevel, String),

    /// Send a text frame.
    SendText(String),

    /// Send a binary frame.
    SendBinary(Vec<u8>),

    /// Block the loop for the given number of milliseconds.
    Pause(u64),
}

impl Action {
    pub fn info(line: impl Into<String>) -> Self {
        Action::Log(LogLevel::Info, line.into())
    }

    pub fn warn(line: impl Into<String>) -> Self {
        Action::Log(LogLevel::Warn, line.into())
    }

    pub fn error(line: impl Into<String>) -> Self {
        Action::Log(LogLevel::Error, line.into())
    }

    /// True for the two send variants.
    pub fn is_send(&self) -> bool {
        matches!(self, Action::SendText(_) | Action::SendBinary(_))
    }
}

impl fmt::Display for LinkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkEvent::Connected(url) => write!(f, "connected to {}", url),
            LinkEvent::Disconnected => write!(f, "disconnected"),
            LinkEvent::Text(text) => write!(f, "text ({} bytes)", text.len()),
            LinkEvent::Binary(data) => write!(f, "binary ({} bytes)", data.len()),
            LinkEvent::Error(reason) => write!(f, "error: {}", reason),
        }
    }
}

/// Map one event to the actions it requires.
///
/// Stateless: the result depends only on `event` and `greeting`.
pub fn handle_event(event: &LinkEvent, greeting: &str) -> Vec<Action> {
    match event {
        LinkEvent::Disconnected => vec![Action::info("### WebSocket Disconnected ###")],
        LinkEvent::Connected(url) => vec![
            Action::info("### WebSocket Connected ###"),
            Action::info(format!("Connected to url: {}", url)),
            Action::SendText(greeting.to_string()),
        ],
        LinkEvent::Text(text) => vec![
            Action::info("### Received WebSocket Message ###"),
            Action::info(format!("Message: {}", text)),
        ],
        LinkEvent::Binary(data) => vec![
            Action::info("### Received Binary Message ###"),
            Action::info(format!("Length: {}", data.len())),
        ],
        LinkEvent::Error(reason) => vec![
            Action::error("### WebSocket Error ###"),
            Action::error(format!("Reason: {}", reason)),
        ],
    }
}

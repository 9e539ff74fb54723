//! Error types shared across platforms.

use thiserror::Error;

/// Errors found while validating a [`crate::LinkConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// WiFi SSID is empty.
    #[error("WiFi SSID cannot be empty")]
    EmptySsid,

    /// WiFi SSID exceeds the 802.11 limit.
    #[error("WiFi SSID too long ({0} bytes, max 32)")]
    SsidTooLong(usize),

    /// WiFi password exceeds the WPA2 limit.
    #[error("WiFi password too long ({0} bytes, max 64)")]
    PasswordTooLong(usize),

    /// Server host is empty.
    #[error("Server host cannot be empty")]
    EmptyHost,

    /// Server port is zero.
    #[error("Server port cannot be 0")]
    ZeroPort,

    /// Request path does not start with `/`.
    #[error("Server path must start with '/': {0}")]
    RelativePath(String),

    /// A timing field is zero.
    #[error("Timing value `{0}` must be greater than 0")]
    ZeroTiming(&'static str),

    /// Configuration file could not be parsed.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors reported by a [`crate::Transport`] send.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The link has not been opened.
    #[error("Link is not open")]
    NotOpen,

    /// The transport's background worker is gone.
    #[error("Transport channel closed")]
    ChannelClosed,

    /// The underlying websocket implementation failed.
    #[error("Transport I/O failed: {0}")]
    Io(String),
}

/// Errors reported by a WiFi [`crate::Station`].
#[derive(Debug, Error)]
pub enum StationError {
    /// Credentials do not fit the driver's configuration.
    #[error("Invalid credentials: {0}")]
    Credentials(#[from] ConfigError),

    /// The WiFi driver rejected an operation.
    #[error("WiFi driver error: {0}")]
    Driver(String),
}

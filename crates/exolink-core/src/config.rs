//! Link configuration.
//!
//! The defaults are the device's built-in constants. Hosts may load a JSON
//! document of the same shape instead; the firmware always uses the
//! defaults.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;

/// Greeting sent once every time the link connects.
pub const DEFAULT_GREETING: &str = "Hello from ESP32!";

/// Socket.IO handshake path the server expects.
pub const DEFAULT_PATH: &str = "/socket.io/?EIO=4&transport=websocket";

const MAX_SSID_LEN: usize = 32;
const MAX_PASSWORD_LEN: usize = 64;

/// Complete configuration for one device session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkConfig {
    pub wifi: WifiCredentials,
    pub server: ServerEndpoint,
    pub timing: Timing,
    /// Text frame sent on every `Connected` event.
    pub greeting: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            wifi: WifiCredentials::default(),
            server: ServerEndpoint::default(),
            timing: Timing::default(),
            greeting: DEFAULT_GREETING.to_string(),
        }
    }
}

/// WiFi station credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WifiCredentials {
    /// Network name.
    pub ssid: String,

    /// Shared secret (empty for open networks).
    pub password: String,
}

impl Default for WifiCredentials {
    fn default() -> Self {
        Self {
            ssid: "your_ssid".to_string(),
            password: "your_password".to_string(),
        }
    }
}

/// Remote websocket endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerEndpoint {
    pub host: String,
    pub port: u16,
    /// Request path including any query string.
    pub path: String,
    /// Use `wss://` instead of `ws://`.
    pub secure: bool,
}

impl Default for ServerEndpoint {
    fn default() -> Self {
        Self {
            host: "your_server_ip".to_string(),
            port: 5000,
            path: DEFAULT_PATH.to_string(),
            secure: true,
        }
    }
}

impl ServerEndpoint {
    /// Full websocket URL, e.g. `wss://host:5000/socket.io/?EIO=4&transport=websocket`.
    pub fn url(&self) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        format!("{}://{}:{}{}", scheme, self.host, self.port, self.path)
    }
}

/// Loop and transport timing, all in milliseconds except `association_attempts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timing {
    /// Minimum gap between two payload emissions.
    pub emit_interval_ms: u64,

    /// Delay between reconnect attempts, owned by the transport.
    pub reconnect_interval_ms: u64,

    /// Maximum number of association status polls.
    pub association_attempts: u32,

    /// Delay between association status polls.
    pub association_poll_ms: u64,

    /// Pause after reporting a lost WiFi link.
    pub link_down_pause_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            emit_interval_ms: 5000,
            reconnect_interval_ms: 5000,
            association_attempts: 30,
            association_poll_ms: 1000,
            link_down_pause_ms: 1000,
        }
    }
}

impl LinkConfig {
    /// Parse and validate a JSON configuration. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: LinkConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration against driver and protocol limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.wifi.validate()?;

        if self.server.host.is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.server.port == 0 {
            return Err(ConfigError::ZeroPort);
        }
        if !self.server.path.starts_with('/') {
            return Err(ConfigError::RelativePath(self.server.path.clone()));
        }

        let timing = &self.timing;
        let checks = [
            ("emitIntervalMs", timing.emit_interval_ms),
            ("reconnectIntervalMs", timing.reconnect_interval_ms),
            ("associationAttempts", u64::from(timing.association_attempts)),
            ("associationPollMs", timing.association_poll_ms),
            ("linkDownPauseMs", timing.link_down_pause_ms),
        ];
        for (name, value) in checks {
            if value == 0 {
                return Err(ConfigError::ZeroTiming(name));
            }
        }

        Ok(())
    }

    /// Full websocket URL of the configured server.
    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Describe a mismatch between the requested handshake and what this client speaks.
    ///
    /// A Socket.IO path asks the server for an Engine.IO session, but the
    /// client only exchanges raw text and binary frames. Whether the server
    /// tolerates that is not known here, so the mismatch is reported rather
    /// than corrected.
    pub fn handshake_warning(&self) -> Option<String> {
        let path = &self.server.path;
        if path.starts_with("/socket.io") || path.contains("EIO=") {
            Some(format!(
                "Path '{}' requests a Socket.IO handshake, but this client sends raw websocket frames",
                path
            ))
        } else {
            None
        }
    }

    /// Log the endpoint the transport is about to open, plus any handshake warning.
    pub fn log_endpoint(&self) {
        info!("=== Initializing WebSocket Connection ===");
        info!("Server: {}", self.server.host);
        info!("Port: {}", self.server.port);
        info!("Path: {}", self.server.path);
        if let Some(warning) = self.handshake_warning() {
            warn!("{}", warning);
        }
    }
}

impl WifiCredentials {
    /// Check SSID and password lengths.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ssid.is_empty() {
            return Err(ConfigError::EmptySsid);
        }
        if self.ssid.len() > MAX_SSID_LEN {
            return Err(ConfigError::SsidTooLong(self.ssid.len()));
        }
        if self.password.len() > MAX_PASSWORD_LEN {
            return Err(ConfigError::PasswordTooLong(self.password.len()));
        }
        Ok(())
    }
}

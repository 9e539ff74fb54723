//! Websocket transport over the ESP-IDF client.
//!
//! The ESP-IDF client runs its own task, reconnects on its own, and reports
//! through a callback. The callback translates each report into a
//! [`LinkEvent`] and queues it for the poll loop.

use std::sync::mpsc;
use std::time::Duration;

use embedded_svc::ws::FrameType;
use esp_idf_svc::io::EspIOError;
use esp_idf_svc::ws::client::{
    EspWebSocketClient, EspWebSocketClientConfig, WebSocketEvent, WebSocketEventType,
};
use log::debug;

use exolink_core::{LinkConfig, LinkEvent, Transport, TransportError};

const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Secure websocket link to the configured server.
pub struct EspWsTransport {
    client: EspWebSocketClient<'static>,
    events: mpsc::Receiver<LinkEvent>,
}

impl EspWsTransport {
    /// Start the client. Connection happens in the background.
    pub fn open(config: &LinkConfig) -> Result<Self, EspIOError> {
        let url = config.url();
        let ws_config = EspWebSocketClientConfig {
            reconnect_timeout_ms: Duration::from_millis(config.timing.reconnect_interval_ms),
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            ..Default::default()
        };

        let (tx, events) = mpsc::channel();
        let connected_url = url.clone();
        let client = EspWebSocketClient::new(&url, &ws_config, HANDSHAKE_TIMEOUT, move |event| {
            if let Some(link_event) = translate(event, &connected_url) {
                let _ = tx.send(link_event);
            }
        })?;

        Ok(Self { client, events })
    }

    fn send(&mut self, frame: FrameType, data: &[u8]) -> Result<(), TransportError> {
        if !self.client.is_connected() {
            return Err(TransportError::NotOpen);
        }
        self.client
            .send(frame, data)
            .map_err(|e| TransportError::Io(e.to_string()))
    }
}

impl Transport for EspWsTransport {
    fn poll(&mut self) -> Vec<LinkEvent> {
        self.events.try_iter().collect()
    }

    fn send_text(&mut self, text: &str) -> Result<(), TransportError> {
        self.send(FrameType::Text(false), text.as_bytes())
    }

    fn send_binary(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.send(FrameType::Binary(false), data)
    }
}

fn translate(event: &Result<WebSocketEvent, EspIOError>, url: &str) -> Option<LinkEvent> {
    let event = match event {
        Ok(event) => event,
        Err(e) => return Some(LinkEvent::Error(e.to_string())),
    };

    match event.event_type {
        WebSocketEventType::Connected => Some(LinkEvent::Connected(url.to_string())),
        WebSocketEventType::Disconnected => Some(LinkEvent::Disconnected),
        WebSocketEventType::Closed => {
            debug!("Close frame exchanged with {}", url);
            None
        }
        WebSocketEventType::Text(text) => Some(LinkEvent::Text(text.to_string())),
        WebSocketEventType::Binary(data) => Some(LinkEvent::Binary(data.to_vec())),
        WebSocketEventType::BeforeConnect => {
            debug!("Connecting to {}", url);
            None
        }
        _ => None,
    }
}

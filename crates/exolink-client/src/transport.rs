//! Reconnecting websocket transport.
//!
//! The background task handles:
//! - Connecting and reconnecting every `reconnect_interval`
//! - Forwarding inbound frames as [`LinkEvent`]s
//! - Writing queued outbound frames
//! - Answering pings

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use exolink_core::{LinkConfig, LinkEvent, Transport, TransportError};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Where and how the transport connects.
#[derive(Debug, Clone)]
pub struct LinkOptions {
    /// Full `ws://` or `wss://` URL.
    pub url: String,
    /// Delay before reconnecting after a failed or dropped link.
    pub reconnect_interval: Duration,
}

impl LinkOptions {
    pub fn from_config(config: &LinkConfig) -> Self {
        Self {
            url: config.url(),
            reconnect_interval: Duration::from_millis(config.timing.reconnect_interval_ms),
        }
    }
}

/// Websocket link driven by a tokio task.
///
/// Sends only queue frames while the link is open; otherwise they fail with
/// [`TransportError::NotOpen`].
pub struct WsTransport {
    open: Arc<AtomicBool>,
    outbound: mpsc::UnboundedSender<Message>,
    events: mpsc::UnboundedReceiver<LinkEvent>,
    task: JoinHandle<()>,
}

impl WsTransport {
    /// Start the link task on `handle`.
    pub fn spawn(handle: &Handle, options: LinkOptions) -> Self {
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let (events_tx, events) = mpsc::unbounded_channel();

        let open = Arc::new(AtomicBool::new(false));

        let task = handle.spawn(run_link(options, open.clone(), outbound_rx, events_tx));

        Self {
            open,
            outbound,
            events,
            task,
        }
    }

    /// Whether the background task currently holds an open link.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    fn queue(&self, message: Message) -> Result<(), TransportError> {
        if !self.is_open() {
            return Err(TransportError::NotOpen);
        }
        self.outbound
            .send(message)
            .map_err(|_| TransportError::ChannelClosed)
    }
}

impl Transport for WsTransport {
    fn poll(&mut self) -> Vec<LinkEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        drained
    }

    fn send_text(&mut self, text: &str) -> Result<(), TransportError> {
        self.queue(Message::Text(text.to_string()))
    }

    fn send_binary(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.queue(Message::Binary(data.to_vec()))
    }
}

impl Drop for WsTransport {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Why a connected session ended.
enum Ended {
    /// Peer closed or the stream ran out.
    Closed,
    /// Read or write failed.
    Failed(String),
    /// The owning [`WsTransport`] is gone.
    Shutdown,
}

async fn run_link(
    options: LinkOptions,
    open: Arc<AtomicBool>,
    mut outbound_rx: mpsc::UnboundedReceiver<Message>,
    events_tx: mpsc::UnboundedSender<LinkEvent>,
) {
    loop {
        debug!("Connecting to {}", options.url);
        match tokio_tungstenite::connect_async(options.url.as_str()).await {
            Ok((ws_stream, _)) => {
                info!("Link established to {}", options.url);

                // Anything left from before this link is stale.
                drain(&mut outbound_rx);
                open.store(true, Ordering::Release);

                if events_tx
                    .send(LinkEvent::Connected(options.url.clone()))
                    .is_err()
                {
                    return;
                }

                let ended = drive(ws_stream, &mut outbound_rx, &events_tx).await;
                open.store(false, Ordering::Release);
                drain(&mut outbound_rx);

                match ended {
                    Ended::Closed => {}
                    Ended::Failed(reason) => {
                        error!("Link to {} failed: {}", options.url, reason);
                        let _ = events_tx.send(LinkEvent::Error(reason));
                    }
                    Ended::Shutdown => return,
                }

                if events_tx.send(LinkEvent::Disconnected).is_err() {
                    return;
                }
            }
            Err(e) => {
                warn!("Failed to connect to {}: {}", options.url, e);
                drain(&mut outbound_rx);
                if events_tx.send(LinkEvent::Error(e.to_string())).is_err() {
                    return;
                }
            }
        }

        tokio::time::sleep(options.reconnect_interval).await;
    }
}

/// Discard frames that can no longer be delivered.
fn drain(outbound_rx: &mut mpsc::UnboundedReceiver<Message>) {
    let mut dropped = 0;
    while outbound_rx.try_recv().is_ok() {
        dropped += 1;
    }
    if dropped > 0 {
        debug!("Dropped {} stale outbound frames", dropped);
    }
}

/// Pump frames in both directions until the link ends.
async fn drive(
    ws_stream: WsStream,
    outbound_rx: &mut mpsc::UnboundedReceiver<Message>,
    events_tx: &mpsc::UnboundedSender<LinkEvent>,
) -> Ended {
    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    loop {
        tokio::select! {
            outgoing = outbound_rx.recv() => {
                match outgoing {
                    Some(message) => {
                        if let Err(e) = ws_tx.send(message).await {
                            return Ended::Failed(e.to_string());
                        }
                    }
                    None => {
                        let _ = ws_tx.close().await;
                        return Ended::Shutdown;
                    }
                }
            }

            incoming = ws_rx.next() => {
                let event = match incoming {
                    Some(Ok(Message::Text(text))) => LinkEvent::Text(text),
                    Some(Ok(Message::Binary(data))) => LinkEvent::Binary(data),
                    Some(Ok(Message::Ping(data))) => {
                        if let Err(e) = answer_ping(&mut ws_tx, data).await {
                            return Ended::Failed(e);
                        }
                        continue;
                    }
                    Some(Ok(Message::Close(frame))) => {
                        debug!("Peer closed link: {:?}", frame);
                        return Ended::Closed;
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Ended::Failed(e.to_string()),
                    None => return Ended::Closed,
                };
                if events_tx.send(event).is_err() {
                    return Ended::Shutdown;
                }
            }
        }
    }
}

async fn answer_ping(
    ws_tx: &mut SplitSink<WsStream, Message>,
    data: Vec<u8>,
) -> Result<(), String> {
    ws_tx
        .send(Message::Pong(data))
        .await
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_config() {
        let options = LinkOptions::from_config(&LinkConfig::default());
        assert_eq!(
            options.url,
            "wss://your_server_ip:5000/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(options.reconnect_interval, Duration::from_secs(5));
    }
}

//! Integration tests for the websocket transport.
//!
//! These tests start a local websocket server and drive a real
//! `WsTransport` (and a full `Session`) against it.

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use exolink_client::{LinkOptions, WsTransport};
use exolink_core::{
    AlwaysUp, Delay, LinkConfig, LinkEvent, MonotonicClock, Session, Transport, TransportError,
    PAYLOAD_LEN,
};

/// Delay that does nothing; the tests pace themselves with tokio sleeps.
struct NoDelay;

impl Delay for NoDelay {
    fn pause_ms(&mut self, _ms: u64) {}
}

async fn bind_server() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

async fn accept_client(listener: &TcpListener) -> WebSocketStream<TcpStream> {
    let (stream, _) = timeout(Duration::from_secs(5), listener.accept())
        .await
        .expect("Client should connect")
        .unwrap();
    tokio_tungstenite::accept_async(stream)
        .await
        .expect("Handshake should succeed")
}

fn options(addr: SocketAddr) -> LinkOptions {
    LinkOptions {
        url: format!("ws://{}/ws/audio", addr),
        reconnect_interval: Duration::from_millis(100),
    }
}

/// Poll the transport until `pred` matches an event or five seconds pass.
async fn wait_for(
    transport: &mut WsTransport,
    pred: impl Fn(&LinkEvent) -> bool,
) -> Result<LinkEvent, &'static str> {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while tokio::time::Instant::now() < deadline {
        if let Some(event) = transport.poll().into_iter().find(|e| pred(e)) {
            return Ok(event);
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    Err("Timeout")
}

async fn recv_message(ws: &mut WebSocketStream<TcpStream>) -> Result<Message, &'static str> {
    match timeout(Duration::from_secs(5), ws.next()).await {
        Ok(Some(Ok(message))) => Ok(message),
        Ok(Some(Err(_))) => Err("WebSocket error"),
        Ok(None) => Err("Connection closed"),
        Err(_) => Err("Timeout"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_connected_event_and_frames() {
    let (listener, addr) = bind_server().await;
    let mut transport = WsTransport::spawn(&tokio::runtime::Handle::current(), options(addr));
    let mut server = accept_client(&listener).await;

    let event = wait_for(&mut transport, |e| matches!(e, LinkEvent::Connected(_)))
        .await
        .expect("Should report Connected");
    assert_eq!(
        event,
        LinkEvent::Connected(format!("ws://{}/ws/audio", addr))
    );

    transport.send_text("Hello from ESP32!").unwrap();
    transport.send_binary(&[1, 2, 3]).unwrap();

    assert_eq!(
        recv_message(&mut server).await.unwrap(),
        Message::Text("Hello from ESP32!".to_string())
    );
    assert_eq!(
        recv_message(&mut server).await.unwrap(),
        Message::Binary(vec![1, 2, 3])
    );

    server
        .send(Message::Text("welcome".to_string()))
        .await
        .unwrap();
    let event = wait_for(&mut transport, |e| matches!(e, LinkEvent::Text(_)))
        .await
        .expect("Should forward text");
    assert_eq!(event, LinkEvent::Text("welcome".to_string()));

    server.send(Message::Binary(vec![7; 10])).await.unwrap();
    let event = wait_for(&mut transport, |e| matches!(e, LinkEvent::Binary(_)))
        .await
        .expect("Should forward binary");
    assert_eq!(event, LinkEvent::Binary(vec![7; 10]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_ping_is_answered() {
    let (listener, addr) = bind_server().await;
    let mut transport = WsTransport::spawn(&tokio::runtime::Handle::current(), options(addr));
    let mut server = accept_client(&listener).await;
    wait_for(&mut transport, |e| matches!(e, LinkEvent::Connected(_)))
        .await
        .expect("Should report Connected");

    server.send(Message::Ping(vec![42])).await.unwrap();

    let reply = recv_message(&mut server).await.expect("Should receive pong");
    assert_eq!(reply, Message::Pong(vec![42]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_disconnect_and_reconnect() {
    let (listener, addr) = bind_server().await;
    let mut transport = WsTransport::spawn(&tokio::runtime::Handle::current(), options(addr));

    let mut server = accept_client(&listener).await;
    wait_for(&mut transport, |e| matches!(e, LinkEvent::Connected(_)))
        .await
        .expect("Should report Connected");

    server.close(None).await.unwrap();
    wait_for(&mut transport, |e| *e == LinkEvent::Disconnected)
        .await
        .expect("Should report Disconnected");
    assert!(!transport.is_open());
    assert!(matches!(
        transport.send_text("late"),
        Err(TransportError::NotOpen)
    ));

    let _server = accept_client(&listener).await;
    wait_for(&mut transport, |e| matches!(e, LinkEvent::Connected(_)))
        .await
        .expect("Should reconnect");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unreachable_server_reports_error() {
    let (listener, addr) = bind_server().await;
    drop(listener);

    let mut transport = WsTransport::spawn(&tokio::runtime::Handle::current(), options(addr));
    let event = wait_for(&mut transport, |e| matches!(e, LinkEvent::Error(_)))
        .await
        .expect("Should report Error");
    assert!(matches!(event, LinkEvent::Error(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_frames_refused_while_link_is_down() {
    let (listener, addr) = bind_server().await;
    drop(listener);

    let mut transport = WsTransport::spawn(&tokio::runtime::Handle::current(), options(addr));

    // Span several reconnect attempts.
    for _ in 0..5 {
        assert!(matches!(
            transport.send_text("stale"),
            Err(TransportError::NotOpen)
        ));
        assert!(matches!(
            transport.send_binary(&[9; 4]),
            Err(TransportError::NotOpen)
        ));
        tokio::time::sleep(Duration::from_millis(60)).await;
    }
    assert!(!transport.is_open());

    let listener = TcpListener::bind(addr).await.unwrap();
    let mut server = accept_client(&listener).await;
    wait_for(&mut transport, |e| matches!(e, LinkEvent::Connected(_)))
        .await
        .expect("Should connect once the server is up");
    assert!(transport.is_open());

    transport.send_text("fresh").unwrap();
    assert_eq!(
        recv_message(&mut server).await.unwrap(),
        Message::Text("fresh".to_string())
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_session_greets_and_emits() {
    let (listener, addr) = bind_server().await;

    let mut config = LinkConfig::default();
    config.server.host = addr.ip().to_string();
    config.server.port = addr.port();
    config.server.path = "/ws/audio".to_string();
    config.server.secure = false;
    config.timing.emit_interval_ms = 50;

    let mut transport = WsTransport::spawn(
        &tokio::runtime::Handle::current(),
        LinkOptions::from_config(&config),
    );
    let mut session = Session::new(config, MonotonicClock::new());
    let mut server = accept_client(&listener).await;

    let driver = tokio::spawn(async move {
        for _ in 0..200 {
            session.step(&AlwaysUp, &mut transport, &mut NoDelay);
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    });

    let mut greeted = false;
    let mut payload = None;
    while !greeted || payload.is_none() {
        match recv_message(&mut server).await.expect("Should receive frames") {
            Message::Text(text) => {
                assert_eq!(text, "Hello from ESP32!");
                greeted = true;
            }
            Message::Binary(data) => payload = payload.or(Some(data)),
            _ => {}
        }
    }

    let payload = payload.unwrap();
    assert_eq!(payload.len(), PAYLOAD_LEN);
    assert_eq!(payload[0], 127);
    assert_eq!(payload[8], 254);

    driver.abort();
}

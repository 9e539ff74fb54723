use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exolink_client::{LinkOptions, WsTransport};
use exolink_core::{AlwaysUp, LinkConfig, MonotonicClock, Session, ThreadDelay};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,exolink_client=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("=== exolink WebSocket Client Starting (host) ===");

    let config = load_config()?;

    // The transport task lives on this runtime; the poll loop stays on the main thread.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    tracing::info!("No WiFi station on this host, treating the network as up");
    config.log_endpoint();

    let mut transport = WsTransport::spawn(runtime.handle(), LinkOptions::from_config(&config));
    tracing::info!("WebSocket initialization complete");
    tracing::info!("Waiting for WebSocket connection...");

    let mut session = Session::new(config, MonotonicClock::new());
    session.run(&AlwaysUp, &mut transport, &mut ThreadDelay)
}

/// Load `LinkConfig` from the JSON file named by `EXOLINK_CONFIG`, or use the defaults.
fn load_config() -> anyhow::Result<LinkConfig> {
    let Ok(path) = std::env::var("EXOLINK_CONFIG") else {
        let config = LinkConfig::default();
        config.validate()?;
        return Ok(config);
    };

    tracing::info!("Loading configuration from {}", path);
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read configuration file {}", path))?;
    LinkConfig::from_json(&text).with_context(|| format!("Invalid configuration in {}", path))
}

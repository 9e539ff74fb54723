//! exolink firmware for ESP32
//!
//! This binary requires the ESP32 Rust toolchain.
//! It will not compile with the standard Rust toolchain.
//!
//! Joins WiFi, opens the websocket link and runs the shared poll loop from
//! `exolink-core` forever.

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::prelude::Peripherals;
use esp_idf_svc::log::EspLogger;
use log::{info, warn};

use exolink_core::{associate, Delay, LinkConfig, MonotonicClock, Session};
use exolink_esp32::wifi::{EspStation, FreeRtosDelay};
use exolink_esp32::ws::EspWsTransport;

/// Settle time for the serial console before the first log lines.
const STARTUP_DELAY_MS: u64 = 1000;

fn main() -> anyhow::Result<()> {
    esp_idf_svc::sys::link_patches();
    EspLogger::initialize_default();

    // Counts from boot, so association time counts toward the first emission.
    let clock = MonotonicClock::new();

    info!("=== ESP32 WebSocket Client Starting ===");
    info!("Initializing...");

    let mut delay = FreeRtosDelay;
    delay.pause_ms(STARTUP_DELAY_MS);

    let config = LinkConfig::default();
    config.validate()?;

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let mut station = EspStation::new(peripherals.modem, sysloop)?;

    let association = associate(&mut station, &mut delay, &config.wifi, &config.timing)?;

    // Without WiFi the link is never opened; the loop keeps reporting the loss.
    let mut transport = if association.is_connected() {
        config.log_endpoint();
        let transport = EspWsTransport::open(&config)?;
        info!("WebSocket initialization complete");
        info!("Waiting for WebSocket connection...");
        Some(transport)
    } else {
        warn!("Skipping WebSocket setup, WiFi is not connected");
        None
    };

    let mut session = Session::new(config, clock);
    session.run(&station, &mut transport, &mut delay)
}

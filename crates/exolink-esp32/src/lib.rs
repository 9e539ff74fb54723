//! ESP32-specific components for exolink.
//!
//! This crate provides the device side of the platform seams defined in
//! `exolink-core`:
//! - WiFi station driver ([`wifi::EspStation`]), also used as the loop's
//!   network check
//! - Websocket transport over the ESP-IDF client ([`ws::EspWsTransport`])
//! - FreeRTOS-backed delay ([`wifi::FreeRtosDelay`])
//!
//! # Example
//!
//! ```ignore
//! use exolink_core::{associate, LinkConfig};
//! use exolink_esp32::wifi::{EspStation, FreeRtosDelay};
//!
//! let config = LinkConfig::default();
//! let mut station = EspStation::new(peripherals.modem, sysloop)?;
//! let association = associate(&mut station, &mut FreeRtosDelay, &config.wifi, &config.timing)?;
//! ```

pub mod wifi;
pub mod ws;

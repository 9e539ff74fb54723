//! WiFi station for ESP32.
//!
//! Uses the non-blocking `EspWifi` driver directly so association can be
//! polled by `exolink_core::associate` instead of blocking inside the driver.

use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::peripheral,
    wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi},
};
use esp_idf_hal::delay::FreeRtos;
use log::{info, warn};

use exolink_core::{ConfigError, Delay, Network, Station, StationError, WifiCredentials};

/// WiFi station driver.
///
/// Must be kept alive for the connection to remain active.
pub struct EspStation {
    wifi: Box<EspWifi<'static>>,
}

impl EspStation {
    /// Take the modem and create the driver. Does not start the radio.
    pub fn new(
        modem: impl peripheral::Peripheral<P = esp_idf_svc::hal::modem::Modem> + 'static,
        sysloop: EspSystemEventLoop,
    ) -> Result<Self, StationError> {
        let wifi = EspWifi::new(modem, sysloop, None).map_err(driver_error)?;
        Ok(Self {
            wifi: Box::new(wifi),
        })
    }
}

impl Station for EspStation {
    fn begin(&mut self, credentials: &WifiCredentials) -> Result<(), StationError> {
        credentials.validate()?;

        let auth_method = if credentials.password.is_empty() {
            info!("WiFi password is empty, using open network");
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };

        let configuration = Configuration::Client(ClientConfiguration {
            ssid: credentials
                .ssid
                .as_str()
                .try_into()
                .map_err(|_| ConfigError::SsidTooLong(credentials.ssid.len()))?,
            password: credentials
                .password
                .as_str()
                .try_into()
                .map_err(|_| ConfigError::PasswordTooLong(credentials.password.len()))?,
            auth_method,
            ..Default::default()
        });

        self.wifi
            .set_configuration(&configuration)
            .map_err(driver_error)?;
        self.wifi.start().map_err(driver_error)?;
        self.wifi.connect().map_err(driver_error)?;
        Ok(())
    }

    fn is_associated(&mut self) -> bool {
        self.is_up()
    }

    fn address(&self) -> Option<String> {
        match self.wifi.sta_netif().get_ip_info() {
            Ok(ip_info) => {
                info!("  Gateway:    {}", ip_info.subnet.gateway);
                info!("  Netmask:    {}", ip_info.subnet.mask);
                Some(ip_info.ip.to_string())
            }
            Err(e) => {
                warn!("Failed to read IP info: {}", e);
                None
            }
        }
    }
}

impl Network for EspStation {
    fn is_up(&self) -> bool {
        let associated = self.wifi.is_connected().unwrap_or(false);
        associated && self.wifi.sta_netif().is_up().unwrap_or(false)
    }
}

/// [`Delay`] that yields to FreeRTOS.
#[derive(Debug, Default, Clone, Copy)]
pub struct FreeRtosDelay;

impl Delay for FreeRtosDelay {
    fn pause_ms(&mut self, ms: u64) {
        FreeRtos::delay_ms(ms.min(u64::from(u32::MAX)) as u32);
    }
}

fn driver_error(e: esp_idf_svc::sys::EspError) -> StationError {
    StationError::Driver(e.to_string())
}

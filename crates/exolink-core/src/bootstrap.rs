//! Bounded WiFi association.

use tracing::{info, warn};

use crate::config::{Timing, WifiCredentials};
use crate::error::StationError;
use crate::platform::Delay;

/// A WiFi station driver.
pub trait Station {
    /// Configure credentials and start associating. Must not wait for the result.
    fn begin(&mut self, credentials: &WifiCredentials) -> Result<(), StationError>;

    /// Whether the station is associated and has an address.
    fn is_associated(&mut self) -> bool;

    /// Address assigned by DHCP, if any.
    fn address(&self) -> Option<String>;
}

/// Outcome of [`associate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Association {
    /// Joined the network after `attempts` status polls.
    Connected {
        address: Option<String>,
        attempts: u32,
    },
    /// Still not associated after every poll was spent.
    TimedOut { attempts: u32 },
}

impl Association {
    pub fn is_connected(&self) -> bool {
        matches!(self, Association::Connected { .. })
    }
}

/// Join the network, polling status once per `timing.association_poll_ms`.
///
/// Gives up after `timing.association_attempts` polls. A timeout is not an
/// error: the station is left as it is and the poll loop reports the
/// missing link.
pub fn associate<S, D>(
    station: &mut S,
    delay: &mut D,
    credentials: &WifiCredentials,
    timing: &Timing,
) -> Result<Association, StationError>
where
    S: Station,
    D: Delay,
{
    info!(
        "Attempting to connect to WiFi network: {}",
        credentials.ssid
    );
    station.begin(credentials)?;

    info!("Connecting to WiFi...");
    let max = timing.association_attempts;
    let mut attempts = 0;
    while !station.is_associated() && attempts < max {
        delay.pause_ms(timing.association_poll_ms);
        attempts += 1;
        info!("Connection attempt {} of {}...", attempts, max);
    }

    if station.is_associated() {
        let address = station.address();
        info!("=== WiFi Connection Successful! ===");
        info!(
            "IP Address: {}",
            address.as_deref().unwrap_or("unknown")
        );
        Ok(Association::Connected { address, attempts })
    } else {
        warn!("WiFi association timed out after {} attempts", attempts);
        Ok(Association::TimedOut { attempts })
    }
}

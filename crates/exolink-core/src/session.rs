//! Device session: the poll loop and its action executor.
//!
//! Each iteration is split in two halves:
//! - [`Session::poll_once`] inspects the network, drains transport events and
//!   checks the emitter, producing a list of [`Action`]s
//! - [`Session::perform`] executes those actions against the transport and
//!   the delay
//!
//! The only state carried between iterations is the emitter's last-send
//! timestamp.

use tracing::{debug, error, info, warn};

use crate::config::LinkConfig;
use crate::emitter::Emitter;
use crate::event::{handle_event, Action, LogLevel};
use crate::platform::{Clock, Delay, Network, Transport};

/// Pause between loop iterations while the link is up. Keeps the device's
/// task watchdog fed.
pub const IDLE_PAUSE_MS: u64 = 10;

/// One device session.
pub struct Session<C: Clock> {
    config: LinkConfig,
    clock: C,
    emitter: Emitter,
}

impl<C: Clock> Session<C> {
    pub fn new(config: LinkConfig, clock: C) -> Self {
        let emitter = Emitter::new(config.timing.emit_interval_ms);
        Self {
            config,
            clock,
            emitter,
        }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    /// Decide what one loop iteration should do.
    pub fn poll_once<N, T>(&mut self, network: &N, transport: &mut T) -> Vec<Action>
    where
        N: Network,
        T: Transport,
    {
        if !network.is_up() {
            return vec![
                Action::warn("WiFi connection lost!"),
                Action::Pause(self.config.timing.link_down_pause_ms),
            ];
        }

        let mut actions = Vec::new();
        for event in transport.poll() {
            debug!("Link event: {}", event);
            actions.extend(handle_event(&event, &self.config.greeting));
        }
        actions.extend(self.emitter.evaluate(self.clock.now_ms()));
        actions
    }

    /// Execute actions in order. Send results are ignored.
    pub fn perform<T, D>(actions: Vec<Action>, transport: &mut T, delay: &mut D)
    where
        T: Transport,
        D: Delay,
    {
        for action in actions {
            match action {
                Action::Log(LogLevel::Info, line) => info!("{}", line),
                Action::Log(LogLevel::Warn, line) => warn!("{}", line),
                Action::Log(LogLevel::Error, line) => error!("{}", line),
                Action::SendText(text) => {
                    let _ = transport.send_text(&text);
                }
                Action::SendBinary(data) => {
                    let _ = transport.send_binary(&data);
                }
                Action::Pause(ms) => delay.pause_ms(ms),
            }
        }
    }

    /// Run one full iteration.
    pub fn step<N, T, D>(&mut self, network: &N, transport: &mut T, delay: &mut D)
    where
        N: Network,
        T: Transport,
        D: Delay,
    {
        let actions = self.poll_once(network, transport);
        Self::perform(actions, transport, delay);
    }

    /// Loop forever.
    pub fn run<N, T, D>(&mut self, network: &N, transport: &mut T, delay: &mut D) -> !
    where
        N: Network,
        T: Transport,
        D: Delay,
    {
        info!("Entering poll loop");
        loop {
            self.step(network, transport, delay);
            delay.pause_ms(IDLE_PAUSE_MS);
        }
    }
}

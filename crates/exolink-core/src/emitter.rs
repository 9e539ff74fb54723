//! Periodic payload emitter.

use crate::event::Action;
use crate::payload::{waveform, PAYLOAD_LEN};

/// Decides when the next payload is due.
///
/// The last emission starts at 0 ms, so the first payload goes out one
/// interval after the clock's origin.
#[derive(Debug, Clone)]
pub struct Emitter {
    interval_ms: u64,
    last_emit_ms: u64,
}

impl Emitter {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_emit_ms: 0,
        }
    }

    /// Timestamp of the most recent emission.
    pub fn last_emit_ms(&self) -> u64 {
        self.last_emit_ms
    }

    /// Returns true and records `now_ms` if at least one interval has elapsed.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_emit_ms) >= self.interval_ms {
            self.last_emit_ms = now_ms;
            true
        } else {
            false
        }
    }

    /// Actions for one emission cycle if it is due, otherwise nothing.
    pub fn evaluate(&mut self, now_ms: u64) -> Vec<Action> {
        if !self.poll(now_ms) {
            return Vec::new();
        }
        vec![
            Action::info("Sending dummy audio data..."),
            Action::info(format!("Data size: {} bytes", PAYLOAD_LEN)),
            Action::SendBinary(waveform().to_vec()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_not_due_before_interval() {
        let mut emitter = Emitter::new(5000);
        assert!(!emitter.poll(0));
        assert!(!emitter.poll(4999));
        assert!(emitter.poll(5000));
        assert_eq!(emitter.last_emit_ms(), 5000);
    }

    #[test]
    fn test_fires_once_across_split_advance() {
        let mut emitter = Emitter::new(5000);
        assert!(emitter.poll(5000));

        let mut now = 5000;
        let mut fired = 0;
        for step in [4999, 2] {
            now += step;
            if emitter.poll(now) {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
        assert_eq!(emitter.last_emit_ms(), 10001);
    }

    #[test]
    fn test_no_double_fire_same_instant() {
        let mut emitter = Emitter::new(5000);
        assert!(emitter.poll(7000));
        assert!(!emitter.poll(7000));
    }

    #[test]
    fn test_evaluate_emits_payload() {
        let mut emitter = Emitter::new(5000);
        assert!(emitter.evaluate(100).is_empty());

        let actions = emitter.evaluate(5000);
        assert_eq!(actions[0], Action::info("Sending dummy audio data..."));
        assert_eq!(actions[1], Action::info("Data size: 32 bytes"));
        match &actions[2] {
            Action::SendBinary(data) => assert_eq!(data.len(), PAYLOAD_LEN),
            other => panic!("Expected SendBinary, got {:?}", other),
        }
    }
}

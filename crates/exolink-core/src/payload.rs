//! Synthetic waveform payload.
//!
//! Stands in for captured audio while the link is being exercised: one full
//! sine period, offset and scaled into unsigned bytes.

use std::f64::consts::PI;

/// Number of bytes in every emitted payload.
pub const PAYLOAD_LEN: usize = 32;

const MIDPOINT: f64 = 127.0;
const AMPLITUDE: f64 = 127.0;

/// Sample `index` of the waveform: `round(127 + 127 * sin(2*pi*index/32))`, clamped to a byte.
pub fn sample(index: usize) -> u8 {
    let phase = 2.0 * PI * index as f64 / PAYLOAD_LEN as f64;
    let value = (MIDPOINT + AMPLITUDE * phase.sin()).round();
    value.clamp(0.0, 255.0) as u8
}

/// Generate a fresh payload.
pub fn waveform() -> [u8; PAYLOAD_LEN] {
    std::array::from_fn(sample)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_length() {
        for _ in 0..3 {
            assert_eq!(waveform().len(), PAYLOAD_LEN);
        }
    }

    #[test]
    fn test_quarter_points() {
        let wave = waveform();
        assert_eq!(wave[0], 127);
        assert_eq!(wave[8], 254);
        assert_eq!(wave[16], 127);
        assert_eq!(wave[24], 0);
    }

    #[test]
    fn test_matches_formula() {
        let wave = waveform();
        for (i, byte) in wave.iter().enumerate() {
            let expected = (127.0 + 127.0 * (2.0 * PI * i as f64 / 32.0).sin()).round();
            assert_eq!(f64::from(*byte), expected.clamp(0.0, 255.0), "index {}", i);
        }
    }

    #[test]
    fn test_half_periods_mirror() {
        let wave = waveform();
        for i in 1..16 {
            let sum = u16::from(wave[i]) + u16::from(wave[i + 16]);
            assert!((253..=255).contains(&sum), "index {} sums to {}", i, sum);
        }
    }
}

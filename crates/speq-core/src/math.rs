//! Level conversions and small helpers shared by the processors.
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//! - [`power_to_db`] - Power ratio to dB with a floor
//! - [`mono_mix`] - Average every channel of an interleaved frame

use libm::{log10, pow};

/// Convert decibels to linear amplitude gain.
///
/// # Example
/// ```rust
/// use speq_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 1e-12);
/// assert!((db_to_linear(-6.0206) - 0.5).abs() < 1e-4);
/// ```
#[inline]
pub fn db_to_linear(db: f64) -> f64 {
    pow(10.0, db / 20.0)
}

/// Convert linear amplitude gain to decibels.
///
/// Inputs at or below `1e-10` read as -200 dB rather than `-inf`.
///
/// # Example
/// ```rust
/// use speq_core::linear_to_db;
///
/// assert!(linear_to_db(1.0).abs() < 1e-12);
/// assert!((linear_to_db(2.0) - 6.0206).abs() < 1e-3);
/// ```
#[inline]
pub fn linear_to_db(linear: f64) -> f64 {
    20.0 * log10(linear.max(1e-10))
}

/// Convert a power ratio to decibels, floored at `min_db`.
///
/// Zero power maps to `min_db`.
#[inline]
pub fn power_to_db(power: f64, min_db: f64) -> f64 {
    if power <= 0.0 {
        return min_db;
    }
    (10.0 * log10(power)).max(min_db)
}

/// Mono analysis sample from one interleaved frame.
///
/// The mean of all channels in the frame; an empty frame reads as silence.
#[inline]
pub fn mono_mix(frame: &[f32]) -> f32 {
    match frame {
        [] => 0.0,
        [mono] => *mono,
        _ => frame.iter().sum::<f32>() / frame.len() as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_roundtrip() {
        for db in [-24.0, -6.0, 0.0, 3.0, 12.0] {
            assert!((linear_to_db(db_to_linear(db)) - db).abs() < 1e-9);
        }
    }

    #[test]
    fn test_linear_to_db_floor() {
        assert_eq!(linear_to_db(0.0), -200.0);
    }

    #[test]
    fn test_power_to_db() {
        assert_eq!(power_to_db(0.0, -100.0), -100.0);
        assert_eq!(power_to_db(1e-30, -100.0), -100.0);
        assert!((power_to_db(100.0, -100.0) - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_mono_mix() {
        assert_eq!(mono_mix(&[]), 0.0);
        assert_eq!(mono_mix(&[0.3]), 0.3);
        assert_eq!(mono_mix(&[1.0, 0.0]), 0.5);
        assert_eq!(mono_mix(&[3.0, 0.0, 0.0]), 1.0);
        assert_eq!(mono_mix(&[1.0, 1.0, 0.0, 0.0]), 0.5);
    }
}

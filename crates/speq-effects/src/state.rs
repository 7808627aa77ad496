//! Persisted equalizer state.
//!
//! Fixed little-endian binary layout for save/restore by a hosting
//! environment:
//!
//! ```text
//! offset  size  field
//! 0       4     i32 version (= 1)
//! 4       24    band 0: f64 gain_db, f64 frequency, f64 q
//! ...           bands 1..4, same layout
//! 124     4     i32 bypass (0 | 1)
//! ```
//!
//! Decoding is all-or-nothing: a truncated or otherwise invalid stream is
//! rejected before any value reaches the [`Equalizer`]. Bytes past the
//! 128-byte record are ignored. The per-band `enabled` switch is not part of
//! the record.

use alloc::vec::Vec;
use thiserror::Error;

use crate::equalizer::{Equalizer, NUM_BANDS};

/// Current record version.
pub const STATE_VERSION: i32 = 1;

/// Size of one encoded record in bytes.
pub const STATE_SIZE: usize = 4 + NUM_BANDS * 3 * 8 + 4;

/// Errors from decoding a persisted state record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateError {
    /// The stream ended before a full record was read.
    #[error("state deserialization failed: expected {expected} bytes, got {actual}")]
    Deserialization {
        /// Bytes needed for a full record.
        expected: usize,
        /// Bytes available.
        actual: usize,
    },

    /// The record carries a version this build cannot read.
    #[error("unsupported state version {0}")]
    UnsupportedVersion(i32),

    /// A band field decoded to NaN or infinity.
    #[error("non-finite {field} in band {band}")]
    NonFinite {
        /// Band index.
        band: usize,
        /// Field name (`gain`, `frequency` or `q`).
        field: &'static str,
    },
}

impl StateError {
    /// Create a truncation error.
    pub fn truncated(actual: usize) -> Self {
        StateError::Deserialization {
            expected: STATE_SIZE,
            actual,
        }
    }
}

/// Persisted values of one band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandState {
    /// Gain in dB.
    pub gain_db: f64,
    /// Center frequency in Hz.
    pub frequency: f64,
    /// Q.
    pub q: f64,
}

/// Decoded state record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqState {
    /// Per-band values, in cascade order.
    pub bands: [BandState; NUM_BANDS],
    /// Global bypass.
    pub bypass: bool,
}

impl EqState {
    /// Captures the persisted subset of an equalizer's configuration.
    pub fn capture(eq: &Equalizer) -> Self {
        Self {
            bands: eq.bands().map(|b| BandState {
                gain_db: b.gain_db,
                frequency: b.frequency,
                q: b.q,
            }),
            bypass: eq.is_bypassed(),
        }
    }

    /// Applies the record to `eq` through its clamping setters.
    ///
    /// `enabled` switches are left as they are.
    pub fn apply_to(&self, eq: &mut Equalizer) {
        for (i, band) in self.bands.iter().enumerate() {
            let mut config = eq.bands()[i];
            config.gain_db = band.gain_db;
            config.frequency = band.frequency;
            config.q = band.q;
            eq.set_band(i, config);
        }
        eq.set_bypass(self.bypass);
    }

    /// Encodes the record into `out`.
    pub fn write(&self, out: &mut [u8; STATE_SIZE]) {
        out[0..4].copy_from_slice(&STATE_VERSION.to_le_bytes());
        let mut offset = 4;
        for band in &self.bands {
            for value in [band.gain_db, band.frequency, band.q] {
                out[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
                offset += 8;
            }
        }
        out[offset..offset + 4].copy_from_slice(&i32::from(self.bypass).to_le_bytes());
    }

    /// Encodes the record into a new buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = [0u8; STATE_SIZE];
        self.write(&mut out);
        out.to_vec()
    }

    /// Decodes a record, validating it completely.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StateError> {
        let Some(record) = bytes.get(..STATE_SIZE) else {
            return Err(StateError::truncated(bytes.len()));
        };

        let version = read_i32(record, 0);
        if version != STATE_VERSION {
            return Err(StateError::UnsupportedVersion(version));
        }

        let mut bands = [BandState {
            gain_db: 0.0,
            frequency: 0.0,
            q: 0.0,
        }; NUM_BANDS];
        let mut offset = 4;
        for (i, band) in bands.iter_mut().enumerate() {
            let gain_db = read_f64(record, offset);
            let frequency = read_f64(record, offset + 8);
            let q = read_f64(record, offset + 16);
            offset += 24;
            for (field, value) in [("gain", gain_db), ("frequency", frequency), ("q", q)] {
                if !value.is_finite() {
                    return Err(StateError::NonFinite { band: i, field });
                }
            }
            *band = BandState {
                gain_db,
                frequency,
                q,
            };
        }

        let bypass = read_i32(record, offset) != 0;
        Ok(Self { bands, bypass })
    }
}

fn read_i32(record: &[u8], offset: usize) -> i32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&record[offset..offset + 4]);
    i32::from_le_bytes(raw)
}

fn read_f64(record: &[u8], offset: usize) -> f64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&record[offset..offset + 8]);
    f64::from_le_bytes(raw)
}

impl Equalizer {
    /// Serializes gain, frequency, Q of every band and the bypass flag.
    pub fn save_state(&self) -> Vec<u8> {
        EqState::capture(self).to_bytes()
    }

    /// Restores a record produced by [`save_state`](Self::save_state).
    ///
    /// On error the equalizer is left exactly as it was.
    pub fn load_state(&mut self, bytes: &[u8]) -> Result<(), StateError> {
        let state = EqState::from_bytes(bytes)?;
        state.apply_to(self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn configured() -> Equalizer {
        let mut eq = Equalizer::new(48000.0);
        eq.set_band_gain(0, 3.5);
        eq.set_band_frequency(1, 310.0);
        eq.set_band_q(2, 4.2);
        eq.set_band_gain(4, -11.0);
        eq.set_bypass(true);
        eq
    }

    #[test]
    fn test_layout() {
        let bytes = configured().save_state();
        assert_eq!(bytes.len(), 128);
        assert_eq!(&bytes[0..4], &[1, 0, 0, 0]);
        assert_eq!(&bytes[4..12], &3.5f64.to_le_bytes());
        assert_eq!(&bytes[12..20], &60.0f64.to_le_bytes());
        assert_eq!(&bytes[124..128], &[1, 0, 0, 0]);
    }

    #[test]
    fn test_roundtrip_into_fresh_instance() {
        let eq = configured();
        let mut restored = Equalizer::new(48000.0);
        restored.load_state(&eq.save_state()).unwrap();
        assert_eq!(restored.bands(), eq.bands());
        assert!(restored.is_bypassed());
    }

    #[test]
    fn test_truncated_stream_leaves_eq_untouched() {
        let bytes = configured().save_state();
        let mut eq = Equalizer::new(48000.0);
        eq.set_band_gain(3, 2.0);
        let before = eq.bands().to_owned();

        for len in [0, 3, 4, 60, 124, 127] {
            let err = eq.load_state(&bytes[..len]).unwrap_err();
            assert_eq!(err, StateError::truncated(len));
            assert_eq!(eq.bands(), &before);
            assert!(!eq.is_bypassed());
        }
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = configured().save_state();
        bytes[0..4].copy_from_slice(&2i32.to_le_bytes());
        assert_eq!(
            EqState::from_bytes(&bytes),
            Err(StateError::UnsupportedVersion(2))
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut bytes = configured().save_state();
        let offset = 4 + 2 * 24 + 16;
        bytes[offset..offset + 8].copy_from_slice(&f64::NAN.to_le_bytes());
        assert_eq!(
            EqState::from_bytes(&bytes),
            Err(StateError::NonFinite { band: 2, field: "q" })
        );
    }

    #[test]
    fn test_out_of_range_values_are_clamped_on_apply() {
        let mut state = EqState::capture(&Equalizer::default());
        state.bands[0].gain_db = 40.0;
        state.bands[0].frequency = 1.0;
        let mut eq = Equalizer::default();
        eq.load_state(&state.to_bytes()).unwrap();
        assert_eq!(eq.band_gain(0), 12.0);
        assert_eq!(eq.band_frequency(0), 20.0);
    }

    #[test]
    fn test_enabled_flags_survive_load() {
        let mut eq = Equalizer::default();
        eq.set_band_enabled(1, false);
        eq.load_state(&configured().save_state()).unwrap();
        assert!(!eq.is_band_enabled(1));
        assert_eq!(eq.band_frequency(1), 310.0);
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut bytes = configured().save_state();
        bytes.extend_from_slice(&[0xAB; 16]);
        assert!(EqState::from_bytes(&bytes).is_ok());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            StateError::truncated(10).to_string(),
            "state deserialization failed: expected 128 bytes, got 10"
        );
        assert_eq!(
            StateError::UnsupportedVersion(7).to_string(),
            "unsupported state version 7"
        );
    }
}

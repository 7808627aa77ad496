//! Speq Effects - the 5-band equalizer
//!
//! Built on speq-core's peaking [`Biquad`](speq_core::Biquad):
//!
//! - [`Equalizer`] - Five cascaded peaking bands with bypass, combined
//!   response readout, and host parameter metadata
//! - [`EqState`] - Bit-exact little-endian save/restore record
//!
//! ## Example
//!
//! ```rust
//! use speq_core::Effect;
//! use speq_effects::Equalizer;
//!
//! let mut eq = Equalizer::new(48000.0);
//! eq.set_band_gain(2, -6.0);
//!
//! let mut block = [0.1f32; 256];
//! eq.process_block(&mut block, 128, 2);
//!
//! let saved = eq.save_state();
//! let mut other = Equalizer::new(48000.0);
//! other.load_state(&saved).unwrap();
//! assert_eq!(other.band_gain(2), -6.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod equalizer;
pub mod state;

pub use equalizer::{
    BYPASS_PARAM_ID, DEFAULT_FREQUENCIES, DEFAULT_Q, DEFAULT_SAMPLE_RATE, EqBandConfig, Equalizer,
    MAX_FREQUENCY, MAX_GAIN_DB, MAX_Q, MIN_FREQUENCY, MIN_GAIN_DB, MIN_Q, NUM_BANDS, PARAM_COUNT,
    param_descriptor,
};
pub use state::{BandState, EqState, STATE_SIZE, STATE_VERSION, StateError};

//! Speq Core - DSP primitives for the speq equalizer engine
//!
//! The foundational building blocks shared by the equalizer, the analyzer,
//! and the engine, designed for real-time audio with zero allocation in the
//! audio path.
//!
//! # Core Abstractions
//!
//! - [`Effect`] - Object-safe trait for in-place audio processors
//! - [`Biquad`] / [`BiquadCoefficients`] - Peaking second-order IIR section
//!   with RBJ cookbook coefficients and per-channel history
//! - [`ParameterInfo`] / [`ParamDescriptor`] - Parameter metadata and
//!   normalized host mapping (linear and logarithmic)
//!
//! ## Utilities
//!
//! - Math functions: [`db_to_linear`], [`linear_to_db`], [`power_to_db`], [`mono_mix`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! speq-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use speq_core::Biquad;
//!
//! let mut stage = Biquad::new();
//! stage.configure(48000.0, 1000.0, 6.0, 0.707);
//!
//! let mut block = [0.0f32; 64];
//! block[0] = 1.0;
//! for sample in block.iter_mut() {
//!     *sample = stage.process(*sample, 0);
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod biquad;
pub mod effect;
pub mod math;
pub mod param_info;

pub use biquad::{Biquad, BiquadCoefficients, MAX_CHANNELS};
pub use effect::Effect;
pub use math::{db_to_linear, linear_to_db, mono_mix, power_to_db};
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamScale, ParamUnit, ParameterInfo};

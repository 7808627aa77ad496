//! Speq Analysis - FFT and spectrum analysis
//!
//! - [`fft`] - From-scratch radix-2 FFT, inverse, magnitude/power, windows
//! - [`analyzer`] - Real-time spectrum analyzer producing [`SpectrumSnapshot`]s
//! - [`bands`] - Log/linear band tables mapping bins to display bands
//! - [`signal_buffer`] - Circular mono sample store
//! - [`dynamics`] - RMS and peak measurement
//!
//! ## Example
//!
//! ```rust
//! use speq_analysis::fft::{self, Window};
//!
//! let mut signal: Vec<f64> = (0..1024)
//!     .map(|i| (2.0 * std::f64::consts::PI * 64.0 * i as f64 / 1024.0).sin())
//!     .collect();
//! Window::Hann.apply(&mut signal);
//!
//! let spectrum = fft::transform(&signal);
//! let mags = fft::magnitude(&spectrum[..512]);
//! let peak = mags
//!     .iter()
//!     .enumerate()
//!     .max_by(|a, b| a.1.total_cmp(b.1))
//!     .map(|(i, _)| i);
//! assert_eq!(peak, Some(64));
//! ```

pub mod analyzer;
pub mod bands;
pub mod dynamics;
pub mod error;
pub mod fft;
pub mod signal_buffer;

pub use analyzer::{AnalyzerConfig, SpectrumAnalyzer, SpectrumSnapshot};
pub use bands::{FrequencyBand, generate_bands};
pub use error::AnalysisError;
pub use fft::{Fft, Window};
pub use num_complex::Complex64;
pub use signal_buffer::SignalBuffer;

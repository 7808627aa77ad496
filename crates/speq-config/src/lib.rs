//! TOML settings for the speq equalizer and spectrum analyzer.
//!
//! One file describes the sample rate, the analyzer layout and the five EQ
//! bands. Parsing validates what clamping cannot fix (band count, analyzer
//! sizes, non-finite values); everything else is clamped when applied.
//!
//! # Example
//!
//! ```rust
//! use speq_config::Settings;
//! use speq_effects::Equalizer;
//!
//! let settings = Settings::from_toml(
//!     r#"
//!     sample_rate = 48000
//!
//!     [analyzer]
//!     fft_size = 2048
//!
//!     [[equalizer.bands]]
//!     frequency = 80.0
//!     gain = 4.0
//!     "#,
//! )
//! .unwrap();
//!
//! let mut eq = Equalizer::default();
//! settings.apply_to(&mut eq);
//! assert_eq!(eq.band_frequency(0), 80.0);
//! assert_eq!(settings.analyzer_config().unwrap().fft_size, 2048);
//! ```

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::{AnalyzerSettings, BandSettings, EqualizerSettings, Settings};

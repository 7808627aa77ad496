//! Real-time spectrum analyzer.
//!
//! Mixed-down samples go into a [`SignalBuffer`]; each
//! [`compute_spectrum`](SpectrumAnalyzer::compute_spectrum) call takes the
//! most recent `fft_size` samples and produces a [`SpectrumSnapshot`]:
//!
//! 1. RMS and peak over the raw window
//! 2. Hann window, FFT, magnitudes scaled by `2 / fft_size`
//! 3. Per band, the **maximum** bin magnitude in `[bin_low, bin_high]`
//!    (peak-style, not averaged); the loudest bin overall gives the peak
//!    frequency
//! 4. Exponential smoothing per band:
//!    `smoothed = α·previous + (1 − α)·band_max`
//!
//! Bands whose first bin lies at or past `fft_size / 2` read as zero and
//! keep their smoothing state.

use num_complex::Complex64;
use tracing::{debug, info};

use crate::bands::{FrequencyBand, generate_bands};
use crate::dynamics::{peak, rms};
use crate::error::AnalysisError;
use crate::fft::{Fft, Window, is_power_of_two};
use crate::signal_buffer::SignalBuffer;

/// Sample rate assumed until told otherwise.
pub const DEFAULT_SAMPLE_RATE: f64 = 44100.0;

/// Analyzer settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Transform length; a power of two.
    pub fft_size: usize,
    /// Number of display bands.
    pub num_bands: usize,
    /// Lowest band edge in Hz.
    pub min_frequency: f64,
    /// Highest band edge in Hz, capped at Nyquist.
    pub max_frequency: f64,
    /// Smoothing factor α in `[0, 1]`. `1` freezes, `0` tracks instantly.
    pub smoothing: f64,
    /// Logarithmic band spacing when `true`, linear otherwise.
    pub log_scale: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fft_size: 4096,
            num_bands: 128,
            min_frequency: 20.0,
            max_frequency: 20000.0,
            smoothing: 0.7,
            log_scale: true,
        }
    }
}

impl AnalyzerConfig {
    /// Checks every field.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InvalidConfiguration`] naming the first bad field.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !is_power_of_two(self.fft_size) || self.fft_size < 2 {
            return Err(AnalysisError::invalid_configuration(format!(
                "fft_size {} must be a power of two >= 2",
                self.fft_size
            )));
        }
        if self.num_bands == 0 {
            return Err(AnalysisError::invalid_configuration("num_bands must be > 0"));
        }
        if self.min_frequency.is_nan() || self.min_frequency <= 0.0 {
            return Err(AnalysisError::invalid_configuration(format!(
                "min_frequency {} must be > 0",
                self.min_frequency
            )));
        }
        if self.max_frequency.is_nan() || self.max_frequency <= self.min_frequency {
            return Err(AnalysisError::invalid_configuration(format!(
                "max_frequency {} must exceed min_frequency {}",
                self.max_frequency, self.min_frequency
            )));
        }
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(AnalysisError::invalid_configuration(format!(
                "smoothing {} must be within [0, 1]",
                self.smoothing
            )));
        }
        Ok(())
    }
}

/// One analysis result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpectrumSnapshot {
    /// Smoothed band magnitudes (linear, `>= 0`).
    pub magnitudes: Vec<f64>,
    /// Band center frequencies in Hz, parallel to `magnitudes`.
    pub frequencies: Vec<f64>,
    /// Frequency of the loudest bin inside any band, in Hz.
    pub peak_frequency: f64,
    /// RMS of the raw window.
    pub rms_level: f64,
    /// Absolute peak of the raw window.
    pub peak_level: f64,
}

impl SpectrumSnapshot {
    /// All-zero snapshot over the given bands.
    pub fn silent(bands: &[FrequencyBand]) -> Self {
        Self {
            magnitudes: vec![0.0; bands.len()],
            frequencies: bands.iter().map(|b| b.center_frequency).collect(),
            ..Self::default()
        }
    }

    /// Index of the loudest band, `None` when empty.
    pub fn loudest_band(&self) -> Option<usize> {
        self.magnitudes
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
    }
}

/// Windowed-FFT spectrum analyzer with per-band smoothing.
///
/// # Example
///
/// ```rust
/// use speq_analysis::{AnalyzerConfig, SpectrumAnalyzer};
///
/// let config = AnalyzerConfig { fft_size: 1024, num_bands: 32, ..Default::default() };
/// let mut analyzer = SpectrumAnalyzer::new(48000.0, config).unwrap();
///
/// let tone: Vec<f32> = (0..2048)
///     .map(|i| (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / 48000.0).sin())
///     .collect();
/// analyzer.ingest(&tone, tone.len(), 1);
///
/// let snapshot = analyzer.compute_spectrum();
/// assert!((snapshot.peak_frequency - 1000.0).abs() < 48000.0 / 1024.0);
/// ```
#[derive(Debug, Clone)]
pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,
    sample_rate: f64,
    buffer: SignalBuffer,
    fft: Fft,
    window: Vec<f64>,
    frame: Vec<f32>,
    scratch: Vec<Complex64>,
    spectrum: Vec<f64>,
    bands: Vec<FrequencyBand>,
    smoothed: Vec<f64>,
    last: SpectrumSnapshot,
}

impl SpectrumAnalyzer {
    /// Creates an analyzer for `sample_rate` with a validated `config`.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InvalidConfiguration`] if the config does not validate.
    pub fn new(sample_rate: f64, config: AnalyzerConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let n = config.fft_size;
        let mut analyzer = Self {
            fft: Fft::new(n)?,
            buffer: SignalBuffer::new(n),
            window: Window::Hann.coefficients(n),
            frame: vec![0.0; n],
            scratch: vec![Complex64::new(0.0, 0.0); n],
            spectrum: vec![0.0; n / 2],
            bands: Vec::new(),
            smoothed: Vec::new(),
            last: SpectrumSnapshot::default(),
            config,
            sample_rate,
        };
        analyzer.update_bands();
        Ok(analyzer)
    }

    /// Current configuration.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Current sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Band table in ascending frequency order.
    pub fn bands(&self) -> &[FrequencyBand] {
        &self.bands
    }

    /// Result of the most recent computation (silent before the first one).
    pub fn last_snapshot(&self) -> &SpectrumSnapshot {
        &self.last
    }

    /// The analyzer's own sample store.
    pub fn signal_buffer(&self) -> &SignalBuffer {
        &self.buffer
    }

    /// Replaces the configuration, resizing buffers and rebuilding bands.
    ///
    /// Buffered samples are discarded when the FFT size changes, smoothing
    /// state when the band count changes.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InvalidConfiguration`]; the analyzer keeps its old
    /// configuration in that case.
    pub fn set_config(&mut self, config: AnalyzerConfig) -> Result<(), AnalysisError> {
        config.validate()?;
        if config.fft_size != self.config.fft_size {
            let n = config.fft_size;
            self.fft = Fft::new(n)?;
            self.buffer.resize(n);
            self.window = Window::Hann.coefficients(n);
            self.frame = vec![0.0; n];
            self.scratch = vec![Complex64::new(0.0, 0.0); n];
            self.spectrum = vec![0.0; n / 2];
        }
        debug!(
            fft_size = config.fft_size,
            num_bands = config.num_bands,
            log_scale = config.log_scale,
            "analyzer reconfigured"
        );
        self.config = config;
        self.update_bands();
        Ok(())
    }

    /// Changes the sample rate and rebuilds the band table.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        info!(sample_rate, "analyzer sample rate changed");
        self.sample_rate = sample_rate;
        self.update_bands();
    }

    /// Regenerates the band table from the current config and sample rate.
    ///
    /// Smoothing state is kept when the band count is unchanged.
    pub fn update_bands(&mut self) {
        self.bands = generate_bands(
            self.sample_rate,
            self.config.fft_size,
            self.config.num_bands,
            self.config.min_frequency,
            self.config.max_frequency,
            self.config.log_scale,
        );
        if self.smoothed.len() != self.bands.len() {
            self.smoothed = vec![0.0; self.bands.len()];
        }
        self.last = SpectrumSnapshot::silent(&self.bands);
        debug!(bands = self.bands.len(), sample_rate = self.sample_rate, "band table rebuilt");
    }

    /// Mixes interleaved frames to mono and appends them to the buffer.
    pub fn ingest(&mut self, samples: &[f32], frames: usize, channels: usize) {
        self.buffer.ingest(samples, frames, channels);
    }

    /// Analyzes the most recent window of ingested samples.
    pub fn compute_spectrum(&mut self) -> SpectrumSnapshot {
        let mut frame = std::mem::take(&mut self.frame);
        self.buffer.copy_latest(&mut frame);
        let snapshot = self.analyze_window(&frame);
        self.frame = frame;
        snapshot
    }

    /// Analyzes an externally supplied window, oldest sample first.
    ///
    /// A window shorter than `fft_size` is zero-padded at the end; a longer
    /// one is truncated to its first `fft_size` samples. Smoothing state is
    /// advanced exactly as by [`compute_spectrum`](Self::compute_spectrum).
    pub fn analyze_window(&mut self, window: &[f32]) -> SpectrumSnapshot {
        let n = self.config.fft_size;
        let raw = &window[..window.len().min(n)];

        let rms_level = rms(raw);
        let peak_level = peak(raw);

        for (i, slot) in self.scratch.iter_mut().enumerate() {
            let x = raw.get(i).map_or(0.0, |&s| f64::from(s));
            *slot = Complex64::new(x * self.window[i], 0.0);
        }
        // scratch is resized alongside the plan.
        self.fft.forward_unchecked(&mut self.scratch);

        let norm = 2.0 / n as f64;
        for (mag, bin) in self.spectrum.iter_mut().zip(&self.scratch) {
            *mag = bin.norm() * norm;
        }

        let half = n / 2;
        let alpha = self.config.smoothing;
        let mut magnitudes = Vec::with_capacity(self.bands.len());
        let mut peak_bin = 0;
        let mut peak_magnitude = 0.0;

        for (band, smoothed) in self.bands.iter().zip(self.smoothed.iter_mut()) {
            if band.bin_low >= half {
                magnitudes.push(0.0);
                continue;
            }
            let end = band.bin_high.min(half - 1);
            let mut band_max = 0.0;
            for bin in band.bin_low..=end {
                let mag = self.spectrum[bin];
                if mag > band_max {
                    band_max = mag;
                }
                if mag > peak_magnitude {
                    peak_magnitude = mag;
                    peak_bin = bin;
                }
            }
            *smoothed = alpha * *smoothed + (1.0 - alpha) * band_max;
            magnitudes.push(*smoothed);
        }

        let snapshot = SpectrumSnapshot {
            magnitudes,
            frequencies: self.bands.iter().map(|b| b.center_frequency).collect(),
            peak_frequency: peak_bin as f64 * self.sample_rate / n as f64,
            rms_level,
            peak_level,
        };
        self.last = snapshot.clone();
        snapshot
    }

    /// Raw normalized bin magnitudes (`fft_size / 2` bins) from the last
    /// computation.
    pub fn bin_magnitudes(&self) -> &[f64] {
        &self.spectrum
    }

    /// Zeroes smoothing state, the last snapshot, and the sample buffer.
    pub fn clear(&mut self) {
        self.smoothed.fill(0.0);
        self.spectrum.fill(0.0);
        self.buffer.clear();
        self.last = SpectrumSnapshot::silent(&self.bands);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn tone(freq: f64, sample_rate: f64, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f64 / sample_rate).sin() as f32)
            .collect()
    }

    fn small_config() -> AnalyzerConfig {
        AnalyzerConfig {
            fft_size: 1024,
            num_bands: 32,
            ..AnalyzerConfig::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.fft_size, 4096);
        assert_eq!(config.num_bands, 128);
        assert_eq!(config.smoothing, 0.7);
        assert!(config.log_scale);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let bad = [
            AnalyzerConfig { fft_size: 1000, ..AnalyzerConfig::default() },
            AnalyzerConfig { fft_size: 1, ..AnalyzerConfig::default() },
            AnalyzerConfig { num_bands: 0, ..AnalyzerConfig::default() },
            AnalyzerConfig { min_frequency: 0.0, ..AnalyzerConfig::default() },
            AnalyzerConfig { max_frequency: 10.0, ..AnalyzerConfig::default() },
            AnalyzerConfig { smoothing: 1.5, ..AnalyzerConfig::default() },
            AnalyzerConfig { smoothing: f64::NAN, ..AnalyzerConfig::default() },
        ];
        for config in bad {
            assert!(SpectrumAnalyzer::new(48000.0, config.clone()).is_err(), "{config:?}");
        }
    }

    #[test]
    fn test_silence_reads_zero() {
        let mut analyzer = SpectrumAnalyzer::new(48000.0, small_config()).unwrap();
        let snap = analyzer.compute_spectrum();
        assert_eq!(snap.magnitudes.len(), 32);
        assert!(snap.magnitudes.iter().all(|&m| m == 0.0));
        assert_eq!(snap.rms_level, 0.0);
        assert_eq!(snap.peak_level, 0.0);
    }

    #[test]
    fn test_tone_peak() {
        let config = AnalyzerConfig { smoothing: 0.0, ..small_config() };
        let mut analyzer = SpectrumAnalyzer::new(48000.0, config).unwrap();
        let signal = tone(3000.0, 48000.0, 1024);
        analyzer.ingest(&signal, 1024, 1);
        let snap = analyzer.compute_spectrum();
        // 3000 Hz sits exactly on bin 64 at 46.875 Hz per bin
        assert_eq!(snap.peak_frequency, 3000.0);
        assert!((snap.peak_level - 1.0).abs() < 1e-6);
        assert!((snap.rms_level - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-3);
        // Hann coherent gain halves a full-scale sine
        let loudest = snap.loudest_band().unwrap();
        assert!((snap.magnitudes[loudest] - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_smoothing_frozen_at_one() {
        let config = AnalyzerConfig { smoothing: 1.0, ..small_config() };
        let mut analyzer = SpectrumAnalyzer::new(48000.0, config).unwrap();
        analyzer.ingest(&tone(500.0, 48000.0, 1024), 1024, 1);
        let first = analyzer.compute_spectrum();
        analyzer.ingest(&tone(5000.0, 48000.0, 1024), 1024, 1);
        let second = analyzer.compute_spectrum();
        assert_eq!(first.magnitudes, second.magnitudes);
    }

    #[test]
    fn test_smoothing_decay() {
        let config = AnalyzerConfig { smoothing: 0.5, ..small_config() };
        let mut analyzer = SpectrumAnalyzer::new(48000.0, config).unwrap();
        analyzer.ingest(&tone(3000.0, 48000.0, 1024), 1024, 1);
        let first = analyzer.compute_spectrum();
        let second = analyzer.compute_spectrum();
        let band = second.loudest_band().unwrap();
        // same input twice: s1 = 0.5·m, s2 = 0.75·m
        assert!((second.magnitudes[band] / first.magnitudes[band] - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_top_band_clamped_to_half_spectrum() {
        let config = AnalyzerConfig {
            fft_size: 64,
            num_bands: 4,
            min_frequency: 100.0,
            max_frequency: 24000.0,
            smoothing: 0.0,
            log_scale: false,
        };
        let mut analyzer = SpectrumAnalyzer::new(48000.0, config).unwrap();
        assert_eq!(analyzer.bands()[3].bin_high, 32);

        analyzer.ingest(&tone(23000.0, 48000.0, 64), 64, 1);
        let snap = analyzer.compute_spectrum();
        assert_eq!(snap.magnitudes.len(), 4);
        assert!(snap.magnitudes[3] > 0.0);
        assert!(snap.peak_frequency <= 31.0 * 750.0);
    }

    #[test]
    fn test_clear() {
        let mut analyzer = SpectrumAnalyzer::new(48000.0, small_config()).unwrap();
        analyzer.ingest(&tone(1000.0, 48000.0, 1024), 1024, 1);
        analyzer.compute_spectrum();
        analyzer.clear();
        assert!(analyzer.last_snapshot().magnitudes.iter().all(|&m| m == 0.0));
        let snap = analyzer.compute_spectrum();
        assert!(snap.magnitudes.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_set_config_resizes() {
        let mut analyzer = SpectrumAnalyzer::new(48000.0, small_config()).unwrap();
        let config = AnalyzerConfig { fft_size: 2048, num_bands: 64, ..small_config() };
        analyzer.set_config(config).unwrap();
        assert_eq!(analyzer.signal_buffer().capacity(), 4096);
        assert_eq!(analyzer.bands().len(), 64);
        assert_eq!(analyzer.bin_magnitudes().len(), 1024);

        let bad = AnalyzerConfig { fft_size: 3000, ..small_config() };
        assert!(analyzer.set_config(bad).is_err());
        assert_eq!(analyzer.config().fft_size, 2048);
    }

    #[test]
    fn test_set_sample_rate_moves_bins() {
        let mut analyzer = SpectrumAnalyzer::new(48000.0, small_config()).unwrap();
        let before = analyzer.bands()[10];
        analyzer.set_sample_rate(96000.0);
        let after = analyzer.bands()[10];
        assert!(after.bin_low <= before.bin_low);
        assert_eq!(analyzer.sample_rate(), 96000.0);
    }

    #[test]
    fn test_short_window_is_padded() {
        let mut analyzer = SpectrumAnalyzer::new(48000.0, small_config()).unwrap();
        let snap = analyzer.analyze_window(&[0.5; 10]);
        assert_eq!(snap.peak_level, 0.5);
        assert!((snap.rms_level - 0.5).abs() < 1e-12);
    }
}

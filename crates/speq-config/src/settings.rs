//! Settings file format and operations.

use std::path::Path;

use serde::{Deserialize, Serialize};
use speq_analysis::AnalyzerConfig;
use speq_effects::{DEFAULT_FREQUENCIES, DEFAULT_Q, EqBandConfig, Equalizer, NUM_BANDS};

use crate::error::ConfigError;

/// Engine settings file.
///
/// Every field is optional in the file; missing ones take the documented
/// defaults.
///
/// # TOML Format
///
/// ```toml
/// sample_rate = 48000
///
/// [analyzer]
/// fft_size = 4096
/// num_bands = 128
/// min_frequency = 20.0
/// max_frequency = 20000.0
/// smoothing = 0.7
/// log_scale = true
///
/// [equalizer]
/// bypass = false
///
/// [[equalizer.bands]]
/// frequency = 60.0
/// gain = 3.0
/// q = 0.707
/// enabled = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Sample rate in Hz (defaults to 44100).
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Spectrum analyzer section.
    #[serde(default)]
    pub analyzer: AnalyzerSettings,

    /// Equalizer section.
    #[serde(default)]
    pub equalizer: EqualizerSettings,
}

fn default_sample_rate() -> u32 {
    44100
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            analyzer: AnalyzerSettings::default(),
            equalizer: EqualizerSettings::default(),
        }
    }
}

/// `[analyzer]` section, mirroring [`AnalyzerConfig`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyzerSettings {
    /// FFT length, a power of two.
    pub fft_size: usize,
    /// Number of display bands.
    pub num_bands: usize,
    /// Lowest band edge in Hz.
    pub min_frequency: f64,
    /// Highest band edge in Hz.
    pub max_frequency: f64,
    /// Smoothing factor in `[0, 1]`.
    pub smoothing: f64,
    /// Logarithmic band spacing.
    pub log_scale: bool,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self::from(&AnalyzerConfig::default())
    }
}

impl From<&AnalyzerConfig> for AnalyzerSettings {
    fn from(config: &AnalyzerConfig) -> Self {
        Self {
            fft_size: config.fft_size,
            num_bands: config.num_bands,
            min_frequency: config.min_frequency,
            max_frequency: config.max_frequency,
            smoothing: config.smoothing,
            log_scale: config.log_scale,
        }
    }
}

/// `[equalizer]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EqualizerSettings {
    /// Global bypass.
    #[serde(default)]
    pub bypass: bool,

    /// Up to five bands, in cascade order.
    #[serde(default = "default_bands")]
    pub bands: Vec<BandSettings>,
}

fn default_bands() -> Vec<BandSettings> {
    DEFAULT_FREQUENCIES
        .iter()
        .map(|&f| BandSettings {
            frequency: Some(f),
            ..BandSettings::default()
        })
        .collect()
}

impl Default for EqualizerSettings {
    fn default() -> Self {
        Self {
            bypass: false,
            bands: default_bands(),
        }
    }
}

/// One `[[equalizer.bands]]` entry.
///
/// Out-of-range values are clamped when applied, never rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BandSettings {
    /// Center frequency in Hz; the band's default position when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,

    /// Gain in dB.
    #[serde(default)]
    pub gain: f64,

    /// Q.
    #[serde(default = "default_q")]
    pub q: f64,

    /// Whether the band is processed.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_q() -> f64 {
    DEFAULT_Q
}

fn default_enabled() -> bool {
    true
}

impl Default for BandSettings {
    fn default() -> Self {
        Self {
            frequency: None,
            gain: 0.0,
            q: DEFAULT_Q,
            enabled: true,
        }
    }
}

impl From<&EqBandConfig> for BandSettings {
    fn from(band: &EqBandConfig) -> Self {
        Self {
            frequency: Some(band.frequency),
            gain: band.gain_db,
            q: band.q,
            enabled: band.enabled,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file and validate them.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse settings from a TOML string and validate them.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(toml_str)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save the settings to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the settings to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks everything that clamping cannot fix.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::InvalidSampleRate);
        }
        let count = self.equalizer.bands.len();
        if count > NUM_BANDS {
            return Err(ConfigError::TooManyBands {
                count,
                max: NUM_BANDS,
            });
        }
        for (band, entry) in self.equalizer.bands.iter().enumerate() {
            if entry.frequency.is_some_and(|f| !f.is_finite()) {
                return Err(ConfigError::invalid_band(band, "frequency is not finite"));
            }
            if !entry.gain.is_finite() {
                return Err(ConfigError::invalid_band(band, "gain is not finite"));
            }
            if !entry.q.is_finite() {
                return Err(ConfigError::invalid_band(band, "q is not finite"));
            }
        }
        self.analyzer_config()?;
        Ok(())
    }

    /// Sample rate in Hz as a float.
    pub fn sample_rate_hz(&self) -> f64 {
        f64::from(self.sample_rate)
    }

    /// Validated analyzer configuration.
    pub fn analyzer_config(&self) -> Result<AnalyzerConfig, ConfigError> {
        let a = &self.analyzer;
        let config = AnalyzerConfig {
            fft_size: a.fft_size,
            num_bands: a.num_bands,
            min_frequency: a.min_frequency,
            max_frequency: a.max_frequency,
            smoothing: a.smoothing,
            log_scale: a.log_scale,
        };
        config.validate()?;
        Ok(config)
    }

    /// Per-band settings for all five bands, unclamped.
    ///
    /// Bands without an entry are flat at their default frequency.
    pub fn band_configs(&self) -> [EqBandConfig; NUM_BANDS] {
        core::array::from_fn(|i| {
            let default_frequency = DEFAULT_FREQUENCIES[i];
            self.equalizer
                .bands
                .get(i)
                .map_or(EqBandConfig::flat(default_frequency), |b| EqBandConfig {
                    frequency: b.frequency.unwrap_or(default_frequency),
                    gain_db: b.gain,
                    q: b.q,
                    enabled: b.enabled,
                })
        })
    }

    /// Applies sample rate, every band and the bypass to `eq`.
    pub fn apply_to(&self, eq: &mut Equalizer) {
        use speq_core::Effect;

        eq.set_sample_rate(self.sample_rate_hz());
        for (band, config) in self.band_configs().into_iter().enumerate() {
            eq.set_band(band, config);
        }
        eq.set_bypass(self.equalizer.bypass);
    }

    /// Captures an equalizer and analyzer configuration.
    pub fn from_equalizer(eq: &Equalizer, analyzer: &AnalyzerConfig) -> Self {
        Self {
            sample_rate: eq.sample_rate().round() as u32,
            analyzer: AnalyzerSettings::from(analyzer),
            equalizer: EqualizerSettings {
                bypass: eq.is_bypassed(),
                bands: eq.bands().iter().map(BandSettings::from).collect(),
            },
        }
    }
}

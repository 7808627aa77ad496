//! Integration tests for speq-config.
//!
//! File round trips and the path from a settings file to a configured
//! equalizer and analyzer.

use speq_analysis::{AnalyzerConfig, SpectrumAnalyzer};
use speq_config::{ConfigError, Settings};
use speq_effects::Equalizer;
use tempfile::TempDir;

const SAMPLE: &str = r"
sample_rate = 48000

[analyzer]
fft_size = 2048
num_bands = 64
min_frequency = 30.0
max_frequency = 16000.0
smoothing = 0.5
log_scale = false

[equalizer]
bypass = false

[[equalizer.bands]]
frequency = 100.0
gain = 6.0
q = 1.0

[[equalizer.bands]]
frequency = 800.0
gain = -3.0
q = 2.0
enabled = false
";

#[test]
fn save_and_load_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("speq.toml");

    let settings = Settings::from_toml(SAMPLE).unwrap();
    settings.save(&path).unwrap();
    assert!(path.exists());

    let loaded = Settings::load(&path).unwrap();
    assert_eq!(loaded, settings);
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    let err = Settings::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn malformed_file_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "sample_rate = \"fast\"").unwrap();
    assert!(matches!(
        Settings::load(&path),
        Err(ConfigError::TomlParse(_))
    ));
}

#[test]
fn settings_drive_equalizer() {
    let settings = Settings::from_toml(SAMPLE).unwrap();
    let mut eq = Equalizer::default();
    settings.apply_to(&mut eq);

    assert_eq!(eq.sample_rate(), 48000.0);
    assert!((eq.response_at(100.0) - 6.0).abs() < 0.05);
    // disabled band contributes nothing
    assert!(eq.response_at(800.0).abs() < 0.5);
    // bands without an entry stay flat
    assert_eq!(eq.band_gain(4), 0.0);
}

#[test]
fn settings_drive_analyzer() {
    let settings = Settings::from_toml(SAMPLE).unwrap();
    let config = settings.analyzer_config().unwrap();
    let analyzer = SpectrumAnalyzer::new(settings.sample_rate_hz(), config).unwrap();
    assert_eq!(analyzer.bands().len(), 64);
    assert!(!analyzer.config().log_scale);
}

#[test]
fn equalizer_round_trips_through_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("eq.toml");

    let mut eq = Equalizer::new(96000.0);
    eq.set_band_gain(2, 7.5);
    eq.set_band_q(2, 3.0);
    eq.set_band_enabled(0, false);
    Settings::from_equalizer(&eq, &AnalyzerConfig::default())
        .save(&path)
        .unwrap();

    let mut restored = Equalizer::default();
    Settings::load(&path).unwrap().apply_to(&mut restored);
    assert_eq!(restored.bands(), eq.bands());
    assert_eq!(restored.sample_rate(), 96000.0);
}

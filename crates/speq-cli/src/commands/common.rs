//! Shared CLI helpers used across multiple commands.

use std::path::Path;

use anyhow::Context;
use speq_config::Settings;

/// Load settings from `path`, or the defaults when no file is given.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    match path {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => Ok(Settings::default()),
    }
}

/// `points` frequencies spaced evenly on a log axis from `min` to `max`.
pub fn log_spaced(min: f64, max: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let ratio = (max / min).ln();
            (0..points)
                .map(|i| min * (ratio * i as f64 / (points - 1) as f64).exp())
                .collect()
        }
    }
}

/// Deterministic white noise in `[-1, 1)`.
pub struct Noise(u64);

impl Noise {
    /// Seeded generator.
    pub fn new(seed: u64) -> Self {
        Self(seed | 1)
    }

    /// Next sample.
    pub fn next_sample(&mut self) -> f64 {
        // xorshift64*
        self.0 ^= self.0 >> 12;
        self.0 ^= self.0 << 25;
        self.0 ^= self.0 >> 27;
        let bits = self.0.wrapping_mul(0x2545_F491_4F6C_DD1D) >> 11;
        bits as f64 / (1u64 << 53) as f64 * 2.0 - 1.0
    }
}

/// Level in dBFS for display.
pub fn format_db(linear: f64) -> String {
    let db = speq_core::linear_to_db(linear);
    if db <= -120.0 {
        "-inf dB".to_string()
    } else {
        format!("{db:.1} dB")
    }
}

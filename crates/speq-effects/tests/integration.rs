//! Integration tests for the equalizer cascade.
//!
//! Measures the cascade with sine waves and checks it against single
//! [`Biquad`] stages chained by hand.

use speq_core::{Biquad, Effect, linear_to_db};
use speq_effects::{EqBandConfig, Equalizer};
use std::f64::consts::PI;

const SAMPLE_RATE: f64 = 44100.0;

// ============================================================================
// Helpers
// ============================================================================

fn sine(freq_hz: f64, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| ((2.0 * PI * freq_hz * i as f64 / SAMPLE_RATE).sin() * 0.5) as f32)
        .collect()
}

fn rms(signal: &[f32]) -> f64 {
    let sum: f64 = signal.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
    (sum / signal.len() as f64).sqrt()
}

/// Steady-state gain in dB of the equalizer at `freq_hz` (mono path).
fn measure(eq: &mut Equalizer, freq_hz: f64) -> f64 {
    eq.reset();
    let input = sine(freq_hz, 44100);
    let output: Vec<f32> = input.iter().map(|&s| eq.process_mono(s)).collect();
    linear_to_db(rms(&output[8820..]) / rms(&input[8820..]))
}

fn shaped() -> Equalizer {
    let mut eq = Equalizer::new(SAMPLE_RATE);
    eq.set_band(0, EqBandConfig { frequency: 80.0, gain_db: 5.0, q: 0.9, enabled: true });
    eq.set_band(1, EqBandConfig { frequency: 300.0, gain_db: -4.0, q: 1.5, enabled: true });
    eq.set_band(2, EqBandConfig { frequency: 1000.0, gain_db: 6.0, q: 0.707, enabled: true });
    eq.set_band(3, EqBandConfig { frequency: 5000.0, gain_db: -8.0, q: 3.0, enabled: true });
    eq.set_band(4, EqBandConfig { frequency: 12000.0, gain_db: 3.0, q: 0.7, enabled: true });
    eq
}

// ============================================================================
// Response
// ============================================================================

#[test]
fn single_band_center_gain() {
    let mut eq = Equalizer::new(SAMPLE_RATE);
    eq.set_band_frequency(2, 1000.0);
    eq.set_band_gain(2, 6.0);
    eq.set_band_q(2, 0.707);
    let db = eq.response_at(1000.0);
    assert!((db - 6.0).abs() < 0.2, "got {db:.3} dB");
}

#[test]
fn measured_cascade_matches_response_curve() {
    let mut eq = shaped();
    for freq in [80.0, 300.0, 1000.0, 2500.0, 5000.0, 12000.0] {
        let measured = measure(&mut eq, freq);
        let curve = eq.response_at(freq);
        assert!(
            (measured - curve).abs() < 0.3,
            "{freq} Hz: measured {measured:.2} dB vs curve {curve:.2} dB"
        );
    }
}

// ============================================================================
// Cascade order
// ============================================================================

#[test]
fn cascade_runs_bands_in_index_order() {
    let mut eq = shaped();
    let mut stages: Vec<Biquad> = eq
        .bands()
        .iter()
        .map(|b| {
            let mut stage = Biquad::new();
            stage.configure(SAMPLE_RATE, b.frequency, b.gain_db, b.q);
            stage
        })
        .collect();

    for &x in &sine(440.0, 512) {
        let expected = stages.iter_mut().fold(x, |acc, s| s.process(acc, 0));
        assert_eq!(eq.process_mono(x), expected);
    }
}

#[test]
fn stereo_channels_keep_separate_history() {
    let mut eq = shaped();
    let left = sine(200.0, 256);
    let mut mono = shaped();

    for &l in &left {
        let (out_l, out_r) = eq.process_stereo(l, 0.0);
        assert_eq!(out_l, mono.process_mono(l));
        assert_eq!(out_r, 0.0);
    }
}

#[test]
fn transport_reset_removes_tail() {
    let mut eq = shaped();
    for &x in &sine(100.0, 2048) {
        eq.process_mono(x);
    }
    assert_ne!(eq.process_mono(0.0), 0.0);
    eq.reset();
    assert_eq!(eq.process_mono(0.0), 0.0);
}

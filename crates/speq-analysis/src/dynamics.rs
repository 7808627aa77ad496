//! Level measurement for analysis windows
//!
//! Raw (unwindowed) RMS and peak, as reported alongside each spectrum.

/// Compute RMS (Root Mean Square) level of a signal
///
/// Returns RMS value in linear scale (not dB). Empty input reads as silence.
pub fn rms(signal: &[f32]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }

    let sum_sq: f64 = signal.iter().map(|&x| f64::from(x) * f64::from(x)).sum();
    (sum_sq / signal.len() as f64).sqrt()
}

/// Compute peak level (maximum absolute value)
pub fn peak(signal: &[f32]) -> f64 {
    signal
        .iter()
        .map(|x| f64::from(x.abs()))
        .fold(0.0, f64::max)
}

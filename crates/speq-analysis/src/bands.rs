//! Perceptual band tables mapping FFT bins to display bands.

/// One analysis band: a center frequency and an inclusive bin range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyBand {
    /// Center frequency in Hz (geometric mean of the edges on a log scale,
    /// arithmetic mean on a linear scale).
    pub center_frequency: f64,
    /// First bin covered.
    pub bin_low: usize,
    /// Last bin covered. Always `> bin_low`.
    pub bin_high: usize,
}

/// Builds `num_bands` bands between `min_frequency` and `max_frequency`.
///
/// `max_frequency` is capped at Nyquist. Edges are spaced evenly in
/// `log10(f)` when `log_scale` is set, evenly in Hz otherwise. Bin indices
/// are `floor(edge / bin_width)` with `bin_width = sample_rate / fft_size`,
/// and each band spans at least one bin past its low edge.
pub fn generate_bands(
    sample_rate: f64,
    fft_size: usize,
    num_bands: usize,
    min_frequency: f64,
    max_frequency: f64,
    log_scale: bool,
) -> Vec<FrequencyBand> {
    let max_frequency = max_frequency.min(sample_rate / 2.0);
    let bin_width = sample_rate / fft_size as f64;
    let n = num_bands as f64;

    (0..num_bands)
        .map(|i| {
            let (low, high, center) = if log_scale {
                let log_min = min_frequency.log10();
                let span = max_frequency.log10() - log_min;
                let low = 10f64.powf(log_min + span * i as f64 / n);
                let high = 10f64.powf(log_min + span * (i + 1) as f64 / n);
                (low, high, (low * high).sqrt())
            } else {
                let step = (max_frequency - min_frequency) / n;
                let low = min_frequency + step * i as f64;
                let high = low + step;
                (low, high, (low + high) * 0.5)
            };

            let bin_low = (low / bin_width).floor() as usize;
            let bin_high = ((high / bin_width).floor() as usize).max(bin_low + 1);
            FrequencyBand {
                center_frequency: center,
                bin_low,
                bin_high,
            }
        })
        .collect()
}

//! 5-band parametric equalizer.
//!
//! Five peaking [`Biquad`] stages in series plus a global bypass. Each band
//! has independent frequency, gain, Q, and an enabled switch.

use speq_core::{
    Biquad, Effect, ParamDescriptor, ParamFlags, ParamId, ParameterInfo, linear_to_db,
};

/// Number of bands in the cascade.
pub const NUM_BANDS: usize = 5;

/// Default center frequencies, low to high.
pub const DEFAULT_FREQUENCIES: [f64; NUM_BANDS] = [60.0, 250.0, 1000.0, 4000.0, 12000.0];

/// Default Q for every band (Butterworth-like width).
pub const DEFAULT_Q: f64 = 0.707;

/// Sample rate assumed until [`Equalizer::set_sample_rate`] is called.
pub const DEFAULT_SAMPLE_RATE: f64 = 44100.0;

/// Gain range in dB.
pub const MIN_GAIN_DB: f64 = -12.0;
/// Gain range in dB.
pub const MAX_GAIN_DB: f64 = 12.0;
/// Frequency range in Hz.
pub const MIN_FREQUENCY: f64 = 20.0;
/// Frequency range in Hz.
pub const MAX_FREQUENCY: f64 = 20000.0;
/// Q range.
pub const MIN_Q: f64 = 0.1;
/// Q range.
pub const MAX_Q: f64 = 10.0;

/// Bands with `|gain| <= ACTIVE_GAIN_THRESHOLD` dB are skipped in the cascade.
pub const ACTIVE_GAIN_THRESHOLD: f64 = 0.01;

/// Host parameter id of the global bypass switch. Band `b` owns ids `3b..3b+3`.
pub const BYPASS_PARAM_ID: usize = 3 * NUM_BANDS;

/// Total number of host parameters.
pub const PARAM_COUNT: usize = BYPASS_PARAM_ID + 1;

/// Settings of one band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqBandConfig {
    /// Center frequency in Hz.
    pub frequency: f64,
    /// Boost or cut in dB.
    pub gain_db: f64,
    /// Bandwidth control.
    pub q: f64,
    /// Whether the band takes part in the cascade.
    pub enabled: bool,
}

impl EqBandConfig {
    /// Flat band at `frequency` with the default Q.
    pub const fn flat(frequency: f64) -> Self {
        Self {
            frequency,
            gain_db: 0.0,
            q: DEFAULT_Q,
            enabled: true,
        }
    }

    /// Copy with every field clamped to its documented range.
    pub fn clamped(self) -> Self {
        Self {
            frequency: self.frequency.clamp(MIN_FREQUENCY, MAX_FREQUENCY),
            gain_db: self.gain_db.clamp(MIN_GAIN_DB, MAX_GAIN_DB),
            q: self.q.clamp(MIN_Q, MAX_Q),
            enabled: self.enabled,
        }
    }

    /// `true` if the band is enabled and its gain is above the skip threshold.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.enabled && libm::fabs(self.gain_db) > ACTIVE_GAIN_THRESHOLD
    }
}

/// 5-band peaking equalizer with bypass.
///
/// Bands run in index order 0 to 4. A band is skipped when it is disabled or
/// its gain is within [`ACTIVE_GAIN_THRESHOLD`] of 0 dB, so a flat equalizer
/// returns its input bit-for-bit. Setters clamp silently and recompute only
/// the affected band's coefficients; out-of-range band indices are ignored.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default | Scale |
/// |-------|------|-------|---------|-------|
/// | 3b | Band b Gain | -12.0–12.0 dB | 0.0 | linear |
/// | 3b+1 | Band b Frequency | 20–20000 Hz | 60/250/1000/4000/12000 | log |
/// | 3b+2 | Band b Q | 0.1–10.0 | 0.707 | log |
/// | 15 | Bypass | off/on | off | stepped |
///
/// # Example
///
/// ```rust
/// use speq_effects::Equalizer;
/// use speq_core::Effect;
///
/// let mut eq = Equalizer::new(48000.0);
/// eq.set_band_gain(0, 4.0);
/// eq.set_band_frequency(0, 80.0);
/// eq.set_band_gain(4, -3.0);
///
/// let (l, r) = eq.process_stereo(0.5, 0.5);
/// assert!(l.is_finite() && r.is_finite());
/// assert!(eq.response_at(80.0) > 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct Equalizer {
    bands: [EqBandConfig; NUM_BANDS],
    filters: [Biquad; NUM_BANDS],
    bypass: bool,
    sample_rate: f64,
}

impl Default for Equalizer {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

impl Equalizer {
    /// Creates a flat equalizer with the default band layout.
    pub fn new(sample_rate: f64) -> Self {
        let mut eq = Self {
            bands: DEFAULT_FREQUENCIES.map(EqBandConfig::flat),
            filters: core::array::from_fn(|_| Biquad::new()),
            bypass: false,
            sample_rate,
        };
        eq.update_all_coefficients();
        eq
    }

    /// Current sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// All band settings, in cascade order.
    pub fn bands(&self) -> &[EqBandConfig; NUM_BANDS] {
        &self.bands
    }

    /// Settings of one band, `None` if `band` is out of range.
    pub fn band(&self, band: usize) -> Option<EqBandConfig> {
        self.bands.get(band).copied()
    }

    /// Replaces a whole band in one step (clamped), recomputing its filter.
    pub fn set_band(&mut self, band: usize, config: EqBandConfig) {
        if let Some(slot) = self.bands.get_mut(band) {
            *slot = config.clamped();
            self.update_band_coefficients(band);
        }
    }

    /// Set band gain in dB (-12 to +12).
    pub fn set_band_gain(&mut self, band: usize, gain_db: f64) {
        if let Some(slot) = self.bands.get_mut(band) {
            slot.gain_db = gain_db.clamp(MIN_GAIN_DB, MAX_GAIN_DB);
            self.update_band_coefficients(band);
        }
    }

    /// Set band center frequency in Hz (20-20000).
    pub fn set_band_frequency(&mut self, band: usize, frequency: f64) {
        if let Some(slot) = self.bands.get_mut(band) {
            slot.frequency = frequency.clamp(MIN_FREQUENCY, MAX_FREQUENCY);
            self.update_band_coefficients(band);
        }
    }

    /// Set band Q (0.1-10).
    pub fn set_band_q(&mut self, band: usize, q: f64) {
        if let Some(slot) = self.bands.get_mut(band) {
            slot.q = q.clamp(MIN_Q, MAX_Q);
            self.update_band_coefficients(band);
        }
    }

    /// Enable or disable a band without losing its settings.
    pub fn set_band_enabled(&mut self, band: usize, enabled: bool) {
        if let Some(slot) = self.bands.get_mut(band) {
            slot.enabled = enabled;
        }
    }

    /// Band gain in dB, `0.0` for an out-of-range band.
    pub fn band_gain(&self, band: usize) -> f64 {
        self.bands.get(band).map_or(0.0, |b| b.gain_db)
    }

    /// Band frequency in Hz, `1000.0` for an out-of-range band.
    pub fn band_frequency(&self, band: usize) -> f64 {
        self.bands.get(band).map_or(1000.0, |b| b.frequency)
    }

    /// Band Q, [`DEFAULT_Q`] for an out-of-range band.
    pub fn band_q(&self, band: usize) -> f64 {
        self.bands.get(band).map_or(DEFAULT_Q, |b| b.q)
    }

    /// Whether a band is enabled, `false` for an out-of-range band.
    pub fn is_band_enabled(&self, band: usize) -> bool {
        self.bands.get(band).is_some_and(|b| b.enabled)
    }

    /// Set global bypass. Bypassed processing leaves samples untouched.
    pub fn set_bypass(&mut self, bypass: bool) {
        self.bypass = bypass;
    }

    /// Global bypass state.
    pub fn is_bypassed(&self) -> bool {
        self.bypass
    }

    /// Filters one mono sample (channel 0 history).
    #[inline]
    pub fn process_mono(&mut self, sample: f32) -> f32 {
        self.process_channel(sample, 0)
    }

    /// Filters an interleaved block of `frames` frames in place.
    ///
    /// Only the first two channels of each frame are filtered; `frames` is
    /// capped at what `buffer` actually holds.
    pub fn process_block(&mut self, buffer: &mut [f32], frames: usize, channels: usize) {
        if self.bypass || channels == 0 {
            return;
        }
        let frames = frames.min(buffer.len() / channels);
        let filtered = channels.min(speq_core::MAX_CHANNELS);
        for frame in buffer[..frames * channels].chunks_exact_mut(channels) {
            for (ch, sample) in frame.iter_mut().take(filtered).enumerate() {
                *sample = self.process_channel(*sample, ch);
            }
        }
    }

    /// Combined response of the active bands at `frequency`, in dB.
    ///
    /// Display only; reads coefficients, processes nothing. With no active
    /// bands it reads 0 dB.
    pub fn response_at(&self, frequency: f64) -> f64 {
        let magnitude: f64 = self
            .bands
            .iter()
            .zip(&self.filters)
            .filter(|(band, _)| band.is_active())
            .map(|(_, filter)| filter.response_at(frequency, self.sample_rate))
            .product();
        linear_to_db(magnitude)
    }

    #[inline]
    fn process_channel(&mut self, sample: f32, channel: usize) -> f32 {
        if self.bypass {
            return sample;
        }
        let mut out = sample;
        for (band, filter) in self.bands.iter().zip(self.filters.iter_mut()) {
            if band.is_active() {
                out = filter.process(out, channel);
            }
        }
        out
    }

    fn update_band_coefficients(&mut self, band: usize) {
        let b = self.bands[band];
        self.filters[band].configure(self.sample_rate, b.frequency, b.gain_db, b.q);
    }

    fn update_all_coefficients(&mut self) {
        for band in 0..NUM_BANDS {
            self.update_band_coefficients(band);
        }
    }
}

impl Effect for Equalizer {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.process_mono(input)
    }

    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        (self.process_channel(left, 0), self.process_channel(right, 1))
    }

    fn process_interleaved(&mut self, buffer: &mut [f32], channels: usize) {
        let frames = buffer.len() / channels.max(1);
        self.process_block(buffer, frames, channels);
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.update_all_coefficients();
    }

    fn reset(&mut self) {
        for filter in &mut self.filters {
            filter.reset();
        }
    }
}

const GAIN_NAMES: [&str; NUM_BANDS] = [
    "Band 1 Gain",
    "Band 2 Gain",
    "Band 3 Gain",
    "Band 4 Gain",
    "Band 5 Gain",
];
const FREQUENCY_NAMES: [&str; NUM_BANDS] = [
    "Band 1 Frequency",
    "Band 2 Frequency",
    "Band 3 Frequency",
    "Band 4 Frequency",
    "Band 5 Frequency",
];
const Q_NAMES: [&str; NUM_BANDS] = ["Band 1 Q", "Band 2 Q", "Band 3 Q", "Band 4 Q", "Band 5 Q"];
const GAIN_SHORT: [&str; NUM_BANDS] = ["B1 Gain", "B2 Gain", "B3 Gain", "B4 Gain", "B5 Gain"];
const FREQUENCY_SHORT: [&str; NUM_BANDS] = ["B1 Freq", "B2 Freq", "B3 Freq", "B4 Freq", "B5 Freq"];
const Q_SHORT: [&str; NUM_BANDS] = ["B1 Q", "B2 Q", "B3 Q", "B4 Q", "B5 Q"];
const GAIN_IDS: [&str; NUM_BANDS] = ["b1_gain", "b2_gain", "b3_gain", "b4_gain", "b5_gain"];
const FREQUENCY_IDS: [&str; NUM_BANDS] = ["b1_freq", "b2_freq", "b3_freq", "b4_freq", "b5_freq"];
const Q_IDS: [&str; NUM_BANDS] = ["b1_q", "b2_q", "b3_q", "b4_q", "b5_q"];

/// Descriptor of the host parameter at `index`, `None` past the bypass id.
///
/// Band `b` owns ids `3b` (gain), `3b + 1` (frequency) and `3b + 2` (Q).
pub fn param_descriptor(index: usize) -> Option<ParamDescriptor> {
    let id = ParamId(index as u32);
    if index == BYPASS_PARAM_ID {
        return Some(
            ParamDescriptor::switch("Bypass", "Bypass", false)
                .with_id(id, "bypass")
                .with_flags(
                    ParamFlags::AUTOMATABLE
                        .union(ParamFlags::STEPPED)
                        .union(ParamFlags::BYPASS),
                ),
        );
    }
    if index > BYPASS_PARAM_ID {
        return None;
    }
    let band = index / 3;
    let desc = match index % 3 {
        0 => ParamDescriptor::gain_db(
            GAIN_NAMES[band],
            GAIN_SHORT[band],
            MIN_GAIN_DB,
            MAX_GAIN_DB,
            0.0,
        )
        .with_id(id, GAIN_IDS[band]),
        1 => ParamDescriptor::frequency_hz(
            FREQUENCY_NAMES[band],
            FREQUENCY_SHORT[band],
            MIN_FREQUENCY,
            MAX_FREQUENCY,
            DEFAULT_FREQUENCIES[band],
        )
        .with_id(id, FREQUENCY_IDS[band]),
        _ => ParamDescriptor::q_factor(Q_NAMES[band], Q_SHORT[band], MIN_Q, MAX_Q, DEFAULT_Q)
            .with_id(id, Q_IDS[band]),
    };
    Some(desc)
}

impl ParameterInfo for Equalizer {
    fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        param_descriptor(index)
    }

    fn get_param(&self, index: usize) -> f64 {
        if index == BYPASS_PARAM_ID {
            return if self.bypass { 1.0 } else { 0.0 };
        }
        if index > BYPASS_PARAM_ID {
            return 0.0;
        }
        let band = index / 3;
        match index % 3 {
            0 => self.band_gain(band),
            1 => self.band_frequency(band),
            _ => self.band_q(band),
        }
    }

    fn set_param(&mut self, index: usize, value: f64) {
        if index == BYPASS_PARAM_ID {
            self.set_bypass(value > 0.5);
            return;
        }
        if index > BYPASS_PARAM_ID {
            return;
        }
        let band = index / 3;
        match index % 3 {
            0 => self.set_band_gain(band, value),
            1 => self.set_band_frequency(band, value),
            _ => self.set_band_q(band, value),
        }
    }
}

//! Biquad (bi-quadratic) peaking EQ stage.
//!
//! A second-order IIR section with per-channel history, configured as an
//! RBJ Audio EQ Cookbook peaking filter. One [`Biquad`] serves both channels
//! of a stereo stream: coefficients are shared, history is not.
//!
//! Coefficients and history are kept in `f64`; audio enters and leaves as `f32`.

use core::f64::consts::PI;
use libm::{cos, pow, sin, sqrt};

/// Number of channels a single stage keeps history for.
pub const MAX_CHANNELS: usize = 2;

/// Lowest center frequency a stage accepts, in Hz.
pub const MIN_STAGE_FREQUENCY: f64 = 20.0;

/// Highest center frequency as a fraction of the sample rate.
pub const MAX_STAGE_FREQUENCY_RATIO: f64 = 0.45;

/// Lowest accepted Q.
pub const MIN_STAGE_Q: f64 = 0.1;

/// Highest accepted Q.
pub const MAX_STAGE_Q: f64 = 10.0;

/// Normalized biquad coefficients (`a0 == 1`).
///
/// Kept as one `Copy` value so a whole set can be swapped in a single
/// assignment; a stage never observes a mix of old and new terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    /// Feedforward term for x[n].
    pub b0: f64,
    /// Feedforward term for x[n-1].
    pub b1: f64,
    /// Feedforward term for x[n-2].
    pub b2: f64,
    /// Feedback term for y[n-1].
    pub a1: f64,
    /// Feedback term for y[n-2].
    pub a2: f64,
}

impl BiquadCoefficients {
    /// Passthrough coefficients: `y[n] = x[n]`.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Builds a normalized set from raw cookbook terms, dividing through by `a0`.
    pub fn from_raw(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        let a0_inv = 1.0 / a0;
        Self {
            b0: b0 * a0_inv,
            b1: b1 * a0_inv,
            b2: b2 * a0_inv,
            a1: a1 * a0_inv,
            a2: a2 * a0_inv,
        }
    }

    /// Peaking EQ coefficients (RBJ cookbook).
    ///
    /// `frequency` is clamped to `[20, 0.45 * sample_rate]` and `q` to
    /// `[0.1, 10]` before the design equations run:
    ///
    /// ```text
    /// A     = 10^(gain_db / 40)
    /// w0    = 2π · f / fs
    /// alpha = sin(w0) / (2Q)
    ///
    /// b0 = 1 + alpha·A    a0 = 1 + alpha/A
    /// b1 = -2·cos(w0)     a1 = -2·cos(w0)
    /// b2 = 1 - alpha·A    a2 = 1 - alpha/A
    /// ```
    ///
    /// The bell is symmetric in dB for boost and cut, its width set by `q`
    /// independent of the gain sign.
    pub fn peaking(sample_rate: f64, frequency: f64, gain_db: f64, q: f64) -> Self {
        let frequency = clamp_stage_frequency(frequency, sample_rate);
        let q = q.clamp(MIN_STAGE_Q, MAX_STAGE_Q);

        let a = pow(10.0, gain_db / 40.0);
        let omega = 2.0 * PI * frequency / sample_rate;
        let cos_omega = cos(omega);
        let alpha = sin(omega) / (2.0 * q);

        Self::from_raw(
            1.0 + alpha * a,
            -2.0 * cos_omega,
            1.0 - alpha * a,
            1.0 + alpha / a,
            -2.0 * cos_omega,
            1.0 - alpha / a,
        )
    }

    /// Linear magnitude `|H(e^jw)|` at `frequency`.
    ///
    /// Evaluated analytically from the coefficients; no samples are processed.
    pub fn magnitude_at(&self, frequency: f64, sample_rate: f64) -> f64 {
        let w = 2.0 * PI * frequency / sample_rate;
        let (cos_w, sin_w) = (cos(w), sin(w));
        let (cos_2w, sin_2w) = (cos(2.0 * w), sin(2.0 * w));

        let num_re = self.b0 + self.b1 * cos_w + self.b2 * cos_2w;
        let num_im = -self.b1 * sin_w - self.b2 * sin_2w;
        let den_re = 1.0 + self.a1 * cos_w + self.a2 * cos_2w;
        let den_im = -self.a1 * sin_w - self.a2 * sin_2w;

        let num = sqrt(num_re * num_re + num_im * num_im);
        let den = sqrt(den_re * den_re + den_im * den_im);
        num / den
    }
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn clamp_stage_frequency(frequency: f64, sample_rate: f64) -> f64 {
    let max = sample_rate * MAX_STAGE_FREQUENCY_RATIO;
    let clamped = frequency.min(max).max(MIN_STAGE_FREQUENCY);
    #[cfg(feature = "tracing")]
    if clamped != frequency {
        tracing::debug!(frequency, clamped, sample_rate, "biquad: center frequency clamped");
    }
    clamped
}

/// Per-channel delay line: x[n-1], x[n-2], y[n-1], y[n-2].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct History {
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

/// Peaking EQ biquad with independent history per channel.
///
/// Implements the Direct Form I difference equation:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
///
/// Coefficients change only through [`configure`](Self::configure); history
/// changes only through [`process`](Self::process) and [`reset`](Self::reset).
#[derive(Debug, Clone)]
pub struct Biquad {
    coefficients: BiquadCoefficients,
    history: [History; MAX_CHANNELS],
}

impl Biquad {
    /// Creates a stage with passthrough coefficients and silent history.
    pub fn new() -> Self {
        Self {
            coefficients: BiquadCoefficients::IDENTITY,
            history: [History::default(); MAX_CHANNELS],
        }
    }

    /// Derives peaking coefficients for the given design.
    ///
    /// History is left alone so a parameter sweep does not click.
    pub fn configure(&mut self, sample_rate: f64, frequency: f64, gain_db: f64, q: f64) {
        self.coefficients = BiquadCoefficients::peaking(sample_rate, frequency, gain_db, q);
    }

    /// Current coefficient set.
    pub fn coefficients(&self) -> BiquadCoefficients {
        self.coefficients
    }

    /// Filters one sample on `channel`.
    ///
    /// A channel index outside `0..MAX_CHANNELS` returns the input unchanged.
    #[inline]
    pub fn process(&mut self, input: f32, channel: usize) -> f32 {
        let Some(h) = self.history.get_mut(channel) else {
            return input;
        };
        let c = &self.coefficients;
        let x0 = f64::from(input);
        let y0 = c.b0 * x0 + c.b1 * h.x1 + c.b2 * h.x2 - c.a1 * h.y1 - c.a2 * h.y2;

        h.x2 = h.x1;
        h.x1 = x0;
        h.y2 = h.y1;
        h.y1 = y0;

        y0 as f32
    }

    /// Zeroes the history of every channel. Coefficients are untouched.
    pub fn reset(&mut self) {
        self.history = [History::default(); MAX_CHANNELS];
    }

    /// Linear magnitude response at `frequency` for the current coefficients.
    pub fn response_at(&self, frequency: f64, sample_rate: f64) -> f64 {
        self.coefficients.magnitude_at(frequency, sample_rate)
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

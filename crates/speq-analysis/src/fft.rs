//! Radix-2 FFT with windowing functions
//!
//! Iterative decimation-in-time transform: a bit-reversal permutation of the
//! input followed by `log2(n)` butterfly passes, each combining sub-blocks of
//! length `len` with the root of unity `e^{-2πi/len}`.
//!
//! Two ways in:
//!
//! - Free functions ([`transform`], [`transform_in_place`], [`inverse`]) for
//!   one-off use. [`transform`] zero-pads to the next power of two;
//!   [`transform_in_place`] refuses anything that is not a power of two.
//! - [`Fft`], a fixed-size plan with cached twiddles and bit-reversal table,
//!   for repeated transforms of the same size on the analysis path.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::error::AnalysisError;

/// Floor used by [`power_db`] when the caller has no preference.
pub const DEFAULT_MIN_DB: f64 = -100.0;

/// Smallest power of two `>= n`. `next_power_of_two(0) == 1`.
#[inline]
pub fn next_power_of_two(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// `true` if `n` is a power of two (`0` is not).
#[inline]
pub fn is_power_of_two(n: usize) -> bool {
    n != 0 && n & (n - 1) == 0
}

/// Reorders `data` into bit-reversed index order.
fn bit_reverse_permute(data: &mut [Complex64]) {
    let n = data.len();
    let mut j = 0;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            data.swap(i, j);
        }
    }
}

/// Bit-reversal followed by the butterfly passes.
///
/// `data.len()` must be a power of two.
fn butterflies(data: &mut [Complex64]) {
    debug_assert!(is_power_of_two(data.len()));
    let n = data.len();
    bit_reverse_permute(data);

    let mut len = 2;
    while len <= n {
        let angle = -2.0 * PI / len as f64;
        let wlen = Complex64::new(angle.cos(), angle.sin());
        for block in data.chunks_exact_mut(len) {
            let (lo, hi) = block.split_at_mut(len / 2);
            let mut w = Complex64::new(1.0, 0.0);
            for (u, v) in lo.iter_mut().zip(hi.iter_mut()) {
                let t = *v * w;
                *v = *u - t;
                *u += t;
                w *= wlen;
            }
        }
        len <<= 1;
    }
}

/// Forward FFT of a complex buffer in place.
///
/// Lengths 0 and 1 are returned unchanged.
///
/// # Errors
///
/// [`AnalysisError::InvalidConfiguration`] if `data.len()` is not a power of
/// two. The buffer is not touched in that case.
pub fn transform_in_place(data: &mut [Complex64]) -> Result<(), AnalysisError> {
    let n = data.len();
    if n <= 1 {
        return Ok(());
    }
    if !is_power_of_two(n) {
        return Err(AnalysisError::not_power_of_two(n));
    }

    butterflies(data);
    Ok(())
}

/// Forward FFT of a real signal, zero-padded to the next power of two.
///
/// An empty signal yields an empty spectrum.
pub fn transform(signal: &[f64]) -> Vec<Complex64> {
    if signal.is_empty() {
        return Vec::new();
    }
    let n = next_power_of_two(signal.len());
    let mut data: Vec<Complex64> = signal.iter().map(|&x| Complex64::new(x, 0.0)).collect();
    data.resize(n, Complex64::new(0.0, 0.0));
    butterflies(&mut data);
    data
}

/// Inverse FFT: conjugate, forward transform, conjugate, scale by `1/n`.
///
/// Input that is not a power of two long is zero-padded first, like
/// [`transform`].
pub fn inverse(spectrum: &[Complex64]) -> Vec<Complex64> {
    if spectrum.is_empty() {
        return Vec::new();
    }
    let n = next_power_of_two(spectrum.len());
    let mut data: Vec<Complex64> = spectrum.iter().map(Complex64::conj).collect();
    data.resize(n, Complex64::new(0.0, 0.0));
    butterflies(&mut data);
    let scale = 1.0 / n as f64;
    for c in &mut data {
        *c = c.conj() * scale;
    }
    data
}

/// Elementwise modulus `|X[k]|`.
pub fn magnitude(spectrum: &[Complex64]) -> Vec<f64> {
    spectrum.iter().map(|c| c.norm()).collect()
}

/// Power spectrum `10·log10(|X[k]|²)` floored at `min_db`.
///
/// Zero-power bins map straight to `min_db`.
pub fn power_db(spectrum: &[Complex64], min_db: f64) -> Vec<f64> {
    spectrum
        .iter()
        .map(|c| speq_core::power_to_db(c.norm_sqr(), min_db))
        .collect()
}

/// Window function types
///
/// Symmetric forms over `n` samples, using `n - 1` as the denominator so the
/// first and last coefficients sit at the window edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Window {
    /// Hann window (raised cosine): `0.5·(1 − cos(2πi/(n−1)))`
    #[default]
    Hann,
    /// Hamming window: `0.54 − 0.46·cos(2πi/(n−1))`
    Hamming,
    /// Blackman window: `0.42 − 0.5·cos(2πi/(n−1)) + 0.08·cos(4πi/(n−1))`
    Blackman,
}

impl Window {
    /// Coefficient `i` of an `n`-point window. A 1-point window is `1.0`.
    pub fn coefficient(&self, i: usize, n: usize) -> f64 {
        if n <= 1 {
            return 1.0;
        }
        let x = 2.0 * PI * i as f64 / (n - 1) as f64;
        match self {
            Window::Hann => 0.5 * (1.0 - x.cos()),
            Window::Hamming => 0.54 - 0.46 * x.cos(),
            Window::Blackman => 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos(),
        }
    }

    /// Apply window to a buffer
    pub fn apply(&self, buffer: &mut [f64]) {
        let n = buffer.len();
        for (i, sample) in buffer.iter_mut().enumerate() {
            *sample *= self.coefficient(i, n);
        }
    }

    /// Get window coefficients
    pub fn coefficients(&self, size: usize) -> Vec<f64> {
        (0..size).map(|i| self.coefficient(i, size)).collect()
    }
}

/// Fixed-size FFT plan.
///
/// Caches the `n/2` twiddle factors and the bit-reversal permutation so
/// repeated transforms do no trigonometry and no allocation.
#[derive(Debug, Clone)]
pub struct Fft {
    size: usize,
    twiddles: Vec<Complex64>,
    bit_reversed: Vec<usize>,
}

impl Fft {
    /// Plans a transform of `size` points.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InvalidConfiguration`] if `size` is not a power of two.
    pub fn new(size: usize) -> Result<Self, AnalysisError> {
        if !is_power_of_two(size) {
            return Err(AnalysisError::not_power_of_two(size));
        }
        let twiddles = (0..size / 2)
            .map(|k| Complex64::from_polar(1.0, -2.0 * PI * k as f64 / size as f64))
            .collect();
        let bits = size.trailing_zeros();
        let bit_reversed = (0..size)
            .map(|i| {
                if bits == 0 {
                    0
                } else {
                    i.reverse_bits() >> (usize::BITS - bits)
                }
            })
            .collect();
        Ok(Self {
            size,
            twiddles,
            bit_reversed,
        })
    }

    /// Get FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward transform of `buffer` in place.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InvalidConfiguration`] if `buffer.len()` differs from
    /// the planned size.
    pub fn forward(&self, buffer: &mut [Complex64]) -> Result<(), AnalysisError> {
        self.check_len(buffer)?;
        self.forward_unchecked(buffer);
        Ok(())
    }

    fn check_len(&self, buffer: &[Complex64]) -> Result<(), AnalysisError> {
        if buffer.len() != self.size {
            return Err(AnalysisError::invalid_configuration(format!(
                "buffer length {} does not match FFT size {}",
                buffer.len(),
                self.size
            )));
        }
        Ok(())
    }

    /// Forward transform for a buffer already known to be `size` long.
    pub(crate) fn forward_unchecked(&self, buffer: &mut [Complex64]) {
        debug_assert_eq!(buffer.len(), self.size);
        for (i, &j) in self.bit_reversed.iter().enumerate() {
            if i < j {
                buffer.swap(i, j);
            }
        }
        let mut len = 2;
        while len <= self.size {
            let half = len / 2;
            let stride = self.size / len;
            for block in buffer.chunks_exact_mut(len) {
                let (lo, hi) = block.split_at_mut(half);
                for (k, (u, v)) in lo.iter_mut().zip(hi.iter_mut()).enumerate() {
                    let t = *v * self.twiddles[k * stride];
                    *v = *u - t;
                    *u += t;
                }
            }
            len <<= 1;
        }
    }

    /// Inverse transform of `buffer` in place, scaled by `1/n`.
    ///
    /// # Errors
    ///
    /// Same as [`forward`](Self::forward).
    pub fn inverse(&self, buffer: &mut [Complex64]) -> Result<(), AnalysisError> {
        self.check_len(buffer)?;
        for c in buffer.iter_mut() {
            *c = c.conj();
        }
        self.forward_unchecked(buffer);
        let scale = 1.0 / self.size as f64;
        for c in buffer.iter_mut() {
            *c = c.conj() * scale;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Complex64, b: Complex64, tol: f64) {
        assert!((a - b).norm() < tol, "{a} vs {b}");
    }

    #[test]
    fn test_power_of_two_helpers() {
        assert_eq!(next_power_of_two(0), 1);
        assert_eq!(next_power_of_two(1), 1);
        assert_eq!(next_power_of_two(5), 8);
        assert_eq!(next_power_of_two(4096), 4096);
        assert!(is_power_of_two(1));
        assert!(is_power_of_two(1024));
        assert!(!is_power_of_two(0));
        assert!(!is_power_of_two(12));
    }

    #[test]
    fn test_impulse_is_flat() {
        let mut signal = vec![0.0; 8];
        signal[0] = 1.0;
        for bin in transform(&signal) {
            assert_close(bin, Complex64::new(1.0, 0.0), 1e-12);
        }
    }

    #[test]
    fn test_dc_lands_in_bin_zero() {
        let spectrum = transform(&[1.0; 16]);
        assert_close(spectrum[0], Complex64::new(16.0, 0.0), 1e-12);
        for bin in &spectrum[1..] {
            assert!(bin.norm() < 1e-12);
        }
    }

    #[test]
    fn test_transform_pads() {
        assert_eq!(transform(&[1.0, 2.0, 3.0]).len(), 4);
        assert!(transform(&[]).is_empty());
        assert_eq!(transform(&[2.5]), vec![Complex64::new(2.5, 0.0)]);
    }

    #[test]
    fn test_in_place_rejects_non_power_of_two() {
        let mut data = vec![Complex64::new(1.0, 0.0); 6];
        let before = data.clone();
        let err = transform_in_place(&mut data).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfiguration { .. }));
        assert_eq!(data, before);
    }

    #[test]
    fn test_inverse_roundtrip() {
        let signal: Vec<f64> = (0..100).map(|i| (i as f64 * 0.37).sin() + 0.1 * i as f64).collect();
        let back = inverse(&transform(&signal));
        assert_eq!(back.len(), 128);
        for (i, &x) in signal.iter().enumerate() {
            assert!((back[i].re - x).abs() < 1e-9);
            assert!(back[i].im.abs() < 1e-9);
        }
        for c in &back[100..] {
            assert!(c.norm() < 1e-9);
        }
    }

    #[test]
    fn test_plan_matches_free_function() {
        let signal: Vec<f64> = (0..256).map(|i| ((i * 7) % 13) as f64 - 6.0).collect();
        let expected = transform(&signal);
        let plan = Fft::new(256).unwrap();
        let mut data: Vec<Complex64> = signal.iter().map(|&x| Complex64::new(x, 0.0)).collect();
        plan.forward(&mut data).unwrap();
        for (a, b) in data.iter().zip(&expected) {
            assert_close(*a, *b, 1e-9);
        }
        plan.inverse(&mut data).unwrap();
        for (a, &x) in data.iter().zip(&signal) {
            assert!((a.re - x).abs() < 1e-9);
        }
    }

    #[test]
    fn test_plan_rejects_bad_sizes() {
        assert!(Fft::new(0).is_err());
        assert!(Fft::new(100).is_err());
        let plan = Fft::new(8).unwrap();
        let mut short = vec![Complex64::new(0.0, 0.0); 4];
        assert!(plan.forward(&mut short).is_err());
    }

    #[test]
    fn test_plan_leaves_mismatched_buffer_untouched() {
        let plan = Fft::new(8).unwrap();
        let mut short = vec![Complex64::new(1.0, 2.0); 4];
        assert!(plan.inverse(&mut short).is_err());
        assert_eq!(short, vec![Complex64::new(1.0, 2.0); 4]);
    }

    #[test]
    fn test_unchecked_matches_checked() {
        let signal: Vec<Complex64> = (0..64)
            .map(|i| Complex64::new((i as f64 * 0.21).cos(), 0.0))
            .collect();
        let plan = Fft::new(64).unwrap();
        let mut checked = signal.clone();
        plan.forward(&mut checked).unwrap();
        let mut unchecked = signal.clone();
        plan.forward_unchecked(&mut unchecked);
        assert_eq!(checked, unchecked);

        let mut free = signal;
        transform_in_place(&mut free).unwrap();
        for (a, b) in free.iter().zip(&checked) {
            assert_close(*a, *b, 1e-9);
        }
    }

    #[test]
    fn test_single_point_plan() {
        let plan = Fft::new(1).unwrap();
        let mut data = vec![Complex64::new(3.0, -1.0)];
        plan.forward(&mut data).unwrap();
        assert_eq!(data[0], Complex64::new(3.0, -1.0));
    }

    #[test]
    fn test_magnitude_and_power() {
        let spectrum = [
            Complex64::new(3.0, 4.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(1e-8, 0.0),
        ];
        assert_eq!(magnitude(&spectrum), vec![5.0, 0.0, 1e-8]);
        let db = power_db(&spectrum, DEFAULT_MIN_DB);
        assert!((db[0] - 10.0 * 25.0f64.log10()).abs() < 1e-12);
        assert_eq!(db[1], -100.0);
        assert_eq!(db[2], -100.0);
    }

    #[test]
    fn test_window_shapes() {
        let hann = Window::Hann.coefficients(5);
        assert!(hann[0].abs() < 1e-15 && hann[4].abs() < 1e-15);
        assert!((hann[2] - 1.0).abs() < 1e-15);

        let hamming = Window::Hamming.coefficients(5);
        assert!((hamming[0] - 0.08).abs() < 1e-12);
        assert!((hamming[2] - 1.0).abs() < 1e-12);

        let blackman = Window::Blackman.coefficients(5);
        assert!(blackman[0].abs() < 1e-12);
        assert!((blackman[2] - 1.0).abs() < 1e-12);

        assert_eq!(Window::Hann.coefficients(1), vec![1.0]);
    }

    #[test]
    fn test_window_apply() {
        let mut buf = vec![2.0; 5];
        Window::Hann.apply(&mut buf);
        assert!((buf[2] - 2.0).abs() < 1e-12);
        assert!(buf[0].abs() < 1e-12);
    }
}

//! Core Effect trait.
//!
//! The [`Effect`] trait is the seam between a processor and whatever drives
//! it (a host callback, an offline renderer, a test). Everything runs in
//! place on `f32` audio, one sample, one stereo frame, or one interleaved
//! block at a time.
//!
//! ## Design Decisions
//!
//! - **Object-safe**: `dyn Effect` works, generic dispatch is preferred.
//! - **No allocations**: every method is callable from a real-time callback.
//! - **Two channels of state**: interleaved blocks with more channels leave
//!   channels beyond the second untouched.

/// Core trait for audio processors.
///
/// # Example
///
/// ```rust
/// use speq_core::Effect;
///
/// struct Gain {
///     gain: f32,
/// }
///
/// impl Effect for Gain {
///     fn process(&mut self, input: f32) -> f32 {
///         input * self.gain
///     }
///
///     fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
///         (left * self.gain, right * self.gain)
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f64) {}
///
///     fn reset(&mut self) {}
/// }
///
/// let mut g = Gain { gain: 0.5 };
/// let mut block = [1.0, 1.0, 2.0, 2.0];
/// g.process_interleaved(&mut block, 2);
/// assert_eq!(block, [0.5, 0.5, 1.0, 1.0]);
/// ```
pub trait Effect {
    /// Process a single mono sample (channel 0 state).
    fn process(&mut self, input: f32) -> f32;

    /// Process one stereo frame.
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32);

    /// Process an interleaved block in place.
    ///
    /// `buffer.len()` should be a multiple of `channels`; a trailing partial
    /// frame is ignored. Mono blocks go through [`process`](Self::process),
    /// anything wider through [`process_stereo`](Self::process_stereo) on the
    /// first two channels of each frame.
    fn process_interleaved(&mut self, buffer: &mut [f32], channels: usize) {
        match channels {
            0 => {}
            1 => {
                for sample in buffer.iter_mut() {
                    *sample = self.process(*sample);
                }
            }
            _ => {
                for frame in buffer.chunks_exact_mut(channels) {
                    let (l, r) = self.process_stereo(frame[0], frame[1]);
                    frame[0] = l;
                    frame[1] = r;
                }
            }
        }
    }

    /// Update the sample rate and recompute any rate-dependent coefficients.
    fn set_sample_rate(&mut self, sample_rate: f64);

    /// Clear internal state (filter history) without changing parameters.
    ///
    /// Called on transport discontinuities (start, stop, seek) so stale
    /// history does not click into the next block.
    fn reset(&mut self);
}

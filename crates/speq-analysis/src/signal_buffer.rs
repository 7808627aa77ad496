//! Circular mono sample store feeding the analyzer.

use speq_core::mono_mix;

/// Fixed-capacity ring of mono samples.
///
/// Capacity is twice the analysis window so a full window is always
/// available behind the write cursor. Writes wrap; the most recent
/// `capacity` samples are retained.
#[derive(Debug, Clone)]
pub struct SignalBuffer {
    data: Vec<f32>,
    write_pos: usize,
    window_size: usize,
}

impl SignalBuffer {
    /// Creates a silent buffer for windows of `window_size` samples.
    pub fn new(window_size: usize) -> Self {
        Self {
            data: vec![0.0; window_size * 2],
            write_pos: 0,
            window_size,
        }
    }

    /// Window length the buffer is sized for.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Total number of samples held.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Index the next sample will be written to.
    pub fn write_position(&self) -> usize {
        self.write_pos
    }

    /// Appends one mono sample.
    #[inline]
    pub fn push(&mut self, sample: f32) {
        if self.data.is_empty() {
            return;
        }
        self.data[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.data.len();
    }

    /// Mixes `frames` interleaved frames to mono and appends them.
    ///
    /// Each frame contributes the mean of all its channels.
    /// `frames` is capped at what `samples` holds; zero channels is a no-op.
    pub fn ingest(&mut self, samples: &[f32], frames: usize, channels: usize) {
        if channels == 0 {
            return;
        }
        let frames = frames.min(samples.len() / channels);
        for frame in samples[..frames * channels].chunks_exact(channels) {
            self.push(mono_mix(frame));
        }
    }

    /// Copies the most recent `out.len()` samples, oldest first.
    ///
    /// `out` is normally exactly one window long; anything longer than the
    /// capacity is filled from the oldest retained sample onward and the rest
    /// left at zero.
    pub fn copy_latest(&self, out: &mut [f32]) {
        let len = self.data.len();
        let count = out.len().min(len);
        if count == 0 {
            return;
        }
        let start = (self.write_pos + len - count) % len;
        let first = count.min(len - start);
        out[..first].copy_from_slice(&self.data[start..start + first]);
        out[first..count].copy_from_slice(&self.data[..count - first]);
        out[count..].fill(0.0);
    }

    /// Zeroes every sample and rewinds the cursor.
    pub fn clear(&mut self) {
        self.data.fill(0.0);
        self.write_pos = 0;
    }

    /// Reallocates for a new window size, discarding contents.
    pub fn resize(&mut self, window_size: usize) {
        self.window_size = window_size;
        self.data = vec![0.0; window_size * 2];
        self.write_pos = 0;
    }
}

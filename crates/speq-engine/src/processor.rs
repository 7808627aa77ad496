//! Real-time side of the engine.
//!
//! [`AudioProcessor`] owns the [`Equalizer`] and is moved into the audio
//! callback. Per block it drains pending [`EqCommand`]s, filters the block in
//! place, and copies the result into the shared analysis history. Both lock
//! acquisitions are `try_lock`; nothing here blocks or allocates.

use speq_core::Effect;
use speq_effects::Equalizer;
use tracing::{debug, info};

use crate::shared::{EngineShared, EqCommand};

/// Audio-thread processor.
///
/// A new processor is running. While stopped,
/// [`process_interleaved`](Self::process_interleaved) still applies pending
/// commands but leaves the buffer untouched and feeds nothing to the analyzer.
pub struct AudioProcessor {
    equalizer: Equalizer,
    shared: EngineShared,
    running: bool,
}

impl AudioProcessor {
    /// Creates a running processor wired to `shared`.
    ///
    /// The equalizer starts from the values currently mirrored in `shared`.
    pub fn new(shared: EngineShared) -> Self {
        let mut equalizer = Equalizer::new(shared.sample_rate());
        for band in 0..speq_effects::NUM_BANDS {
            if let Some(config) = shared.band(band) {
                equalizer.set_band(band, config);
            }
        }
        equalizer.set_bypass(shared.is_bypassed());
        // Mirror already reflects the queue; drop it so nothing is applied twice.
        shared.try_drain_commands(|_| {});
        shared.set_running(true);
        Self {
            equalizer,
            shared,
            running: true,
        }
    }

    /// The processor's equalizer.
    pub fn equalizer(&self) -> &Equalizer {
        &self.equalizer
    }

    /// Shared state handle.
    pub fn shared(&self) -> &EngineShared {
        &self.shared
    }

    /// Whether the transport is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.equalizer.sample_rate()
    }

    /// Changes the sample rate and re-derives every band's coefficients.
    ///
    /// The analyzer picks the new rate up on its next computation.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        info!(sample_rate, "processor sample rate changed");
        self.equalizer.set_sample_rate(sample_rate);
        self.shared.set_sample_rate(sample_rate);
    }

    /// Resumes processing after clearing filter history.
    pub fn start(&mut self) {
        debug!("transport start");
        self.equalizer.reset();
        self.running = true;
        self.shared.set_running(true);
    }

    /// Halts processing and clears filter history.
    pub fn stop(&mut self) {
        debug!("transport stop");
        self.equalizer.reset();
        self.running = false;
        self.shared.set_running(false);
    }

    /// Clears filter history at a playback discontinuity.
    pub fn seek(&mut self) {
        debug!("transport seek");
        self.equalizer.reset();
    }

    /// Processes one interleaved block in place.
    ///
    /// `frames` is capped at what `buffer` holds. Channels beyond the second
    /// pass through unfiltered.
    pub fn process_interleaved(&mut self, buffer: &mut [f32], frames: usize, channels: usize) {
        self.drain_commands();
        if !self.running || channels == 0 {
            return;
        }
        let frames = frames.min(buffer.len() / channels);
        self.equalizer.process_block(buffer, frames, channels);
        self.shared.try_ingest(buffer, frames, channels);
    }

    /// Host callback entry point: follows the delivered rate, then processes.
    ///
    /// A rate different from the current one re-derives the coefficients
    /// before the block is filtered. Non-finite or non-positive rates are
    /// ignored.
    pub fn process_callback(
        &mut self,
        buffer: &mut [f32],
        frames: usize,
        channels: usize,
        sample_rate: f64,
    ) {
        if sample_rate.is_finite() && sample_rate > 0.0 && sample_rate != self.sample_rate() {
            self.set_sample_rate(sample_rate);
        }
        self.process_interleaved(buffer, frames, channels);
    }

    fn drain_commands(&mut self) {
        let equalizer = &mut self.equalizer;
        self.shared.try_drain_commands(|cmd| match cmd {
            EqCommand::SetBand { band, config } => equalizer.set_band(band, config),
            EqCommand::SetBypass(bypass) => equalizer.set_bypass(bypass),
            EqCommand::Restore(state) => state.apply_to(equalizer),
        });
    }
}

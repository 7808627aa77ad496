//! Cross-thread state for the engine.
//!
//! [`EngineShared`] is the only thing the control surface, the audio thread
//! and the analysis thread have in common. Band values are mirrored in
//! atomics (`f64` bit-cast into `AtomicU64`) so a control surface reads back
//! what it wrote without waiting for the audio thread. Changes reach the
//! audio thread as [`EqCommand`]s through a `Mutex<VecDeque>` that the
//! [`AudioProcessor`](crate::AudioProcessor) drains with `try_lock`. The mono
//! analysis history lives behind its own mutex, and finished spectra are
//! published through an `ArcSwap` mailbox.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use speq_analysis::{SignalBuffer, SpectrumSnapshot};
use speq_effects::{
    BYPASS_PARAM_ID, BandState, DEFAULT_FREQUENCIES, DEFAULT_Q, EqBandConfig, EqState, NUM_BANDS,
    StateError, param_descriptor,
};
use tracing::warn;

/// Equalizer change queued for the audio thread.
///
/// Each command carries complete values, so the processor recomputes a
/// band's coefficients from one coherent set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EqCommand {
    /// Replace one band's settings.
    SetBand {
        /// Band index (0-4).
        band: usize,
        /// New, already clamped settings.
        config: EqBandConfig,
    },
    /// Toggle the global bypass.
    SetBypass(bool),
    /// Apply a decoded state record.
    Restore(EqState),
}

/// Atomic mirror of one band.
struct BandSlot {
    frequency: AtomicU64,
    gain_db: AtomicU64,
    q: AtomicU64,
    enabled: AtomicBool,
}

impl BandSlot {
    fn new(config: EqBandConfig) -> Self {
        Self {
            frequency: AtomicU64::new(config.frequency.to_bits()),
            gain_db: AtomicU64::new(config.gain_db.to_bits()),
            q: AtomicU64::new(config.q.to_bits()),
            enabled: AtomicBool::new(config.enabled),
        }
    }

    fn load(&self) -> EqBandConfig {
        EqBandConfig {
            frequency: f64::from_bits(self.frequency.load(Ordering::Acquire)),
            gain_db: f64::from_bits(self.gain_db.load(Ordering::Acquire)),
            q: f64::from_bits(self.q.load(Ordering::Acquire)),
            enabled: self.enabled.load(Ordering::Acquire),
        }
    }

    fn store(&self, config: &EqBandConfig) {
        self.frequency
            .store(config.frequency.to_bits(), Ordering::Release);
        self.gain_db.store(config.gain_db.to_bits(), Ordering::Release);
        self.q.store(config.q.to_bits(), Ordering::Release);
        self.enabled.store(config.enabled, Ordering::Release);
    }
}

/// Inner storage behind `Arc` so `EngineShared` can be cheaply cloned.
struct EngineSharedData {
    bands: [BandSlot; NUM_BANDS],
    bypass: AtomicBool,

    /// Pending changes. Writers hold the lock while updating the mirror so
    /// the queue order matches the mirrored values.
    commands: Mutex<VecDeque<EqCommand>>,

    /// Mono history written by the audio thread, read by the analysis thread.
    signal: Mutex<SignalBuffer>,

    /// Most recently published spectrum.
    spectrum: ArcSwap<SpectrumSnapshot>,

    /// Sample rate last set on the processor, as `f64` bits.
    sample_rate: AtomicU64,

    /// Transport state of the processor.
    running: AtomicBool,

    /// Blocks whose analysis copy was skipped because the signal lock was held.
    dropped_blocks: AtomicU64,
}

/// Shared state handle, cloneable into any thread.
///
/// # Thread Safety
///
/// - **Band values / bypass**: atomics, lock-free reads.
/// - **Commands**: `Mutex`. Control threads lock to push, audio `try_lock`s to drain.
/// - **Signal history**: `Mutex`. Audio `try_lock`s to write, analysis locks
///   only long enough to copy one window out.
/// - **Spectrum**: `ArcSwap`, wait-free reads of the latest snapshot.
#[derive(Clone)]
pub struct EngineShared {
    inner: Arc<EngineSharedData>,
}

impl EngineShared {
    /// Creates shared state for a flat equalizer and an analysis window of
    /// `window_size` samples.
    pub fn new(sample_rate: f64, window_size: usize) -> Self {
        Self {
            inner: Arc::new(EngineSharedData {
                bands: DEFAULT_FREQUENCIES.map(|f| BandSlot::new(EqBandConfig::flat(f))),
                bypass: AtomicBool::new(false),
                commands: Mutex::new(VecDeque::with_capacity(64)),
                signal: Mutex::new(SignalBuffer::new(window_size)),
                spectrum: ArcSwap::from_pointee(SpectrumSnapshot::default()),
                sample_rate: AtomicU64::new(sample_rate.to_bits()),
                running: AtomicBool::new(false),
                dropped_blocks: AtomicU64::new(0),
            }),
        }
    }

    // ── Band control (any thread) ───────────────────────────────────────────

    /// Current settings of `band`, `None` if out of range.
    pub fn band(&self, band: usize) -> Option<EqBandConfig> {
        self.inner.bands.get(band).map(BandSlot::load)
    }

    /// Replaces every setting of `band` at once. Values are clamped.
    pub fn set_band(&self, band: usize, config: EqBandConfig) {
        self.update_band(band, |c| *c = config);
    }

    /// Sets band gain in dB, clamped to ±12.
    pub fn set_band_gain(&self, band: usize, gain_db: f64) {
        self.update_band(band, |c| c.gain_db = gain_db);
    }

    /// Sets band center frequency in Hz, clamped to 20-20000.
    pub fn set_band_frequency(&self, band: usize, frequency: f64) {
        self.update_band(band, |c| c.frequency = frequency);
    }

    /// Sets band Q, clamped to 0.1-10.
    pub fn set_band_q(&self, band: usize, q: f64) {
        self.update_band(band, |c| c.q = q);
    }

    /// Enables or disables a band.
    pub fn set_band_enabled(&self, band: usize, enabled: bool) {
        self.update_band(band, |c| c.enabled = enabled);
    }

    /// Band gain in dB, 0 for an out-of-range band.
    pub fn band_gain(&self, band: usize) -> f64 {
        self.band(band).map_or(0.0, |b| b.gain_db)
    }

    /// Band center frequency in Hz, 1000 for an out-of-range band.
    pub fn band_frequency(&self, band: usize) -> f64 {
        self.band(band).map_or(1000.0, |b| b.frequency)
    }

    /// Band Q, the default Q for an out-of-range band.
    pub fn band_q(&self, band: usize) -> f64 {
        self.band(band).map_or(DEFAULT_Q, |b| b.q)
    }

    /// Whether `band` is enabled, `false` if out of range.
    pub fn is_band_enabled(&self, band: usize) -> bool {
        self.band(band).is_some_and(|b| b.enabled)
    }

    /// Sets the global bypass.
    pub fn set_bypass(&self, bypass: bool) {
        let mut queue = self.inner.commands.lock();
        self.inner.bypass.store(bypass, Ordering::Release);
        queue.push_back(EqCommand::SetBypass(bypass));
    }

    /// Whether the equalizer is bypassed.
    pub fn is_bypassed(&self) -> bool {
        self.inner.bypass.load(Ordering::Acquire)
    }

    fn update_band(&self, band: usize, edit: impl FnOnce(&mut EqBandConfig)) {
        let Some(slot) = self.inner.bands.get(band) else {
            return;
        };
        let mut queue = self.inner.commands.lock();
        let mut config = slot.load();
        edit(&mut config);
        let config = config.clamped();
        slot.store(&config);
        queue.push_back(EqCommand::SetBand { band, config });
    }

    // ── Host parameters ─────────────────────────────────────────────────────

    /// Plain value of host parameter `id`; unknown ids read 0.
    pub fn param(&self, id: usize) -> f64 {
        if id == BYPASS_PARAM_ID {
            return if self.is_bypassed() { 1.0 } else { 0.0 };
        }
        if id > BYPASS_PARAM_ID {
            return 0.0;
        }
        let band = id / 3;
        match id % 3 {
            0 => self.band_gain(band),
            1 => self.band_frequency(band),
            _ => self.band_q(band),
        }
    }

    /// Sets host parameter `id` from a plain value; unknown ids are ignored.
    pub fn set_param(&self, id: usize, value: f64) {
        if id == BYPASS_PARAM_ID {
            self.set_bypass(value > 0.5);
            return;
        }
        if id > BYPASS_PARAM_ID {
            return;
        }
        let band = id / 3;
        match id % 3 {
            0 => self.set_band_gain(band, value),
            1 => self.set_band_frequency(band, value),
            _ => self.set_band_q(band, value),
        }
    }

    /// Normalized (0-1) value of host parameter `id`; unknown ids read 0.
    pub fn normalized(&self, id: usize) -> f64 {
        param_descriptor(id).map_or(0.0, |d| d.normalize(self.param(id)))
    }

    /// Sets host parameter `id` from a normalized (0-1) host value.
    pub fn set_normalized(&self, id: usize, normalized: f64) {
        if let Some(desc) = param_descriptor(id) {
            self.set_param(id, desc.denormalize(normalized));
        }
    }

    // ── Persisted state ─────────────────────────────────────────────────────

    /// Encodes the current band values and bypass.
    pub fn save_state(&self) -> Vec<u8> {
        let _queue = self.inner.commands.lock();
        let state = EqState {
            bands: core::array::from_fn(|i| {
                let b = self.inner.bands[i].load();
                BandState {
                    gain_db: b.gain_db,
                    frequency: b.frequency,
                    q: b.q,
                }
            }),
            bypass: self.is_bypassed(),
        };
        state.to_bytes()
    }

    /// Decodes `bytes` and queues the whole record for the audio thread.
    ///
    /// Nothing is mirrored or queued unless the record decodes completely.
    /// Per-band `enabled` flags are kept.
    pub fn load_state(&self, bytes: &[u8]) -> Result<(), StateError> {
        let state = EqState::from_bytes(bytes).inspect_err(|e| {
            warn!(error = %e, len = bytes.len(), "rejected state restore");
        })?;

        let mut queue = self.inner.commands.lock();
        for (slot, saved) in self.inner.bands.iter().zip(&state.bands) {
            let config = EqBandConfig {
                frequency: saved.frequency,
                gain_db: saved.gain_db,
                q: saved.q,
                enabled: slot.enabled.load(Ordering::Acquire),
            }
            .clamped();
            slot.store(&config);
        }
        self.inner.bypass.store(state.bypass, Ordering::Release);
        queue.push_back(EqCommand::Restore(state));
        Ok(())
    }

    // ── Command queue ───────────────────────────────────────────────────────

    /// Number of commands not yet picked up by the audio thread.
    pub fn pending_commands(&self) -> usize {
        self.inner.commands.lock().len()
    }

    /// Hands every pending command to `apply` (audio thread, non-blocking).
    ///
    /// Returns `false` without applying anything if the lock is contended.
    /// The queue keeps its capacity.
    pub fn try_drain_commands(&self, mut apply: impl FnMut(EqCommand)) -> bool {
        let Some(mut queue) = self.inner.commands.try_lock() else {
            return false;
        };
        for cmd in queue.drain(..) {
            apply(cmd);
        }
        true
    }

    // ── Signal history ──────────────────────────────────────────────────────

    /// Appends interleaved frames to the analysis history (audio thread,
    /// non-blocking).
    ///
    /// A contended lock drops this block's copy and counts it; returns
    /// whether the block was stored.
    pub fn try_ingest(&self, samples: &[f32], frames: usize, channels: usize) -> bool {
        match self.inner.signal.try_lock() {
            Some(mut signal) => {
                signal.ingest(samples, frames, channels);
                true
            }
            None => {
                self.inner.dropped_blocks.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Copies the latest `out.len()` history samples, oldest first.
    pub fn copy_window(&self, out: &mut [f32]) {
        self.inner.signal.lock().copy_latest(out);
    }

    /// Window size the history is sized for.
    pub fn window_size(&self) -> usize {
        self.inner.signal.lock().window_size()
    }

    /// Blocks skipped by [`try_ingest`](Self::try_ingest) so far.
    pub fn dropped_blocks(&self) -> u64 {
        self.inner.dropped_blocks.load(Ordering::Relaxed)
    }

    pub(crate) fn resize_signal(&self, window_size: usize) {
        self.inner.signal.lock().resize(window_size);
    }

    pub(crate) fn clear_signal(&self) {
        self.inner.signal.lock().clear();
    }

    // ── Spectrum mailbox ────────────────────────────────────────────────────

    /// Replaces the published spectrum.
    pub fn publish_spectrum(&self, snapshot: SpectrumSnapshot) {
        self.inner.spectrum.store(Arc::new(snapshot));
    }

    /// Latest published spectrum.
    pub fn latest_spectrum(&self) -> Arc<SpectrumSnapshot> {
        self.inner.spectrum.load_full()
    }

    // ── Transport / sample rate ─────────────────────────────────────────────

    /// Whether the processor is running.
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::Acquire)
    }

    pub(crate) fn set_running(&self, running: bool) {
        self.inner.running.store(running, Ordering::Release);
    }

    /// Sample rate the processor was last configured with.
    pub fn sample_rate(&self) -> f64 {
        f64::from_bits(self.inner.sample_rate.load(Ordering::Acquire))
    }

    pub(crate) fn set_sample_rate(&self, sample_rate: f64) {
        self.inner
            .sample_rate
            .store(sample_rate.to_bits(), Ordering::Release);
    }
}

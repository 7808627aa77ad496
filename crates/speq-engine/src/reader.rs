//! Consumer side of the engine.
//!
//! [`SpectrumReader`] runs on a UI or analysis tick. It holds the signal
//! lock only while copying one window out, then runs the FFT and smoothing
//! on its private copy and publishes the result to the shared mailbox.

use std::sync::Arc;

use speq_analysis::{AnalyzerConfig, SpectrumAnalyzer, SpectrumSnapshot};

use crate::error::EngineError;
use crate::shared::EngineShared;

/// Pulls windows from the shared history and turns them into spectra.
pub struct SpectrumReader {
    analyzer: SpectrumAnalyzer,
    shared: EngineShared,
    window: Vec<f32>,
}

impl SpectrumReader {
    /// Creates a reader and publishes an all-zero spectrum.
    ///
    /// The shared history is resized to the configured FFT size.
    pub fn new(shared: EngineShared, config: AnalyzerConfig) -> Result<Self, EngineError> {
        let analyzer = SpectrumAnalyzer::new(shared.sample_rate(), config)?;
        let fft_size = analyzer.config().fft_size;
        if shared.window_size() != fft_size {
            shared.resize_signal(fft_size);
        }
        shared.publish_spectrum(analyzer.last_snapshot().clone());
        Ok(Self {
            analyzer,
            shared,
            window: vec![0.0; fft_size],
        })
    }

    /// The underlying analyzer.
    pub fn analyzer(&self) -> &SpectrumAnalyzer {
        &self.analyzer
    }

    /// Analyzes the latest window and publishes the result.
    ///
    /// Follows sample-rate changes made on the processor.
    pub fn compute(&mut self) -> SpectrumSnapshot {
        let sample_rate = self.shared.sample_rate();
        if sample_rate != self.analyzer.sample_rate() {
            self.analyzer.set_sample_rate(sample_rate);
        }
        self.shared.copy_window(&mut self.window);
        let snapshot = self.analyzer.analyze_window(&self.window);
        self.shared.publish_spectrum(snapshot.clone());
        snapshot
    }

    /// Latest published spectrum, without computing.
    pub fn latest(&self) -> Arc<SpectrumSnapshot> {
        self.shared.latest_spectrum()
    }

    /// Replaces the analyzer configuration and resizes the shared history.
    ///
    /// Only valid while the processor is stopped.
    ///
    /// # Errors
    ///
    /// [`EngineError::ProcessorRunning`] if the transport is running,
    /// [`EngineError::Analysis`] for an invalid configuration. Nothing changes
    /// on error.
    pub fn reconfigure(&mut self, config: AnalyzerConfig) -> Result<(), EngineError> {
        if self.shared.is_running() {
            return Err(EngineError::ProcessorRunning);
        }
        let resized = config.fft_size != self.analyzer.config().fft_size;
        self.analyzer.set_config(config)?;
        if resized {
            let fft_size = self.analyzer.config().fft_size;
            self.window = vec![0.0; fft_size];
            self.shared.resize_signal(fft_size);
        }
        self.shared
            .publish_spectrum(self.analyzer.last_snapshot().clone());
        Ok(())
    }

    /// Zeroes the shared history, smoothing state and published spectrum.
    pub fn clear(&mut self) {
        self.analyzer.clear();
        self.shared.clear_signal();
        self.shared
            .publish_spectrum(self.analyzer.last_snapshot().clone());
    }
}

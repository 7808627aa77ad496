//! Speq Engine - thread handoff for the equalizer and spectrum analyzer
//!
//! Three parties share one [`EngineShared`] handle:
//!
//! ```text
//! Control surface            Audio callback             UI / analysis tick
//! ───────────────            ──────────────             ──────────────────
//! EngineShared setters  ──►  AudioProcessor        ──►  SpectrumReader
//! (atomics + commands)       drains commands            copies one window
//!                            filters in place           FFT + smoothing
//!                            feeds signal history       publishes snapshot
//! ```
//!
//! The audio side only ever uses `try_lock`. A contended command queue delays
//! parameter changes by one block; a contended signal lock drops that
//! block's analysis copy. Both self-correct on the next block.
//!
//! ## Example
//!
//! ```rust
//! use speq_analysis::AnalyzerConfig;
//! use speq_engine::Engine;
//!
//! let (shared, mut processor, mut reader) =
//!     Engine::new(48000.0, AnalyzerConfig::default()).unwrap().into_parts();
//!
//! shared.set_band_gain(2, 6.0);
//!
//! let mut block = vec![0.1f32; 512 * 2];
//! processor.process_interleaved(&mut block, 512, 2);
//!
//! let spectrum = reader.compute();
//! assert_eq!(spectrum.magnitudes.len(), 128);
//! ```

pub mod error;
pub mod processor;
pub mod reader;
pub mod shared;

pub use error::EngineError;
pub use processor::AudioProcessor;
pub use reader::SpectrumReader;
pub use shared::{EngineShared, EqCommand};

use speq_analysis::AnalyzerConfig;

/// A processor, reader and control handle wired to the same shared state.
pub struct Engine {
    shared: EngineShared,
    processor: AudioProcessor,
    reader: SpectrumReader,
}

impl Engine {
    /// Builds a flat, running engine.
    ///
    /// # Errors
    ///
    /// [`EngineError::Analysis`] if `config` is invalid.
    pub fn new(sample_rate: f64, config: AnalyzerConfig) -> Result<Self, EngineError> {
        let shared = EngineShared::new(sample_rate, config.fft_size);
        let reader = SpectrumReader::new(shared.clone(), config)?;
        let processor = AudioProcessor::new(shared.clone());
        tracing::debug!(sample_rate, "engine created");
        Ok(Self {
            shared,
            processor,
            reader,
        })
    }

    /// Control handle.
    pub fn shared(&self) -> &EngineShared {
        &self.shared
    }

    /// Audio-thread processor.
    pub fn processor_mut(&mut self) -> &mut AudioProcessor {
        &mut self.processor
    }

    /// Spectrum reader.
    pub fn reader_mut(&mut self) -> &mut SpectrumReader {
        &mut self.reader
    }

    /// Splits the engine so each part can move to its own thread.
    pub fn into_parts(self) -> (EngineShared, AudioProcessor, SpectrumReader) {
        (self.shared, self.processor, self.reader)
    }
}

//! Error types for engine operations.

use speq_analysis::AnalysisError;
use thiserror::Error;

/// Errors from building or reconfiguring an engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The analyzer configuration was rejected.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Buffers can only be resized while the processor is stopped.
    #[error("cannot reconfigure the analyzer while the processor is running")]
    ProcessorRunning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = EngineError::from(AnalysisError::not_power_of_two(100));
        assert_eq!(
            err.to_string(),
            "invalid configuration: length 100 is not a power of two"
        );
        assert!(
            EngineError::ProcessorRunning
                .to_string()
                .contains("while the processor is running")
        );
    }
}

//! Error types for analysis operations.

use thiserror::Error;

/// Errors that can occur while configuring or running analysis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// A size or setting the transform or analyzer cannot work with.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Description of what is wrong.
        reason: String,
    },
}

impl AnalysisError {
    /// Create an invalid configuration error.
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        AnalysisError::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Create the error for a length that is not a power of two.
    pub fn not_power_of_two(len: usize) -> Self {
        Self::invalid_configuration(format!("length {len} is not a power of two"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_power_of_two_display() {
        let err = AnalysisError::not_power_of_two(6);
        assert_eq!(
            err.to_string(),
            "invalid configuration: length 6 is not a power of two"
        );
    }

    #[test]
    fn factory_produces_correct_variant() {
        let err = AnalysisError::invalid_configuration("zero bands");
        assert!(matches!(err, AnalysisError::InvalidConfiguration { ref reason } if reason == "zero bands"));
    }
}

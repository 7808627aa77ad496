//! Error types for configuration operations.

use std::path::PathBuf;

use speq_analysis::AnalysisError;
use thiserror::Error;

/// Errors that can occur while loading, saving or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// The `[analyzer]` section does not describe a usable analyzer.
    #[error("invalid analyzer settings: {0}")]
    Analysis(#[from] AnalysisError),

    /// More band entries than the equalizer has bands.
    #[error("{count} equalizer bands configured, at most {max} supported")]
    TooManyBands {
        /// Entries found.
        count: usize,
        /// Bands available.
        max: usize,
    },

    /// A band entry holds a value no setter can clamp.
    #[error("invalid value for band {band}: {reason}")]
    InvalidBand {
        /// Band index.
        band: usize,
        /// Description of what is wrong.
        reason: String,
    },

    /// Sample rate of zero.
    #[error("sample rate must be positive")]
    InvalidSampleRate,
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid band error.
    pub fn invalid_band(band: usize, reason: impl Into<String>) -> Self {
        ConfigError::InvalidBand {
            band,
            reason: reason.into(),
        }
    }
}

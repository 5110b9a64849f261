//! Error taxonomy for the band power pipeline
//!
//! Only terminal conditions live here. Recoverable conditions (filter
//! fallback, no usable segments) are reported through the run report instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BandPowerError {
    #[error("Input file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Error reading CSV data (column {column}): {reason}. Ensure column exists and contains numeric data.")]
    InvalidData { column: usize, reason: String },

    #[error("Failed to load or process file {}: {source}", path.display())]
    LoadError {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid analysis parameters: {0}")]
    InvalidParameters(String),

    #[error("Error during spectrogram calculation: {0}")]
    SpectralComputation(String),

    #[error("Failed to export results to {}: {reason}", path.display())]
    Export { path: PathBuf, reason: String },
}

impl BandPowerError {
    /// True for failures caused by the caller's file or parameters rather
    /// than by an internal computation.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            BandPowerError::FileNotFound { .. }
                | BandPowerError::InvalidData { .. }
                | BandPowerError::InvalidParameters(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, BandPowerError>;

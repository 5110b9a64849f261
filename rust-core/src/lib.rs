//! EEG Band Power - per-epoch spectral band power for single-channel EEG
//!
//! Loads one channel from a delimited text file, band-limits it with a
//! zero-phase Butterworth filter, estimates a Hann-windowed spectrogram and
//! integrates delta, theta, alpha, beta and total power for every segment.
//! Python bindings are available behind the `python` feature.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![allow(non_local_definitions)]

pub mod bands;
pub mod data;
pub mod error;
pub mod filters;
pub mod pipeline;
pub mod spectrum;
pub mod table;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use bands::{BandPowers, FrequencyBand};
pub use error::{BandPowerError, Result};
pub use filters::FilterStatus;
pub use pipeline::{
    calculate_band_powers, AnalysisParameters, BandPowerPipeline, BandPowerReport,
    ProgressReporter, RunStatus,
};
pub use table::{EpochResult, ResultTable};

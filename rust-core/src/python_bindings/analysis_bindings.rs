//! Python bindings for the band power pipeline

use super::table_bindings::PyBandPowerTable;
use crate::data::SignalLoader;
use crate::pipeline::{AnalysisParameters, BandPowerPipeline};
use numpy::PyReadonlyArray1;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::path::PathBuf;

fn delimiter_byte(delimiter: &str) -> PyResult<u8> {
    match delimiter.as_bytes() {
        [byte] => Ok(*byte),
        _ => Err(PyValueError::new_err(format!(
            "delimiter must be a single ASCII character, got {:?}",
            delimiter
        ))),
    }
}

/// Forward progress to a Python callable; a raising callback is logged and ignored
fn forward_progress(py: Python<'_>, callback: &PyObject, percent: u8) {
    if let Err(err) = callback.call1(py, (percent,)) {
        log::warn!("Progress callback raised: {}", err);
    }
}

/// Compute per-epoch band powers for one column of a delimited file
///
/// Args:
///     file_path: Path to the input file (header row required)
///     lower_bound: Analysis range start in Hz
///     upper_bound: Analysis range end in Hz
///     epoch_length: Segment duration in seconds
///     sample_frequency: Sample rate in Hz
///     channel_index: Zero-based column to analyze
///     progress_callback: Optional callable receiving integer percentages
///     delimiter: Field delimiter (single character)
///
/// Returns:
///     BandPowerTable, empty when no segment could be analyzed
#[pyfunction]
#[pyo3(signature = (
    file_path,
    lower_bound=1.0,
    upper_bound=30.0,
    epoch_length=2.0,
    sample_frequency=128.0,
    channel_index=0,
    progress_callback=None,
    delimiter=","
))]
#[allow(clippy::too_many_arguments)]
pub fn calculate_band_powers(
    py: Python<'_>,
    file_path: PathBuf,
    lower_bound: f64,
    upper_bound: f64,
    epoch_length: f64,
    sample_frequency: f64,
    channel_index: usize,
    progress_callback: Option<PyObject>,
    delimiter: &str,
) -> PyResult<PyBandPowerTable> {
    let params = AnalysisParameters {
        lower_bound,
        upper_bound,
        epoch_length,
        sample_frequency,
        channel_index,
    };
    let pipeline = BandPowerPipeline::new(params)
        .with_loader(SignalLoader::new().delimiter(delimiter_byte(delimiter)?));

    let report = match progress_callback {
        Some(callback) => {
            let mut sink = |percent: u8| forward_progress(py, &callback, percent);
            pipeline.run(&file_path, Some(&mut sink))?
        }
        None => pipeline.run(&file_path, None)?,
    };

    Ok(report.into())
}

/// Compute per-epoch band powers for an in-memory signal
///
/// Args:
///     signal: 1-D numpy array of samples
///     lower_bound: Analysis range start in Hz
///     upper_bound: Analysis range end in Hz
///     epoch_length: Segment duration in seconds
///     sample_frequency: Sample rate in Hz
///     progress_callback: Optional callable receiving integer percentages
///
/// Returns:
///     BandPowerTable, empty when no segment could be analyzed
#[pyfunction]
#[pyo3(signature = (
    signal,
    lower_bound=1.0,
    upper_bound=30.0,
    epoch_length=2.0,
    sample_frequency=128.0,
    progress_callback=None
))]
pub fn analyze_signal(
    py: Python<'_>,
    signal: PyReadonlyArray1<f64>,
    lower_bound: f64,
    upper_bound: f64,
    epoch_length: f64,
    sample_frequency: f64,
    progress_callback: Option<PyObject>,
) -> PyResult<PyBandPowerTable> {
    let samples = signal.as_array().to_vec();
    let pipeline = BandPowerPipeline::new(AnalysisParameters {
        lower_bound,
        upper_bound,
        epoch_length,
        sample_frequency,
        channel_index: 0,
    });

    let report = match progress_callback {
        Some(callback) => {
            let mut sink = |percent: u8| forward_progress(py, &callback, percent);
            pipeline.analyze(samples, Some(&mut sink))?
        }
        None => pipeline.analyze(samples, None)?,
    };

    Ok(report.into())
}

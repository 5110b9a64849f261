//! PyO3 bindings for Python integration

use crate::error::BandPowerError;
use pyo3::exceptions::{PyFileNotFoundError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

mod analysis_bindings;
mod table_bindings;

impl From<BandPowerError> for PyErr {
    fn from(err: BandPowerError) -> PyErr {
        let message = err.to_string();
        match err {
            BandPowerError::FileNotFound { .. } => PyFileNotFoundError::new_err(message),
            BandPowerError::InvalidData { .. } | BandPowerError::InvalidParameters(_) => {
                PyValueError::new_err(message)
            }
            _ => PyRuntimeError::new_err(message),
        }
    }
}

/// Python module definition
#[pymodule]
fn eeg_bandpower(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(analysis_bindings::calculate_band_powers, m)?)?;
    m.add_function(wrap_pyfunction!(analysis_bindings::analyze_signal, m)?)?;
    m.add_class::<table_bindings::PyBandPowerTable>()?;

    m.add("COLUMNS", crate::table::COLUMNS.to_vec())?;

    Ok(())
}

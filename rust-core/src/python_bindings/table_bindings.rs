//! Python bindings for the result table

use crate::pipeline::{BandPowerReport, RunStatus};
use crate::table::{ResultTable, COLUMNS};
use numpy::PyArray1;
use pyo3::exceptions::PyKeyError;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::path::PathBuf;

/// Band power table exposed to Python
#[pyclass(name = "BandPowerTable")]
pub struct PyBandPowerTable {
    table: ResultTable,
    status: &'static str,
    warnings: Vec<String>,
}

impl From<BandPowerReport> for PyBandPowerTable {
    fn from(report: BandPowerReport) -> Self {
        let status = match report.status {
            RunStatus::Completed => "completed",
            RunStatus::InsufficientData { .. } => "insufficient_data",
            RunStatus::EmptySpectrum => "empty_spectrum",
        };
        let warnings = report.warnings();

        Self {
            table: report.table,
            status,
            warnings,
        }
    }
}

#[pymethods]
impl PyBandPowerTable {
    fn __len__(&self) -> usize {
        self.table.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "BandPowerTable(rows={}, status='{}')",
            self.table.len(),
            self.status
        )
    }

    /// True when no segment could be analyzed
    fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Column names in output order
    fn columns(&self) -> Vec<&'static str> {
        COLUMNS.to_vec()
    }

    /// Run outcome: "completed", "insufficient_data" or "empty_spectrum"
    #[getter]
    fn status(&self) -> &'static str {
        self.status
    }

    /// Recoverable conditions met during the run
    #[getter]
    fn warnings(&self) -> Vec<String> {
        self.warnings.clone()
    }

    /// Segment center times in whole seconds
    fn times<'py>(&self, py: Python<'py>) -> &'py PyArray1<i64> {
        PyArray1::from_vec(py, self.table.times())
    }

    /// One column as a float numpy array
    ///
    /// Args:
    ///     name: Column name, e.g. "Alpha" or "Total Power"
    fn column<'py>(&self, py: Python<'py>, name: &str) -> PyResult<&'py PyArray1<f64>> {
        self.table
            .column(name)
            .map(|values| PyArray1::from_vec(py, values))
            .ok_or_else(|| PyKeyError::new_err(format!("unknown column '{}'", name)))
    }

    /// All columns as a dict of numpy arrays, "Time" as int64
    fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<&'py PyDict> {
        let dict = PyDict::new(py);
        dict.set_item("Time", PyArray1::from_vec(py, self.table.times()).into_py(py))?;
        for name in &COLUMNS[1..] {
            let values = self.table.column(name).unwrap_or_default();
            dict.set_item(*name, PyArray1::from_vec(py, values).into_py(py))?;
        }
        Ok(dict)
    }

    /// Write the table as CSV (4 decimal places, Time as integer)
    ///
    /// Args:
    ///     path: Output file path
    fn export_csv(&self, path: PathBuf) -> PyResult<()> {
        self.table.save_csv(&path)?;
        Ok(())
    }
}

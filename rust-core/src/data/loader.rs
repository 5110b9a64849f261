//! Single-channel signal loading from delimited text
//!
//! The file must start with a header row; the channel is selected by its
//! zero-based column position.

use crate::error::{BandPowerError, Result};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reader configuration for delimited signal files
#[derive(Debug, Clone)]
pub struct SignalLoader {
    /// Field delimiter (default: `,`)
    delimiter: u8,
}

impl Default for SignalLoader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl SignalLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different single-byte field delimiter
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load one column of `path` as a finite, non-empty sample sequence
    ///
    /// # Errors
    /// * `FileNotFound` if the file cannot be opened
    /// * `InvalidData` if the column is missing, non-numeric or empty
    /// * `LoadError` for any other read failure
    pub fn load_channel(&self, path: &Path, channel_index: usize) -> Result<Vec<f64>> {
        let file = File::open(path).map_err(|_| BandPowerError::FileNotFound {
            path: path.to_path_buf(),
        })?;

        self.read_channel(file, channel_index)
            .map_err(|err| match err {
                LoadFailure::Csv(source) => BandPowerError::LoadError {
                    path: path.to_path_buf(),
                    source,
                },
                LoadFailure::Data(reason) => BandPowerError::InvalidData {
                    column: channel_index,
                    reason,
                },
            })
    }

    fn read_channel<R: Read>(
        &self,
        input: R,
        channel_index: usize,
    ) -> std::result::Result<Vec<f64>, LoadFailure> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(input);

        let column_count = reader.headers().map_err(LoadFailure::Csv)?.len();
        if channel_index >= column_count {
            return Err(LoadFailure::Data(format!(
                "column index out of range, file has {} column(s)",
                column_count
            )));
        }

        let mut samples = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(LoadFailure::Csv)?;
            let field = record.get(channel_index).ok_or_else(|| {
                LoadFailure::Data(format!("data row {} has no value for this column", row + 1))
            })?;

            let value: f64 = field.parse().map_err(|_| {
                LoadFailure::Data(format!(
                    "non-numeric value {:?} in data row {}",
                    field,
                    row + 1
                ))
            })?;
            if !value.is_finite() {
                return Err(LoadFailure::Data(format!(
                    "non-finite value {:?} in data row {}",
                    field,
                    row + 1
                )));
            }

            samples.push(value);
        }

        if samples.is_empty() {
            return Err(LoadFailure::Data(format!(
                "Selected channel ({}) contains no data",
                channel_index
            )));
        }

        Ok(samples)
    }
}

enum LoadFailure {
    Csv(csv::Error),
    Data(String),
}

/// Load a comma-delimited channel with default settings
pub fn load_channel(path: &Path, channel_index: usize) -> Result<Vec<f64>> {
    SignalLoader::new().load_channel(path, channel_index)
}

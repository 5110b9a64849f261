//! Result table export as delimited text
//!
//! Header row in fixed column order, Time as an integer, every other value
//! with four decimals, no index column.

use crate::error::{BandPowerError, Result};
use crate::table::{ResultTable, COLUMNS};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write `table` as CSV into any writer
pub fn write_csv<W: Write>(table: &ResultTable, writer: W) -> std::result::Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .from_writer(writer);

    csv_writer.write_record(COLUMNS)?;

    for row in table {
        csv_writer.write_record(&[
            row.time.to_string(),
            format!("{:.4}", row.delta),
            format!("{:.4}", row.theta),
            format!("{:.4}", row.alpha),
            format!("{:.4}", row.beta),
            format!("{:.4}", row.total_power),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write `table` to a file at `path`, replacing any existing file
pub fn save_csv(table: &ResultTable, path: &Path) -> Result<()> {
    let export_error = |reason: String| BandPowerError::Export {
        path: path.to_path_buf(),
        reason,
    };

    let file = std::fs::File::create(path).map_err(|e| export_error(e.to_string()))?;
    write_csv(table, std::io::BufWriter::new(file)).map_err(|e| export_error(e.to_string()))?;

    log::info!("Exported {} epoch(s) to {}", table.len(), path.display());
    Ok(())
}

/// `<dir>/<stem>_bandpowers.csv` next to the input file
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "signal".to_string());
    input.with_file_name(format!("{}_bandpowers.csv", stem))
}

impl ResultTable {
    /// Export to a CSV file (see [`save_csv`])
    pub fn save_csv(&self, path: &Path) -> Result<()> {
        save_csv(self, path)
    }
}

//! Per-epoch result rows and the ordered result table

use crate::bands::{BandPowers, FrequencyBand};
use serde::Serialize;

/// Column names in output order
pub const COLUMNS: [&str; 6] = ["Time", "Delta", "Theta", "Alpha", "Beta", "Total Power"];

/// Band powers for one analysis segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpochResult {
    /// Segment center time in whole seconds
    #[serde(rename = "Time")]
    pub time: i64,
    #[serde(rename = "Delta")]
    pub delta: f64,
    #[serde(rename = "Theta")]
    pub theta: f64,
    #[serde(rename = "Alpha")]
    pub alpha: f64,
    #[serde(rename = "Beta")]
    pub beta: f64,
    #[serde(rename = "Total Power")]
    pub total_power: f64,
}

impl EpochResult {
    /// Build a row from a segment center time (seconds) and its band powers
    pub fn new(center_time: f64, powers: &BandPowers) -> Self {
        Self {
            time: epoch_time_seconds(center_time),
            delta: powers.band(FrequencyBand::Delta),
            theta: powers.band(FrequencyBand::Theta),
            alpha: powers.band(FrequencyBand::Alpha),
            beta: powers.band(FrequencyBand::Beta),
            total_power: powers.total,
        }
    }

    /// Power of a single fixed band
    pub fn band(&self, band: FrequencyBand) -> f64 {
        match band {
            FrequencyBand::Delta => self.delta,
            FrequencyBand::Theta => self.theta,
            FrequencyBand::Alpha => self.alpha,
            FrequencyBand::Beta => self.beta,
        }
    }

    /// Numeric values in [`COLUMNS`] order, time converted to f64
    pub fn values(&self) -> [f64; 6] {
        [
            self.time as f64,
            self.delta,
            self.theta,
            self.alpha,
            self.beta,
            self.total_power,
        ]
    }
}

/// Round a center time half-to-even and store it as whole seconds
fn epoch_time_seconds(center_time: f64) -> i64 {
    let rounded = center_time.round_ties_even();
    if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
        rounded as i64
    } else {
        log::warn!("Could not cast time {} to integer, saturating", center_time);
        // `as` saturates at the bounds and maps NaN to 0
        rounded as i64
    }
}

/// Ordered table of epoch results; empty means "no usable segments"
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultTable {
    rows: Vec<EpochResult>,
}

impl ResultTable {
    /// Empty table
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builder sized for `segments` rows
    pub fn builder(segments: usize) -> TableBuilder {
        TableBuilder {
            rows: Vec::with_capacity(segments),
        }
    }

    pub fn rows(&self) -> &[EpochResult] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EpochResult> {
        self.rows.iter()
    }

    /// Time column
    pub fn times(&self) -> Vec<i64> {
        self.rows.iter().map(|r| r.time).collect()
    }

    /// A numeric column by name, `None` for unknown names
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = COLUMNS.iter().position(|&c| c == name)?;
        Some(self.rows.iter().map(|r| r.values()[idx]).collect())
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a EpochResult;
    type IntoIter = std::slice::Iter<'a, EpochResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Collects rows in segment order
pub struct TableBuilder {
    rows: Vec<EpochResult>,
}

impl TableBuilder {
    pub fn push(&mut self, center_time: f64, powers: &BandPowers) {
        self.rows.push(EpochResult::new(center_time, powers));
    }

    pub fn finish(self) -> ResultTable {
        ResultTable { rows: self.rows }
    }
}

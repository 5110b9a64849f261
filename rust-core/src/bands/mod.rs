//! Fixed EEG frequency bands and band power integration

pub mod integrator;

pub use integrator::{BandIntegrator, BandPowers};

use std::fmt;

/// Standard EEG frequency bands, each a half-open interval [low, high) in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrequencyBand {
    Delta,
    Theta,
    Alpha,
    Beta,
}

impl FrequencyBand {
    /// All bands in output column order
    pub const ALL: [FrequencyBand; 4] = [
        FrequencyBand::Delta,
        FrequencyBand::Theta,
        FrequencyBand::Alpha,
        FrequencyBand::Beta,
    ];

    /// Band edges in Hz as (low, high)
    pub const fn range(&self) -> (f64, f64) {
        match self {
            FrequencyBand::Delta => (1.0, 4.0),
            FrequencyBand::Theta => (4.0, 8.0),
            FrequencyBand::Alpha => (8.0, 13.0),
            FrequencyBand::Beta => (13.0, 30.0),
        }
    }

    /// Column name
    pub const fn name(&self) -> &'static str {
        match self {
            FrequencyBand::Delta => "Delta",
            FrequencyBand::Theta => "Theta",
            FrequencyBand::Alpha => "Alpha",
            FrequencyBand::Beta => "Beta",
        }
    }

    /// Position in [`FrequencyBand::ALL`]
    pub const fn index(&self) -> usize {
        match self {
            FrequencyBand::Delta => 0,
            FrequencyBand::Theta => 1,
            FrequencyBand::Alpha => 2,
            FrequencyBand::Beta => 3,
        }
    }

    /// True if `freq` lies in [low, high)
    pub fn contains(&self, freq: f64) -> bool {
        let (low, high) = self.range();
        freq >= low && freq < high
    }
}

impl fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

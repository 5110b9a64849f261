//! Band-limiting stage applied before spectral estimation
//!
//! A zero-phase Butterworth band-pass from 0.5 Hz to a few Hz above the
//! analysis range. Every failure here is recoverable: the raw signal passes
//! through and the reason is recorded.

use super::butterworth::butter_bandpass;
use super::sos::sosfiltfilt;
use std::fmt;

/// Fixed lower cutoff, just below the lowest band edge
pub const LOW_CUTOFF_HZ: f64 = 0.5;

/// Headroom above the analysis range for the upper cutoff
pub const UPPER_MARGIN_HZ: f64 = 5.0;

/// Butterworth prototype order
pub const FILTER_ORDER: usize = 5;

/// What happened to the signal in the band-limiting stage
#[derive(Debug, Clone, PartialEq)]
pub enum FilterStatus {
    /// Band-pass applied with these cutoffs
    Applied { low_hz: f64, high_hz: f64 },

    /// Cutoff range was degenerate, signal passed through unchanged
    Skipped { reason: String },

    /// Design or application failed, signal passed through unchanged
    Failed { reason: String },
}

impl FilterStatus {
    pub fn is_applied(&self) -> bool {
        matches!(self, FilterStatus::Applied { .. })
    }
}

impl fmt::Display for FilterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterStatus::Applied { low_hz, high_hz } => {
                write!(f, "band-pass {:.2}-{:.2} Hz applied", low_hz, high_hz)
            }
            FilterStatus::Skipped { reason } => write!(f, "filter skipped: {}", reason),
            FilterStatus::Failed { reason } => write!(f, "filter failed: {}", reason),
        }
    }
}

/// Signal after the band-limiting stage
#[derive(Debug, Clone)]
pub struct FilteredSignal {
    pub samples: Vec<f64>,
    pub status: FilterStatus,
}

/// Cutoffs for a given analysis range, `None` when no valid range exists
///
/// The upper cutoff is `min(upper_bound + 5, fs/2 - 1)`, falling back to
/// `fs/2 - 1` when that is not above the lower cutoff.
pub fn cutoffs(upper_bound: f64, sample_rate: f64) -> Option<(f64, f64)> {
    let below_nyquist = sample_rate / 2.0 - 1.0;
    let mut high = (upper_bound + UPPER_MARGIN_HZ).min(below_nyquist);
    if high <= LOW_CUTOFF_HZ {
        high = below_nyquist;
    }
    if high > LOW_CUTOFF_HZ {
        Some((LOW_CUTOFF_HZ, high))
    } else {
        None
    }
}

/// Apply the band-limiting filter, passing the signal through on any failure
pub fn band_limit(signal: Vec<f64>, upper_bound: f64, sample_rate: f64) -> FilteredSignal {
    let Some((low_hz, high_hz)) = cutoffs(upper_bound, sample_rate) else {
        let reason = format!(
            "no valid cutoff range above {} Hz at {} Hz sampling",
            LOW_CUTOFF_HZ, sample_rate
        );
        log::warn!("Skipping bandpass filter due to invalid frequency range: {}", reason);
        return FilteredSignal {
            samples: signal,
            status: FilterStatus::Skipped { reason },
        };
    };

    let result = butter_bandpass(FILTER_ORDER, low_hz, high_hz, sample_rate)
        .and_then(|sos| sosfiltfilt(&signal, &sos));

    match result {
        Ok(samples) => {
            log::debug!("Applied {:.2}-{:.2} Hz band-pass", low_hz, high_hz);
            FilteredSignal {
                samples,
                status: FilterStatus::Applied { low_hz, high_hz },
            }
        }
        Err(err) => {
            log::warn!(
                "Could not apply bandpass filter: {}. Proceeding with unfiltered data.",
                err
            );
            FilteredSignal {
                samples: signal,
                status: FilterStatus::Failed {
                    reason: err.to_string(),
                },
            }
        }
    }
}

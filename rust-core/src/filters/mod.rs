//! IIR band-pass design and zero-phase filtering

pub mod butterworth;
pub mod sos;
pub mod bandlimit;

pub use butterworth::{Sos, butter_bandpass};
pub use sos::{sosfilt, sosfilt_zi, sosfiltfilt};
pub use bandlimit::{FilterStatus, FilteredSignal, band_limit};

use thiserror::Error;

/// Filter design or application failure
///
/// Always recoverable at the pipeline level: the band-limiting stage falls
/// back to the unfiltered signal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("cutoffs {low_hz} Hz and {high_hz} Hz are invalid for a sample rate of {sample_rate} Hz")]
    InvalidCutoff {
        low_hz: f64,
        high_hz: f64,
        sample_rate: f64,
    },

    #[error("filter design failed: {0}")]
    Design(String),

    #[error("the length of the input ({len}) must be greater than padlen ({padlen})")]
    SignalTooShort { len: usize, padlen: usize },

    #[error("singular initial-condition system")]
    Singular,

    #[error("filter output is not finite")]
    NonFinite,
}

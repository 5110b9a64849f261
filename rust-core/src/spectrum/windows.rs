//! Taper for spectral estimation

use std::f64::consts::PI;

/// Periodic (DFT-even) Hann window: w[n] = 0.5 - 0.5*cos(2πn/N)
///
/// One full cosine period spans the segment, so the last sample does not
/// repeat the first. A length of 1 gives `[1.0]`.
pub fn hann_periodic(length: usize) -> Vec<f64> {
    if length == 1 {
        return vec![1.0];
    }

    (0..length)
        .map(|n| 0.5 - 0.5 * (2.0 * PI * n as f64 / length as f64).cos())
        .collect()
}

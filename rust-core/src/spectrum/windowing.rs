//! Segment conditioning before the FFT
//!
//! Detrending, tapering, and the scale factor that turns |X[k]|² into a
//! power spectral density.

/// Subtract the segment mean in-place (constant detrend)
pub fn remove_mean(segment: &mut [f64]) {
    if segment.is_empty() {
        return;
    }
    let mean = segment.iter().sum::<f64>() / segment.len() as f64;
    for s in segment.iter_mut() {
        *s -= mean;
    }
}

/// Apply precomputed window coefficients in-place
pub fn apply_window_inplace(segment: &mut [f64], window: &[f64]) {
    for (s, w) in segment.iter_mut().zip(window.iter()) {
        *s *= w;
    }
}

/// Density scale `1 / (fs * Σ w²)`
///
/// Multiplying |X[k]|² by this factor yields power per Hz, so that summing
/// bins and multiplying by the bin width gives power in signal units².
pub fn density_scale(window: &[f64], sample_rate: f64) -> f64 {
    let sum_sq: f64 = window.iter().map(|&w| w * w).sum();
    1.0 / (sample_rate * sum_sq)
}

/// Double the one-sided bins that stand in for their negative-frequency twin
///
/// DC is never doubled; the Nyquist bin exists only for even FFT sizes and
/// is not doubled either.
pub fn fold_one_sided(power: &mut [f64], fft_size: usize) {
    let last = if fft_size % 2 == 0 {
        power.len().saturating_sub(1)
    } else {
        power.len()
    };
    for p in power.iter_mut().take(last).skip(1) {
        *p *= 2.0;
    }
}

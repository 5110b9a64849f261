//! Cascaded biquad filtering and zero-phase forward-backward application
//!
//! Sections run in transposed direct form II. Each section carries two
//! state values.

use super::butterworth::Sos;
use super::FilterError;

/// Filter `x` through the cascade, updating `state` in place
///
/// `state` must hold one `[z0, z1]` pair per section. Sections are assumed
/// normalized (a0 = 1).
pub fn sosfilt(x: &[f64], sos: &[Sos], state: &mut [[f64; 2]]) -> Vec<f64> {
    let mut y = x.to_vec();

    for (s, z) in sos.iter().zip(state.iter_mut()) {
        let [b0, b1, b2] = s.b;
        let [_, a1, a2] = s.a;

        for sample in y.iter_mut() {
            let input = *sample;
            let output = b0 * input + z[0];
            z[0] = b1 * input - a1 * output + z[1];
            z[1] = b2 * input - a2 * output;
            *sample = output;
        }
    }

    y
}

/// Initial state for a unit step input at steady state
///
/// Section `i` is scaled by the DC gain of sections `0..i`, so multiplying
/// the result by the first input sample starts the cascade without a
/// transient.
pub fn sosfilt_zi(sos: &[Sos]) -> Result<Vec<[f64; 2]>, FilterError> {
    let mut zi = Vec::with_capacity(sos.len());
    let mut scale = 1.0;

    for s in sos {
        let [b0, b1, b2] = s.b;
        let [_, a1, a2] = s.a;

        let a_sum = 1.0 + a1 + a2;
        if a_sum.abs() < f64::EPSILON {
            return Err(FilterError::Singular);
        }

        // Solve (I - Aᵀ) z = B for the 2x2 companion system
        let rhs0 = b1 - a1 * b0;
        let rhs1 = b2 - a2 * b0;
        let z0 = (rhs0 + rhs1) / a_sum;
        let z1 = rhs1 - a2 * z0;

        zi.push([scale * z0, scale * z1]);
        scale *= (b0 + b1 + b2) / a_sum;
    }

    Ok(zi)
}

/// Edge length used by [`sosfiltfilt`]: three times the number of taps
pub fn default_padlen(sos: &[Sos]) -> usize {
    let b_zeros = sos.iter().filter(|s| s.b[2] == 0.0).count();
    let a_zeros = sos.iter().filter(|s| s.a[2] == 0.0).count();
    let ntaps = 2 * sos.len() + 1 - b_zeros.min(a_zeros);
    3 * ntaps
}

/// Extend `x` at both ends by point reflection about its end samples
///
/// Requires `edge < x.len()`.
pub fn odd_extend(x: &[f64], edge: usize) -> Vec<f64> {
    let n = x.len();
    let first = x[0];
    let last = x[n - 1];

    let mut ext = Vec::with_capacity(n + 2 * edge);
    ext.extend((1..=edge).rev().map(|i| 2.0 * first - x[i]));
    ext.extend_from_slice(x);
    ext.extend((1..=edge).map(|i| 2.0 * last - x[n - 1 - i]));
    ext
}

/// Zero-phase filtering: forward pass, then backward pass over the result
///
/// The signal is padded with an odd extension of [`default_padlen`] samples
/// at each end, and both passes start from steady-state conditions, which
/// suppresses edge transients.
pub fn sosfiltfilt(x: &[f64], sos: &[Sos]) -> Result<Vec<f64>, FilterError> {
    let edge = default_padlen(sos);
    if x.len() <= edge {
        return Err(FilterError::SignalTooShort {
            len: x.len(),
            padlen: edge,
        });
    }

    let ext = odd_extend(x, edge);
    let zi = sosfilt_zi(sos)?;

    let x0 = ext[0];
    let mut state: Vec<[f64; 2]> = zi.iter().map(|z| [z[0] * x0, z[1] * x0]).collect();
    let mut y = sosfilt(&ext, sos, &mut state);

    let y0 = y[y.len() - 1];
    let mut state: Vec<[f64; 2]> = zi.iter().map(|z| [z[0] * y0, z[1] * y0]).collect();
    y.reverse();
    let mut z = sosfilt(&y, sos, &mut state);
    z.reverse();

    let filtered: Vec<f64> = z[edge..edge + x.len()].to_vec();
    if filtered.iter().any(|v| !v.is_finite()) {
        return Err(FilterError::NonFinite);
    }

    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::butterworth::butter_bandpass;
    use std::f64::consts::PI;

    fn one_pole() -> Vec<Sos> {
        // y[n] = x[n] + 0.5 y[n-1]
        vec![Sos::new([1.0, 0.0, 0.0], [1.0, -0.5, 0.0])]
    }

    #[test]
    fn test_sosfilt_impulse() {
        let sos = one_pole();
        let mut state = vec![[0.0; 2]];
        let y = sosfilt(&[1.0, 0.0, 0.0, 0.0], &sos, &mut state);
        assert_eq!(y, vec![1.0, 0.5, 0.25, 0.125]);
    }

    #[test]
    fn test_sosfilt_zi_steady_state() {
        let sos = one_pole();
        let zi = sosfilt_zi(&sos).unwrap();
        assert!((zi[0][0] - 1.0).abs() < 1e-12);
        assert!(zi[0][1].abs() < 1e-12);

        // A step started from zi stays at the DC gain (2.0)
        let mut state = zi;
        let y = sosfilt(&[1.0; 10], &sos, &mut state);
        assert!(y.iter().all(|&v| (v - 2.0).abs() < 1e-12));
    }

    #[test]
    fn test_sosfilt_zi_cascade_steady_state() {
        let sos = butter_bandpass(5, 0.5, 20.0, 128.0).unwrap();
        let mut state = sosfilt_zi(&sos).unwrap();
        let y = sosfilt(&[1.0; 50], &sos, &mut state);
        // Band-pass DC gain is zero
        assert!(y.iter().all(|v| v.abs() < 1e-9));
    }

    #[test]
    fn test_singular_section() {
        let sos = vec![Sos::new([1.0, 0.0, 0.0], [1.0, -1.0, 0.0])];
        assert!(matches!(sosfilt_zi(&sos), Err(FilterError::Singular)));
    }

    #[test]
    fn test_odd_extend() {
        let ext = odd_extend(&[1.0, 2.0, 4.0, 7.0], 2);
        assert_eq!(ext, vec![-2.0, 0.0, 1.0, 2.0, 4.0, 7.0, 10.0, 12.0]);
    }

    #[test]
    fn test_padlen() {
        let sos = butter_bandpass(5, 0.5, 35.0, 128.0).unwrap();
        assert_eq!(default_padlen(&sos), 33);
        assert_eq!(default_padlen(&one_pole()), 6);
    }

    #[test]
    fn test_filtfilt_preserves_passband_phase() {
        let fs = 128.0;
        let sos = butter_bandpass(5, 0.5, 35.0, fs).unwrap();
        let signal: Vec<f64> = (0..2560)
            .map(|n| (2.0 * PI * 10.0 * n as f64 / fs).sin())
            .collect();

        let filtered = sosfiltfilt(&signal, &sos).unwrap();
        assert_eq!(filtered.len(), signal.len());

        // No phase shift, unit gain, once the edge transients have decayed
        for i in 1000..1560 {
            assert!(
                (filtered[i] - signal[i]).abs() < 1e-2,
                "sample {}: {} vs {}",
                i,
                filtered[i],
                signal[i]
            );
        }
    }

    #[test]
    fn test_filtfilt_removes_offset() {
        let fs = 128.0;
        let sos = butter_bandpass(5, 0.5, 35.0, fs).unwrap();
        let signal: Vec<f64> = (0..2560)
            .map(|n| 50.0 + (2.0 * PI * 10.0 * n as f64 / fs).sin())
            .collect();

        let filtered = sosfiltfilt(&signal, &sos).unwrap();
        let middle = &filtered[640..1920];
        let mean = middle.iter().sum::<f64>() / middle.len() as f64;
        assert!(mean.abs() < 0.5, "residual offset {}", mean);
    }

    #[test]
    fn test_filtfilt_too_short() {
        let sos = butter_bandpass(5, 0.5, 35.0, 128.0).unwrap();
        assert!(matches!(
            sosfiltfilt(&[0.0; 33], &sos),
            Err(FilterError::SignalTooShort { len: 33, padlen: 33 })
        ));
        assert!(sosfiltfilt(&[0.0; 34], &sos).is_ok());
    }
}

//! Butterworth band-pass design in second-order sections
//!
//! Analog prototype → frequency pre-warping → low-pass to band-pass
//! transform → bilinear transform → pairing of conjugate poles into biquads.
//! Frequencies are normalized so that 1.0 is the Nyquist frequency.

use super::FilterError;
use num_complex::Complex64;
use std::f64::consts::PI;

/// One biquad section: H(z) = (b0 + b1 z⁻¹ + b2 z⁻²) / (a0 + a1 z⁻¹ + a2 z⁻²)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sos {
    pub b: [f64; 3],
    pub a: [f64; 3],
}

impl Sos {
    pub fn new(b: [f64; 3], a: [f64; 3]) -> Self {
        Self { b, a }
    }

    /// Complex frequency response at normalized frequency `w` (units of π rad/sample)
    pub fn response(&self, w: f64) -> Complex64 {
        let z1 = Complex64::from_polar(1.0, -PI * w);
        let z2 = z1 * z1;
        let num = self.b[0] + z1 * self.b[1] + z2 * self.b[2];
        let den = self.a[0] + z1 * self.a[1] + z2 * self.a[2];
        num / den
    }
}

/// Magnitude response of a section cascade at normalized frequency `w`
pub fn cascade_gain(sos: &[Sos], w: f64) -> f64 {
    sos.iter()
        .map(|s| s.response(w))
        .fold(Complex64::new(1.0, 0.0), |acc, h| acc * h)
        .norm()
}

/// Analog Butterworth prototype poles (cutoff 1 rad/s), left half-plane
fn prototype_poles(order: usize) -> Vec<Complex64> {
    let n = order as i64;
    (0..n)
        .map(|k| {
            let m = (-n + 1 + 2 * k) as f64;
            -Complex64::from_polar(1.0, PI * m / (2.0 * order as f64))
        })
        .collect()
}

/// Design a digital Butterworth band-pass filter
///
/// # Arguments
/// * `order` - Prototype order (the band-pass has `order` sections)
/// * `low_hz` - Lower cutoff in Hz
/// * `high_hz` - Upper cutoff in Hz
/// * `sample_rate` - Sample rate in Hz
///
/// # Returns
/// `order` second-order sections with a0 = 1 and the overall gain folded into
/// the first section
pub fn butter_bandpass(
    order: usize,
    low_hz: f64,
    high_hz: f64,
    sample_rate: f64,
) -> Result<Vec<Sos>, FilterError> {
    if order == 0 {
        return Err(FilterError::Design("filter order must be > 0".into()));
    }

    let nyquist = sample_rate / 2.0;
    let w1 = low_hz / nyquist;
    let w2 = high_hz / nyquist;
    let valid = |w: f64| w.is_finite() && w > 0.0 && w < 1.0;
    if !(valid(w1) && valid(w2) && w1 < w2) {
        return Err(FilterError::InvalidCutoff {
            low_hz,
            high_hz,
            sample_rate,
        });
    }

    // Pre-warp for the bilinear transform (digital fs = 2)
    let fs2 = 4.0;
    let warped_low = fs2 * (PI * w1 / 2.0).tan();
    let warped_high = fs2 * (PI * w2 / 2.0).tan();
    let bw = warped_high - warped_low;
    let wo2 = warped_low * warped_high;

    // Low-pass to band-pass: each prototype pole splits in two, and `order`
    // zeros land at the origin
    let mut analog_poles = Vec::with_capacity(2 * order);
    for p in prototype_poles(order) {
        let p_lp = p * (bw / 2.0);
        let d = (p_lp * p_lp - wo2).sqrt();
        analog_poles.push(p_lp + d);
        analog_poles.push(p_lp - d);
    }
    let analog_gain = bw.powi(order as i32);

    // Bilinear transform: origin zeros map to z = 1, the zeros at infinity to z = -1
    let digital_poles: Vec<Complex64> = analog_poles
        .iter()
        .map(|&p| (fs2 + p) / (fs2 - p))
        .collect();
    let denom: Complex64 = analog_poles.iter().map(|&p| fs2 - p).product();
    let gain = analog_gain * (Complex64::new(fs2.powi(order as i32), 0.0) / denom).re;

    if !gain.is_finite() || digital_poles.iter().any(|p| !p.re.is_finite() || !p.im.is_finite()) {
        return Err(FilterError::Design("non-finite pole or gain".into()));
    }

    let denominators = pair_poles(&digital_poles)?;
    if denominators.len() != order {
        return Err(FilterError::Design(format!(
            "expected {} pole pairs, found {}",
            order,
            denominators.len()
        )));
    }

    // One zero at +1 and one at -1 per section: 1 - z⁻²
    Ok(denominators
        .into_iter()
        .enumerate()
        .map(|(i, a)| {
            let scale = if i == 0 { gain } else { 1.0 };
            Sos::new([scale, 0.0, -scale], a)
        })
        .collect())
}

/// Group poles into second-order denominators [1, a1, a2]
///
/// Complex poles pair with their conjugate, real poles pair with each other.
fn pair_poles(poles: &[Complex64]) -> Result<Vec<[f64; 3]>, FilterError> {
    let is_real = |p: &Complex64| p.im.abs() <= 1e-10 * p.norm().max(1.0);

    let upper: Vec<&Complex64> = poles.iter().filter(|p| !is_real(p) && p.im > 0.0).collect();
    let lower = poles.iter().filter(|p| !is_real(p) && p.im < 0.0).count();
    if upper.len() != lower {
        return Err(FilterError::Design("unpaired complex pole".into()));
    }

    let mut real: Vec<f64> = poles.iter().filter(|p| is_real(p)).map(|p| p.re).collect();
    if real.len() % 2 != 0 {
        return Err(FilterError::Design("odd number of real poles".into()));
    }
    real.sort_by(|a, b| a.total_cmp(b));

    let mut sections: Vec<[f64; 3]> = upper
        .iter()
        .map(|p| [1.0, -2.0 * p.re, p.norm_sqr()])
        .collect();
    sections.extend(
        real.chunks_exact(2)
            .map(|pair| [1.0, -(pair[0] + pair[1]), pair[0] * pair[1]]),
    );

    Ok(sections)
}

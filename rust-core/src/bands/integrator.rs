//! Band power integration over a PSD
//!
//! Power in a range is the Riemann sum of the density over the selected bins
//! times the bin width. Every band is clamped to the analysis range
//! [lower_bound, upper_bound), so narrowing that range can truncate or zero a
//! band.

use super::FrequencyBand;
use crate::spectrum::frequency_resolution;
use ndarray::ArrayView1;

/// Power per fixed band plus the power over the whole analysis range
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BandPowers {
    /// Indexed by [`FrequencyBand::index`]
    pub bands: [f64; 4],

    /// Power over [lower_bound, upper_bound)
    pub total: f64,
}

impl BandPowers {
    pub fn band(&self, band: FrequencyBand) -> f64 {
        self.bands[band.index()]
    }
}

/// Precomputed bin selections for one frequency axis and analysis range
#[derive(Debug, Clone)]
pub struct BandIntegrator {
    /// Selected bin indices per band
    band_bins: [Vec<usize>; 4],

    /// Selected bin indices for total power
    total_bins: Vec<usize>,

    /// Bin width in Hz
    resolution: f64,
}

impl BandIntegrator {
    /// Build bin selections
    ///
    /// # Arguments
    /// * `frequencies` - Ascending, uniformly spaced frequency axis in Hz
    /// * `lower_bound` - Analysis range start (inclusive)
    /// * `upper_bound` - Analysis range end (exclusive)
    pub fn new(frequencies: &[f64], lower_bound: f64, upper_bound: f64) -> Self {
        let in_range = |f: f64| f >= lower_bound && f < upper_bound;

        let select = |band: FrequencyBand| -> Vec<usize> {
            frequencies
                .iter()
                .enumerate()
                .filter(|(_, &f)| band.contains(f) && in_range(f))
                .map(|(i, _)| i)
                .collect()
        };

        let band_bins = FrequencyBand::ALL.map(select);
        let total_bins = frequencies
            .iter()
            .enumerate()
            .filter(|(_, &f)| in_range(f))
            .map(|(i, _)| i)
            .collect();

        Self {
            band_bins,
            total_bins,
            resolution: frequency_resolution(frequencies),
        }
    }

    /// Bin width used for integration
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Bin indices selected for `band`
    pub fn band_bins(&self, band: FrequencyBand) -> &[usize] {
        &self.band_bins[band.index()]
    }

    /// Integrate one segment's PSD
    pub fn integrate(&self, psd: ArrayView1<'_, f64>) -> BandPowers {
        let sum_bins = |bins: &[usize]| -> f64 {
            bins.iter().map(|&i| psd[i]).sum::<f64>() * self.resolution
        };

        BandPowers {
            bands: [
                sum_bins(&self.band_bins[0]),
                sum_bins(&self.band_bins[1]),
                sum_bins(&self.band_bins[2]),
                sum_bins(&self.band_bins[3]),
            ],
            total: sum_bins(&self.total_bins),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    fn axis(resolution: f64, bins: usize) -> Vec<f64> {
        (0..bins).map(|k| k as f64 * resolution).collect()
    }

    #[test]
    fn test_flat_psd() {
        // 0.5 Hz bins, density 1.0 everywhere
        let freqs = axis(0.5, 129);
        let psd = Array1::<f64>::ones(129);
        let integrator = BandIntegrator::new(&freqs, 1.0, 30.0);

        let powers = integrator.integrate(psd.view());

        // Width of each band in Hz
        assert!((powers.band(FrequencyBand::Delta) - 3.0).abs() < 1e-12);
        assert!((powers.band(FrequencyBand::Theta) - 4.0).abs() < 1e-12);
        assert!((powers.band(FrequencyBand::Alpha) - 5.0).abs() < 1e-12);
        assert!((powers.band(FrequencyBand::Beta) - 17.0).abs() < 1e-12);
        assert!((powers.total - 29.0).abs() < 1e-12);
    }

    #[test]
    fn test_bands_clamped_to_analysis_range() {
        let freqs = axis(0.5, 129);
        let psd = Array1::<f64>::ones(129);
        let integrator = BandIntegrator::new(&freqs, 5.0, 10.0);

        let powers = integrator.integrate(psd.view());

        assert_eq!(powers.band(FrequencyBand::Delta), 0.0);
        // [5, 8)
        assert!((powers.band(FrequencyBand::Theta) - 3.0).abs() < 1e-12);
        // [8, 10)
        assert!((powers.band(FrequencyBand::Alpha) - 2.0).abs() < 1e-12);
        assert_eq!(powers.band(FrequencyBand::Beta), 0.0);
        assert!((powers.total - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_total_extends_past_beta() {
        let freqs = axis(1.0, 65);
        let mut psd = Array1::<f64>::zeros(65);
        psd[40] = 2.0;
        let integrator = BandIntegrator::new(&freqs, 1.0, 45.0);

        let powers = integrator.integrate(psd.view());

        assert!(powers.bands.iter().all(|&p| p == 0.0));
        assert!((powers.total - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_bin_axis_uses_unit_resolution() {
        let integrator = BandIntegrator::new(&[0.0], 0.0, 30.0);
        assert_eq!(integrator.resolution(), 1.0);

        let psd = Array1::from_vec(vec![4.0]);
        let powers = integrator.integrate(psd.view());
        assert_eq!(powers.total, 4.0);
        assert_eq!(powers.band(FrequencyBand::Delta), 0.0);
    }

    #[test]
    fn test_band_edges_half_open() {
        let freqs = axis(1.0, 40);
        let integrator = BandIntegrator::new(&freqs, 1.0, 30.0);

        assert_eq!(integrator.band_bins(FrequencyBand::Delta), &[1, 2, 3]);
        assert_eq!(integrator.band_bins(FrequencyBand::Alpha), &[8, 9, 10, 11, 12]);
        assert_eq!(*integrator.band_bins(FrequencyBand::Beta).last().unwrap(), 29);
    }
}

//! FFT engine using realfft for real-valued signals

use crate::error::{BandPowerError, Result};
use realfft::num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// FFT engine for real-valued segments of a fixed length
pub struct FftEngine {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Real FFT processor
    r2c: Arc<dyn RealToComplex<f64>>,

    /// Reusable input buffer (realfft uses it as scratch)
    input_buffer: Vec<f64>,

    /// Reusable output buffer (complex spectrum)
    output_buffer: Vec<Complex<f64>>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples, any length > 0)
    pub fn new(fft_size: usize) -> Result<Self> {
        if fft_size == 0 {
            return Err(BandPowerError::SpectralComputation(
                "FFT size must be greater than zero".into(),
            ));
        }

        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_size);

        let input_buffer = r2c.make_input_vec();
        let output_buffer = r2c.make_output_vec();

        Ok(Self {
            fft_size,
            r2c,
            input_buffer,
            output_buffer,
        })
    }

    /// Compute the one-sided power spectrum |X[k]|² for k = 0..=fft_size/2
    ///
    /// # Arguments
    /// * `segment` - Exactly `fft_size` input samples
    pub fn compute_power(&mut self, segment: &[f64]) -> Result<Vec<f64>> {
        if segment.len() != self.fft_size {
            return Err(BandPowerError::SpectralComputation(format!(
                "segment length {} does not match FFT size {}",
                segment.len(),
                self.fft_size
            )));
        }
        self.input_buffer.copy_from_slice(segment);

        self.r2c
            .process(&mut self.input_buffer, &mut self.output_buffer)
            .map_err(|e| BandPowerError::SpectralComputation(e.to_string()))?;

        Ok(self.output_buffer.iter().map(|c| c.norm_sqr()).collect())
    }

    /// Get number of frequency bins (fft_size/2 + 1 for real FFT)
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Frequency axis in Hz: bin k sits at k * sample_rate / fft_size
    pub fn frequency_axis_hz(&self, sample_rate: f64) -> Vec<f64> {
        (0..self.num_bins())
            .map(|bin| bin as f64 * sample_rate / self.fft_size as f64)
            .collect()
    }
}

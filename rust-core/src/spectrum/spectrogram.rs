//! Time-resolved power spectral density
//!
//! Splits a signal into overlapping segments and estimates one one-sided
//! PSD per segment. Output layout is (frequency, segment).

use super::fft::FftEngine;
use super::windowing::{apply_window_inplace, density_scale, fold_one_sided, remove_mean};
use super::windows::hann_periodic;
use crate::error::{BandPowerError, Result};
use ndarray::{Array2, ArrayView1};

/// Spectrogram configuration
#[derive(Debug, Clone)]
pub struct SpectrogramConfig {
    /// Sample rate in Hz
    pub sample_rate: f64,

    /// Samples per segment
    pub nperseg: usize,

    /// Samples shared by consecutive segments (must be < nperseg)
    pub noverlap: usize,

    /// Remove the segment mean before tapering
    pub detrend: bool,
}

impl SpectrogramConfig {
    /// Hann-tapered, mean-removed segments with 50% overlap
    pub fn half_overlap(sample_rate: f64, nperseg: usize) -> Self {
        Self {
            sample_rate,
            nperseg,
            noverlap: nperseg / 2,
            detrend: true,
        }
    }

    /// Hop between segment starts
    pub fn step(&self) -> usize {
        self.nperseg - self.noverlap
    }

    /// Number of full segments that fit in `signal_len` samples
    pub fn segment_count(&self, signal_len: usize) -> usize {
        if signal_len < self.nperseg || self.step() == 0 {
            return 0;
        }
        (signal_len - self.noverlap) / self.step()
    }

    fn validate(&self) -> Result<()> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(BandPowerError::SpectralComputation(format!(
                "sample rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if self.nperseg == 0 {
            return Err(BandPowerError::SpectralComputation(
                "nperseg must be greater than zero".into(),
            ));
        }
        if self.noverlap >= self.nperseg {
            return Err(BandPowerError::SpectralComputation(format!(
                "noverlap ({}) must be less than nperseg ({})",
                self.noverlap, self.nperseg
            )));
        }
        Ok(())
    }
}

/// PSD estimate for every segment of a signal
#[derive(Debug, Clone)]
pub struct Spectrogram {
    /// Bin frequencies in Hz, ascending and uniformly spaced
    pub frequencies: Vec<f64>,

    /// Segment center times in seconds, ascending
    pub times: Vec<f64>,

    /// Power spectral density, shape (frequencies, segments)
    pub psd: Array2<f64>,
}

impl Spectrogram {
    /// Compute the spectrogram of `signal`
    ///
    /// A signal shorter than one segment yields an empty spectrogram rather
    /// than an error; contradictory configurations fail.
    pub fn compute(signal: &[f64], config: &SpectrogramConfig) -> Result<Self> {
        config.validate()?;

        let nperseg = config.nperseg;
        let step = config.step();
        let n_segments = config.segment_count(signal.len());

        let mut engine = FftEngine::new(nperseg)?;
        let frequencies = engine.frequency_axis_hz(config.sample_rate);
        let window = hann_periodic(nperseg);
        let scale = density_scale(&window, config.sample_rate);

        let mut psd = Array2::<f64>::zeros((frequencies.len(), n_segments));
        let mut times = Vec::with_capacity(n_segments);
        let mut segment = vec![0.0; nperseg];

        for k in 0..n_segments {
            let start = k * step;
            segment.copy_from_slice(&signal[start..start + nperseg]);

            if config.detrend {
                remove_mean(&mut segment);
            }
            apply_window_inplace(&mut segment, &window);

            let mut power = engine.compute_power(&segment)?;
            for p in power.iter_mut() {
                *p *= scale;
            }
            fold_one_sided(&mut power, nperseg);

            psd.column_mut(k)
                .iter_mut()
                .zip(power.iter())
                .for_each(|(dst, &src)| *dst = src);

            times.push((nperseg as f64 / 2.0 + start as f64) / config.sample_rate);
        }

        Ok(Self {
            frequencies,
            times,
            psd,
        })
    }

    pub fn num_segments(&self) -> usize {
        self.psd.ncols()
    }

    pub fn num_frequencies(&self) -> usize {
        self.psd.nrows()
    }

    /// True when there is no segment or no frequency bin
    pub fn is_empty(&self) -> bool {
        self.psd.is_empty()
    }

    /// PSD of one segment
    pub fn segment(&self, index: usize) -> ArrayView1<'_, f64> {
        self.psd.column(index)
    }

    /// Bin width in Hz, 1.0 when the axis has fewer than two points
    pub fn frequency_resolution(&self) -> f64 {
        frequency_resolution(&self.frequencies)
    }
}

/// Spacing of a uniform frequency axis, 1.0 when it has fewer than two points
pub fn frequency_resolution(frequencies: &[f64]) -> f64 {
    if frequencies.len() > 1 {
        frequencies[1] - frequencies[0]
    } else {
        1.0
    }
}

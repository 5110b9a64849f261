//! Band power pipeline: load → band-limit → spectrogram → integrate → table
//!
//! Stages run sequentially on the calling thread. Progress is reported at
//! stage boundaries (0, 10, 20, 70) and per segment during integration
//! (70..=100).

use crate::bands::BandIntegrator;
use crate::data::SignalLoader;
use crate::error::{BandPowerError, Result};
use crate::filters::{band_limit, FilterStatus};
use crate::spectrum::{Spectrogram, SpectrogramConfig};
use crate::table::ResultTable;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// User-facing analysis parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParameters {
    /// Analysis range start in Hz (inclusive)
    pub lower_bound: f64,

    /// Analysis range end in Hz (exclusive)
    pub upper_bound: f64,

    /// Segment duration in seconds
    pub epoch_length: f64,

    /// Sample rate of the input signal in Hz
    pub sample_frequency: f64,

    /// Zero-based column holding the channel
    pub channel_index: usize,
}

impl Default for AnalysisParameters {
    fn default() -> Self {
        Self {
            lower_bound: 1.0,
            upper_bound: 30.0,
            epoch_length: 2.0,
            sample_frequency: 128.0,
            channel_index: 0,
        }
    }
}

impl AnalysisParameters {
    /// Samples per segment, `floor(epoch_length * sample_frequency)`
    ///
    /// # Errors
    /// `InvalidParameters` when the sample rate is not positive or the
    /// segment would hold no samples.
    pub fn samples_per_segment(&self) -> Result<usize> {
        if !(self.sample_frequency.is_finite() && self.sample_frequency > 0.0) {
            return Err(BandPowerError::InvalidParameters(format!(
                "sample frequency must be positive, got {} Hz",
                self.sample_frequency
            )));
        }

        let samples = (self.epoch_length * self.sample_frequency).floor();
        if !samples.is_finite() || samples < 1.0 {
            return Err(BandPowerError::InvalidParameters(format!(
                "epoch length ({}s) results in non-positive samples per segment",
                self.epoch_length
            )));
        }

        Ok(samples as usize)
    }
}

/// Receives integer completion percentages in [0, 100]
///
/// Called synchronously from inside the computation, so implementations must
/// return quickly.
pub trait ProgressReporter {
    fn report(&mut self, percent: u8);
}

impl<F: FnMut(u8)> ProgressReporter for F {
    fn report(&mut self, percent: u8) {
        self(percent)
    }
}

/// Clamps and de-duplicates downward steps before forwarding
struct Progress<'a> {
    sink: Option<&'a mut dyn ProgressReporter>,
    last: u8,
}

impl<'a> Progress<'a> {
    fn new(sink: Option<&'a mut dyn ProgressReporter>) -> Self {
        Self { sink, last: 0 }
    }

    fn report(&mut self, percent: usize) {
        let percent = (percent.min(100) as u8).max(self.last);
        self.last = percent;
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.report(percent);
        }
    }
}

/// How a successful run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunStatus {
    /// Every segment was analyzed
    Completed,

    /// The signal is shorter than one segment; the table is empty
    InsufficientData { nperseg: usize, available: usize },

    /// The spectrogram had no segments or no frequency bins; the table is empty
    ///
    /// Unreachable from the current pipeline: the segment-length check
    /// returns `InsufficientData` first, and a segment of at least one sample
    /// always has a DC bin. Guards integration against an empty PSD.
    EmptySpectrum,
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct BandPowerReport {
    /// One row per segment, possibly empty
    pub table: ResultTable,

    pub status: RunStatus,

    /// Band-limiting outcome, `None` when the run ended before filtering
    pub filter: Option<FilterStatus>,

    /// Samples per segment
    pub nperseg: usize,
}

impl BandPowerReport {
    fn empty(status: RunStatus, filter: Option<FilterStatus>, nperseg: usize) -> Self {
        Self {
            table: ResultTable::empty(),
            status,
            filter,
            nperseg,
        }
    }

    /// Recoverable conditions met during the run, as display strings
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Some(filter) = &self.filter {
            if !filter.is_applied() {
                warnings.push(filter.to_string());
            }
        }
        match &self.status {
            RunStatus::Completed => {}
            RunStatus::InsufficientData { nperseg, available } => warnings.push(format!(
                "window length ({} samples) is longer than the data ({} samples)",
                nperseg, available
            )),
            RunStatus::EmptySpectrum => {
                warnings.push("spectrogram calculation produced no results".to_string())
            }
        }
        warnings
    }
}

/// Per-epoch band power analysis of one channel
#[derive(Debug, Clone, Default)]
pub struct BandPowerPipeline {
    params: AnalysisParameters,
    loader: SignalLoader,
}

impl BandPowerPipeline {
    pub fn new(params: AnalysisParameters) -> Self {
        Self {
            params,
            loader: SignalLoader::default(),
        }
    }

    /// Use a custom loader (e.g. another delimiter)
    pub fn with_loader(mut self, loader: SignalLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Load the configured channel from `path` and analyze it
    pub fn run(
        &self,
        path: &Path,
        progress: Option<&mut dyn ProgressReporter>,
    ) -> Result<BandPowerReport> {
        let mut progress = Progress::new(progress);
        progress.report(0);

        log::info!(
            "Loading channel {} from {}",
            self.params.channel_index,
            path.display()
        );
        let signal = self.loader.load_channel(path, self.params.channel_index)?;
        progress.report(10);

        self.process(signal, &mut progress)
    }

    /// Analyze an in-memory signal sampled at the configured rate
    pub fn analyze(
        &self,
        signal: Vec<f64>,
        progress: Option<&mut dyn ProgressReporter>,
    ) -> Result<BandPowerReport> {
        let mut progress = Progress::new(progress);
        progress.report(0);

        if signal.is_empty() {
            return Err(BandPowerError::InvalidData {
                column: self.params.channel_index,
                reason: "signal contains no data".into(),
            });
        }
        if let Some(i) = signal.iter().position(|v| !v.is_finite()) {
            return Err(BandPowerError::InvalidData {
                column: self.params.channel_index,
                reason: format!("non-finite sample at index {}", i),
            });
        }
        progress.report(10);

        self.process(signal, &mut progress)
    }

    fn process(&self, signal: Vec<f64>, progress: &mut Progress<'_>) -> Result<BandPowerReport> {
        let params = &self.params;
        let nperseg = params.samples_per_segment()?;

        if nperseg > signal.len() {
            log::warn!(
                "Window length ({}s) is longer than data duration. No full segments can be analyzed.",
                params.epoch_length
            );
            progress.report(100);
            return Ok(BandPowerReport::empty(
                RunStatus::InsufficientData {
                    nperseg,
                    available: signal.len(),
                },
                None,
                nperseg,
            ));
        }

        let filtered = band_limit(signal, params.upper_bound, params.sample_frequency);
        progress.report(20);

        let config = SpectrogramConfig::half_overlap(params.sample_frequency, nperseg);
        let spectrogram = Spectrogram::compute(&filtered.samples, &config)?;

        if spectrogram.is_empty() {
            log::warn!("Spectrogram calculation produced no results.");
            progress.report(100);
            return Ok(BandPowerReport::empty(
                RunStatus::EmptySpectrum,
                Some(filtered.status),
                nperseg,
            ));
        }
        progress.report(70);

        log::debug!(
            "{} segment(s) of {} samples, {} frequency bins",
            spectrogram.num_segments(),
            nperseg,
            spectrogram.num_frequencies()
        );

        let integrator =
            BandIntegrator::new(&spectrogram.frequencies, params.lower_bound, params.upper_bound);
        let n_segments = spectrogram.num_segments();
        let mut builder = ResultTable::builder(n_segments);

        for (i, &center) in spectrogram.times.iter().enumerate() {
            let powers = integrator.integrate(spectrogram.segment(i));
            builder.push(center, &powers);
            progress.report(70 + 30 * (i + 1) / n_segments);
        }

        let table = builder.finish();
        log::info!("Calculated band powers for {} epoch(s)", table.len());
        progress.report(100);

        Ok(BandPowerReport {
            table,
            status: RunStatus::Completed,
            filter: Some(filtered.status),
            nperseg,
        })
    }
}

/// Compute per-epoch band powers for one column of a comma-delimited file
///
/// # Arguments
/// * `path` - Input file with a header row
/// * `params` - Analysis range, epoch length, sample rate and channel
/// * `progress` - Optional receiver of completion percentages
///
/// # Returns
/// The run report; its table is empty when no segment could be formed
pub fn calculate_band_powers(
    path: &Path,
    params: &AnalysisParameters,
    progress: Option<&mut dyn ProgressReporter>,
) -> Result<BandPowerReport> {
    BandPowerPipeline::new(params.clone()).run(path, progress)
}

//! Spectral analysis with FFT

pub mod windows;
pub mod fft;
pub mod windowing;
pub mod spectrogram;

pub use windows::hann_periodic;
pub use fft::FftEngine;
pub use spectrogram::{Spectrogram, SpectrogramConfig, frequency_resolution};

//! Spectral analysis with FFT

pub mod analysis;
pub mod fft;
pub mod windowing;

pub use analysis::{AnalyzerConfig, AveragedSpectrum, SpectrumAnalyzer};
pub use fft::FftEngine;
pub use windowing::{generate_periodic_window, generate_window, WindowType};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpectrumError {
    #[error("Invalid analyzer configuration: {0}")]
    InvalidConfig(String),

    #[error("Signal of {len} samples is too short for an FFT of {fft_size} (need more than {fft_size})")]
    SignalTooShort { len: usize, fft_size: usize },

    #[error("FFT processing failed: {0}")]
    Fft(String),
}

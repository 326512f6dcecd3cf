//! Python bindings for spectrum analysis

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::prelude::*;

use super::spectrum_err;
use crate::spectrum::{AnalyzerConfig, SpectrumAnalyzer, WindowType};

/// Window type enum exposed to Python
#[pyclass(name = "WindowType")]
#[derive(Clone)]
pub enum PyWindowType {
    Hann,
    Hamming,
    Blackman,
    Rectangular,
}

impl From<PyWindowType> for WindowType {
    fn from(py_win: PyWindowType) -> Self {
        match py_win {
            PyWindowType::Hann => WindowType::Hann,
            PyWindowType::Hamming => WindowType::Hamming,
            PyWindowType::Blackman => WindowType::Blackman,
            PyWindowType::Rectangular => WindowType::Rectangular,
        }
    }
}

/// Averaging spectrum analyzer exposed to Python
#[pyclass(name = "SpectrumAnalyzer")]
pub struct PySpectrumAnalyzer {
    analyzer: SpectrumAnalyzer,
}

#[pymethods]
impl PySpectrumAnalyzer {
    /// Create a new spectrum analyzer
    ///
    /// Args:
    ///     fft_size: Samples per frame (even)
    ///     hop_size: Distance between frame starts
    ///     window_type: Window applied to every frame
    ///     sample_rate: Sample rate in Hz
    #[new]
    #[pyo3(signature = (fft_size=4096, hop_size=2048, window_type=PyWindowType::Hann, sample_rate=44100.0))]
    fn new(
        fft_size: usize,
        hop_size: usize,
        window_type: PyWindowType,
        sample_rate: f64,
    ) -> PyResult<Self> {
        let config = AnalyzerConfig {
            fft_size,
            hop_size,
            window_type: window_type.into(),
            sample_rate,
        };

        Ok(Self {
            analyzer: SpectrumAnalyzer::new(config).map_err(spectrum_err)?,
        })
    }

    /// Frame-averaged magnitude spectrum
    ///
    /// Returns:
    ///     Tuple of (frequencies_hz, magnitude_db) numpy arrays
    fn averaged_spectrum<'py>(
        &mut self,
        py: Python<'py>,
        signal: PyReadonlyArray1<f64>,
    ) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>)> {
        let spectrum = self
            .analyzer
            .averaged_spectrum(signal.as_slice()?)
            .map_err(spectrum_err)?;

        Ok((
            PyArray1::from_vec(py, spectrum.frequencies_hz),
            PyArray1::from_vec(py, spectrum.magnitude_db),
        ))
    }

    /// Get frequency bins in Hz
    fn frequency_bins_hz<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_vec(py, self.analyzer.frequency_bins_hz())
    }

    /// Get number of frequency bins
    fn num_bins(&self) -> usize {
        self.analyzer.num_bins()
    }

    /// Update configuration; omitted arguments keep their value
    #[pyo3(signature = (fft_size=None, hop_size=None, window_type=None, sample_rate=None))]
    fn update_config(
        &mut self,
        fft_size: Option<usize>,
        hop_size: Option<usize>,
        window_type: Option<PyWindowType>,
        sample_rate: Option<f64>,
    ) -> PyResult<()> {
        let mut config = self.analyzer.config().clone();

        if let Some(size) = fft_size {
            config.fft_size = size;
        }
        if let Some(hop) = hop_size {
            config.hop_size = hop;
        }
        if let Some(win) = window_type {
            config.window_type = win.into();
        }
        if let Some(sr) = sample_rate {
            config.sample_rate = sr;
        }

        self.analyzer.update_config(config).map_err(spectrum_err)
    }

    fn get_sample_rate(&self) -> f64 {
        self.analyzer.config().sample_rate
    }

    fn get_fft_size(&self) -> usize {
        self.analyzer.config().fft_size
    }
}

//! Python bindings for the manual EQ curve

use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::eq_err;
use crate::eq::{EqBand, EqCurve};

/// Manual EQ curve exposed to Python
#[pyclass(name = "EqCurve")]
#[derive(Clone, Default)]
pub struct PyEqCurve {
    curve: EqCurve,
}

#[pymethods]
impl PyEqCurve {
    /// Create a curve from (freq, gain) pairs, or the default 9 bands
    #[new]
    #[pyo3(signature = (bands=None))]
    fn new(bands: Option<Vec<(u32, f64)>>) -> Self {
        let curve = match bands {
            Some(bands) => EqCurve::from_bands(bands.into_iter().map(|(f, g)| EqBand::new(f, g))),
            None => EqCurve::default(),
        };
        Self { curve }
    }

    fn __len__(&self) -> usize {
        self.curve.len()
    }

    /// Get (freq, gain) of one band
    fn band(&self, index: usize) -> PyResult<(u32, f64)> {
        let band = self.curve.band(index).map_err(eq_err)?;
        Ok((band.freq_hz, band.gain_db))
    }

    /// Change a band's frequency
    ///
    /// Returns:
    ///     The band's index after re-sorting
    fn set_frequency(&mut self, index: usize, freq_hz: u32) -> PyResult<usize> {
        self.curve.set_frequency(index, freq_hz).map_err(eq_err)
    }

    /// Change a band's gain
    ///
    /// Returns:
    ///     The stored (clamped, rounded) gain
    fn set_gain(&mut self, index: usize, gain_db: f64) -> PyResult<f64> {
        self.curve.set_gain(index, gain_db).map_err(eq_err)
    }

    fn reset_gains(&mut self) {
        self.curve.reset_gains();
    }

    /// Bands as a list of {"freq": ..., "gain": ...} dicts
    fn to_list<'py>(&self, py: Python<'py>) -> PyResult<Vec<&'py PyDict>> {
        self.curve
            .bands()
            .iter()
            .map(|band| {
                let dict = PyDict::new(py);
                dict.set_item("freq", band.freq_hz)?;
                dict.set_item("gain", band.gain_db)?;
                Ok(dict)
            })
            .collect()
    }
}

//! PyO3 bindings for the PyQt front end

use pyo3::exceptions::{PyFileNotFoundError, PyIndexError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::audio::AudioError;
use crate::compare::CompareError;
use crate::eq::EqError;
use crate::settings::SettingsError;
use crate::spectrum::SpectrumError;

mod analysis_bindings;
mod eq_bindings;
mod settings_bindings;
mod spectrum_bindings;

/// Python module definition
#[pymodule]
fn free_the_quencies(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<spectrum_bindings::PySpectrumAnalyzer>()?;
    m.add_class::<spectrum_bindings::PyWindowType>()?;
    m.add_class::<eq_bindings::PyEqCurve>()?;

    m.add_function(wrap_pyfunction!(analysis_bindings::load_audio, m)?)?;
    m.add_function(wrap_pyfunction!(analysis_bindings::compare_arrays, m)?)?;
    m.add_function(wrap_pyfunction!(analysis_bindings::compare_files, m)?)?;
    m.add_function(wrap_pyfunction!(analysis_bindings::third_octave_centers, m)?)?;
    m.add_function(wrap_pyfunction!(settings_bindings::load_settings, m)?)?;
    m.add_function(wrap_pyfunction!(settings_bindings::save_settings, m)?)?;

    Ok(())
}

fn audio_err(e: AudioError) -> PyErr {
    match e {
        AudioError::NotFound(_) => PyFileNotFoundError::new_err(e.to_string()),
        _ => PyRuntimeError::new_err(e.to_string()),
    }
}

fn spectrum_err(e: SpectrumError) -> PyErr {
    match e {
        SpectrumError::Fft(_) => PyRuntimeError::new_err(e.to_string()),
        _ => PyValueError::new_err(e.to_string()),
    }
}

fn compare_err(e: CompareError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn eq_err(e: EqError) -> PyErr {
    PyIndexError::new_err(e.to_string())
}

fn settings_err(e: SettingsError) -> PyErr {
    PyRuntimeError::new_err(e.to_string())
}

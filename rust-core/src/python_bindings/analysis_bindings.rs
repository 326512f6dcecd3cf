//! Python bindings for loading and comparing tracks

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::{audio_err, compare_err};
use crate::audio::{load_audio as load_wav, LoaderConfig, DEFAULT_SAMPLE_RATE};
use crate::bands::THIRD_OCTAVE_CENTERS_HZ;
use crate::compare::{compare_tracks, CompareConfig, Comparison, DEFAULT_MATCH_THRESHOLD_DB};

fn comparison_to_dict<'py>(py: Python<'py>, comparison: Comparison) -> PyResult<&'py PyDict> {
    let matches = comparison.matches();
    let dict = PyDict::new(py);

    dict.set_item("labels", comparison.labels)?;
    dict.set_item("centers_hz", PyArray1::from_vec(py, comparison.centers_hz))?;
    dict.set_item("bands_a", PyArray1::from_vec(py, comparison.bands_a))?;
    dict.set_item("bands_b", PyArray1::from_vec(py, comparison.bands_b))?;
    dict.set_item("diff_db", PyArray1::from_vec(py, comparison.diff_db))?;
    dict.set_item("matches", matches)?;
    dict.set_item("rms_a", comparison.level.rms_a)?;
    dict.set_item("rms_b", comparison.level.rms_b)?;
    dict.set_item("target_rms", comparison.level.target_rms)?;
    dict.set_item("match_threshold_db", comparison.match_threshold_db)?;

    Ok(dict)
}

/// Load a WAV file as mono at the analysis rate
///
/// Returns:
///     Tuple of (samples, sample_rate)
#[pyfunction]
#[pyo3(signature = (path, sample_rate=DEFAULT_SAMPLE_RATE))]
pub fn load_audio<'py>(
    py: Python<'py>,
    path: &str,
    sample_rate: u32,
) -> PyResult<(&'py PyArray1<f64>, u32)> {
    let config = LoaderConfig {
        target_sample_rate: sample_rate,
    };
    let audio = py.allow_threads(|| load_wav(path, &config)).map_err(audio_err)?;
    Ok((PyArray1::from_vec(py, audio.samples), audio.sample_rate))
}

/// Compare two mono signals already at `sample_rate`
#[pyfunction]
#[pyo3(signature = (a, b, sample_rate=44100.0, threshold_db=DEFAULT_MATCH_THRESHOLD_DB))]
pub fn compare_arrays<'py>(
    py: Python<'py>,
    a: PyReadonlyArray1<f64>,
    b: PyReadonlyArray1<f64>,
    sample_rate: f64,
    threshold_db: f64,
) -> PyResult<&'py PyDict> {
    let config = CompareConfig {
        match_threshold_db: threshold_db,
        ..CompareConfig::default()
    };
    let comparison =
        compare_tracks(a.as_slice()?, b.as_slice()?, sample_rate, &config).map_err(compare_err)?;
    comparison_to_dict(py, comparison)
}

/// Load and compare two WAV files
#[pyfunction]
#[pyo3(signature = (path_a, path_b, threshold_db=DEFAULT_MATCH_THRESHOLD_DB))]
pub fn compare_files<'py>(
    py: Python<'py>,
    path_a: &str,
    path_b: &str,
    threshold_db: f64,
) -> PyResult<&'py PyDict> {
    let loader = LoaderConfig::default();
    let config = CompareConfig {
        match_threshold_db: threshold_db,
        ..CompareConfig::default()
    };

    let comparison = py.allow_threads(|| -> PyResult<Comparison> {
        let a = load_wav(path_a, &loader).map_err(audio_err)?;
        let b = load_wav(path_b, &loader).map_err(audio_err)?;
        compare_tracks(&a.samples, &b.samples, a.sample_rate as f64, &config).map_err(compare_err)
    })?;
    comparison_to_dict(py, comparison)
}

/// The 26 nominal third-octave centers
#[pyfunction]
pub fn third_octave_centers(py: Python<'_>) -> &PyArray1<f64> {
    PyArray1::from_vec(py, THIRD_OCTAVE_CENTERS_HZ.to_vec())
}

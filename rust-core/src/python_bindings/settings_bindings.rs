//! Python bindings for the settings file

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use super::settings_err;
use crate::settings::{default_settings_path, Settings};
use std::path::PathBuf;

fn resolve(path: Option<&str>) -> PathBuf {
    path.map(PathBuf::from).unwrap_or_else(default_settings_path)
}

/// Load settings as a dict; missing or broken files give an empty dict
#[pyfunction]
#[pyo3(signature = (path=None))]
pub fn load_settings(py: Python<'_>, path: Option<&str>) -> PyResult<PyObject> {
    let settings = Settings::load(resolve(path));
    let map = settings.to_map().map_err(settings_err)?;
    let text = serde_json::to_string(&map).map_err(|e| PyValueError::new_err(e.to_string()))?;
    let value = py.import("json")?.call_method1("loads", (text,))?;
    Ok(value.into())
}

/// Save a settings dict as pretty JSON
#[pyfunction]
#[pyo3(signature = (data, path=None))]
pub fn save_settings(py: Python<'_>, data: &PyAny, path: Option<&str>) -> PyResult<()> {
    let text: String = py.import("json")?.call_method1("dumps", (data,))?.extract()?;
    let map = match serde_json::from_str(&text) {
        Ok(serde_json::Value::Object(map)) => map,
        Ok(_) => return Err(PyValueError::new_err("settings must be a dict")),
        Err(e) => return Err(PyValueError::new_err(e.to_string())),
    };
    Settings::from_map(map).save(resolve(path)).map_err(settings_err)
}

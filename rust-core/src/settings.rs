//! Persisted settings: last used track paths and the manual EQ curve
//!
//! Stored as a pretty-printed JSON object. Keys this version does not know
//! about are preserved across load/save.

use crate::eq::EqBand;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SETTINGS_FILE_NAME: &str = "audio_compare_settings.json";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to write settings to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_path_a: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_path_b: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eq_bands: Option<Vec<EqBand>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Settings file in the current working directory
pub fn default_settings_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(SETTINGS_FILE_NAME)
}

impl Settings {
    /// Load settings, falling back to defaults on any problem
    ///
    /// A missing file is silent; an unreadable or malformed one is logged.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            debug!("no settings file at {}", path.display());
            return Self::default();
        }

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("could not read settings {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&text) {
            Ok(Value::Object(map)) => Self::from_map(map),
            Ok(_) => {
                warn!("ignoring settings {}: not a JSON object", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("ignoring malformed settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Build settings from a JSON object
    ///
    /// A known key whose value has the wrong shape stays in `extra`
    /// untouched, so it is written back as it was.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        let last_path_a = take_field(&mut map, "last_path_a");
        let last_path_b = take_field(&mut map, "last_path_b");
        let eq_bands = take_field(&mut map, "eq_bands");
        Self {
            last_path_a,
            last_path_b,
            eq_bands,
            extra: map,
        }
    }

    /// Flatten into one JSON object; set fields win over `extra`
    pub fn to_map(&self) -> Result<Map<String, Value>, SettingsError> {
        let known = Self {
            extra: Map::new(),
            ..self.clone()
        };
        let mut map = self.extra.clone();
        if let Value::Object(fields) = serde_json::to_value(known)? {
            map.extend(fields);
        }
        Ok(map)
    }

    /// Write settings as pretty JSON (two-space indent, UTF-8)
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(&self.to_map()?)?;
        fs::write(path, text).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("saved settings to {}", path.display());
        Ok(())
    }
}

fn take_field<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str) -> Option<T> {
    let value = map.remove(key)?;
    if value.is_null() {
        return None;
    }
    match T::deserialize(&value) {
        Ok(field) => Some(field),
        Err(e) => {
            warn!("keeping unrecognised settings value for '{key}': {e}");
            map.insert(key.to_string(), value);
            None
        }
    }
}

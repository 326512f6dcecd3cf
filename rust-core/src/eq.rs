//! Manual graphic EQ curve
//!
//! A small set of bands, each a center frequency and a gain. Bands are kept
//! sorted by frequency; gains are limited to ±12 dB in 0.1 dB steps, which
//! matches the slider (integer tenths) and spin box pairing of the GUI.

use crate::bands::BandLayout;
use crate::compare::Comparison;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_FREQ_HZ: u32 = 20;
pub const MAX_FREQ_HZ: u32 = 20_000;
pub const MIN_GAIN_DB: f64 = -12.0;
pub const MAX_GAIN_DB: f64 = 12.0;
pub const GAIN_STEP_DB: f64 = 0.1;

/// Default band frequencies of the 9-band EQ
pub const DEFAULT_BAND_FREQS_HZ: [u32; 9] = [65, 125, 250, 500, 1000, 2000, 4000, 8000, 16000];

#[derive(Error, Debug, PartialEq)]
pub enum EqError {
    #[error("EQ band index {index} out of range (curve has {len} bands)")]
    BandIndex { index: usize, len: usize },
}

/// One EQ band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EqBand {
    #[serde(rename = "freq")]
    pub freq_hz: u32,
    #[serde(rename = "gain")]
    pub gain_db: f64,
}

impl EqBand {
    /// Band with frequency and gain brought into range
    pub fn new(freq_hz: u32, gain_db: f64) -> Self {
        Self {
            freq_hz: clamp_frequency(freq_hz),
            gain_db: quantize_gain(gain_db),
        }
    }
}

pub fn clamp_frequency(hz: u32) -> u32 {
    hz.clamp(MIN_FREQ_HZ, MAX_FREQ_HZ)
}

/// Clamp to ±12 dB and round to the nearest 0.1 dB
pub fn quantize_gain(db: f64) -> f64 {
    if db.is_nan() {
        return 0.0;
    }
    let clamped = db.clamp(MIN_GAIN_DB, MAX_GAIN_DB);
    (clamped * 10.0).round() / 10.0
}

/// Slider position (integer tenths of a dB) for a gain
pub fn gain_to_slider(db: f64) -> i32 {
    (db * 10.0) as i32
}

/// Gain for a slider position
pub fn slider_to_gain(value: i32) -> f64 {
    value as f64 / 10.0
}

/// Ordered list of EQ bands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EqCurve {
    bands: Vec<EqBand>,
}

impl Default for EqCurve {
    fn default() -> Self {
        Self {
            bands: DEFAULT_BAND_FREQS_HZ
                .iter()
                .map(|&f| EqBand::new(f, 0.0))
                .collect(),
        }
    }
}

impl EqCurve {
    /// Build a curve from arbitrary bands, clamping and sorting them
    pub fn from_bands(bands: impl IntoIterator<Item = EqBand>) -> Self {
        let mut curve = Self {
            bands: bands
                .into_iter()
                .map(|b| EqBand::new(b.freq_hz, b.gain_db))
                .collect(),
        };
        curve.sort();
        curve
    }

    /// Suggest gains that move A towards B's band shape
    ///
    /// Each EQ band takes the difference of the nearest comparison band on
    /// a log-frequency scale. Band frequencies stay at the defaults.
    pub fn from_comparison(comparison: &Comparison) -> Self {
        let mut curve = Self::default();
        let layout = match BandLayout::from_centers(&comparison.centers_hz) {
            Ok(layout) => layout,
            Err(_) => return curve,
        };

        for band in curve.bands.iter_mut() {
            let idx = layout.nearest_band(band.freq_hz as f64);
            if let Some(&diff) = comparison.diff_db.get(idx) {
                band.gain_db = quantize_gain(diff);
            }
        }
        curve
    }

    pub fn bands(&self) -> &[EqBand] {
        &self.bands
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    pub fn band(&self, index: usize) -> Result<&EqBand, EqError> {
        let len = self.bands.len();
        self.bands.get(index).ok_or(EqError::BandIndex { index, len })
    }

    /// Change a band's frequency and re-sort
    ///
    /// # Returns
    /// The index the band ends up at after sorting
    pub fn set_frequency(&mut self, index: usize, hz: u32) -> Result<usize, EqError> {
        let len = self.bands.len();
        let band = self
            .bands
            .get_mut(index)
            .ok_or(EqError::BandIndex { index, len })?;
        band.freq_hz = clamp_frequency(hz);
        let moved = *band;

        self.sort();
        Ok(self
            .bands
            .iter()
            .position(|b| *b == moved)
            .unwrap_or(index))
    }

    /// Change a band's gain, clamped and rounded to 0.1 dB
    pub fn set_gain(&mut self, index: usize, db: f64) -> Result<f64, EqError> {
        let len = self.bands.len();
        let band = self
            .bands
            .get_mut(index)
            .ok_or(EqError::BandIndex { index, len })?;
        band.gain_db = quantize_gain(db);
        Ok(band.gain_db)
    }

    /// Set every gain back to 0 dB
    pub fn reset_gains(&mut self) {
        for band in self.bands.iter_mut() {
            band.gain_db = 0.0;
        }
    }

    fn sort(&mut self) {
        // Stable, so equal frequencies keep their relative order
        self.bands.sort_by_key(|b| b.freq_hz);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_curve() {
        let curve = EqCurve::default();
        assert_eq!(curve.len(), 9);
        assert_eq!(curve.bands()[0].freq_hz, 65);
        assert_eq!(curve.bands()[8].freq_hz, 16000);
        assert!(curve.bands().iter().all(|b| b.gain_db == 0.0));
    }

    #[test]
    fn test_set_frequency_resorts() {
        let mut curve = EqCurve::default();
        let new_index = curve.set_frequency(0, 3000).unwrap();

        assert_eq!(new_index, 5);
        let freqs: Vec<u32> = curve.bands().iter().map(|b| b.freq_hz).collect();
        assert_eq!(freqs, vec![125, 250, 500, 1000, 2000, 3000, 4000, 8000, 16000]);
    }

    #[test]
    fn test_frequency_clamped() {
        let mut curve = EqCurve::default();
        curve.set_frequency(8, 50_000).unwrap();
        assert_eq!(curve.bands()[8].freq_hz, MAX_FREQ_HZ);

        let idx = curve.set_frequency(4, 5).unwrap();
        assert_eq!(idx, 0);
        assert_eq!(curve.bands()[0].freq_hz, MIN_FREQ_HZ);
    }

    #[test]
    fn test_gain_clamped_and_rounded() {
        let mut curve = EqCurve::default();
        assert_eq!(curve.set_gain(2, 20.0).unwrap(), 12.0);
        assert_eq!(curve.set_gain(2, -13.0).unwrap(), -12.0);
        let g = curve.set_gain(2, 3.14159).unwrap();
        assert!((g - 3.1).abs() < 1e-9);
    }

    #[test]
    fn test_bad_index() {
        let mut curve = EqCurve::default();
        assert_eq!(
            curve.set_gain(9, 1.0),
            Err(EqError::BandIndex { index: 9, len: 9 })
        );
        assert!(curve.band(42).is_err());
    }

    #[test]
    fn test_slider_mapping() {
        assert_eq!(gain_to_slider(-12.0), -120);
        assert_eq!(gain_to_slider(3.5), 35);
        assert!((slider_to_gain(-35) + 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_json_shape() {
        let curve = EqCurve::from_bands([EqBand::new(1000, 1.5), EqBand::new(100, -2.0)]);
        let json = serde_json::to_string(&curve).unwrap();
        assert_eq!(json, r#"[{"freq":100,"gain":-2.0},{"freq":1000,"gain":1.5}]"#);

        let parsed: EqCurve = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, curve);
    }

    #[test]
    fn test_from_comparison() {
        use crate::bands::THIRD_OCTAVE_CENTERS_HZ;
        use crate::compare::LevelSummary;

        let centers = THIRD_OCTAVE_CENTERS_HZ.to_vec();
        let mut diff_db = vec![0.0; centers.len()];
        diff_db[1] = 4.26; // 63 Hz, nearest to 65
        diff_db[13] = -30.0; // 1 kHz

        let comparison = Comparison {
            labels: vec![String::new(); centers.len()],
            bands_a: vec![0.0; centers.len()],
            bands_b: vec![0.0; centers.len()],
            centers_hz: centers,
            diff_db,
            level: LevelSummary {
                rms_a: 0.1,
                rms_b: 0.1,
                target_rms: 0.1,
            },
            frames_a: 1,
            frames_b: 1,
            match_threshold_db: 0.5,
        };

        let curve = EqCurve::from_comparison(&comparison);
        assert!((curve.bands()[0].gain_db - 4.3).abs() < 1e-9);
        assert_eq!(curve.bands()[4].gain_db, -12.0);
        assert_eq!(curve.bands()[1].gain_db, 0.0);
    }
}

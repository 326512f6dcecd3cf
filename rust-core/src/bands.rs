//! One-third-octave band mapping
//!
//! Collapses a fine FFT spectrum onto the bands of a graphic equalizer.
//! Band edges sit at the geometric mean of neighbouring centers, and bins
//! are averaged in the power domain before converting back to dB.

use thiserror::Error;

/// Nominal one-third-octave centers from 50 Hz to 16 kHz
pub const THIRD_OCTAVE_CENTERS_HZ: [f64; 26] = [
    50.0, 63.0, 80.0, 100.0, 125.0, 160.0, 200.0, 250.0, 315.0, 400.0, 500.0, 630.0, 800.0,
    1000.0, 1250.0, 1600.0, 2000.0, 2500.0, 3150.0, 4000.0, 5000.0, 6300.0, 8000.0, 10000.0,
    12500.0, 16000.0,
];

/// Level reported for a band that contains no FFT bin
pub const EMPTY_BAND_DB: f64 = -120.0;

/// Offset added to band power before taking the log
const POWER_FLOOR: f64 = 1e-12;

#[derive(Error, Debug, PartialEq)]
pub enum BandError {
    #[error("Band layout needs at least two centers (got {0})")]
    TooFewCenters(usize),

    #[error("Band centers must be positive and strictly increasing (at index {0})")]
    UnorderedCenters(usize),

    #[error("Frequency axis has {freqs} entries but spectrum has {spectrum}")]
    LengthMismatch { freqs: usize, spectrum: usize },
}

/// A set of contiguous bands covering `[low, high)` each
#[derive(Debug, Clone, PartialEq)]
pub struct BandLayout {
    centers: Vec<f64>,
    lows: Vec<f64>,
    highs: Vec<f64>,
}

impl Default for BandLayout {
    fn default() -> Self {
        Self::third_octave()
    }
}

impl BandLayout {
    /// The standard 26-band layout
    pub fn third_octave() -> Self {
        Self::build(THIRD_OCTAVE_CENTERS_HZ.to_vec())
    }

    /// Build a layout from arbitrary centers
    pub fn from_centers(centers: &[f64]) -> Result<Self, BandError> {
        if centers.len() < 2 {
            return Err(BandError::TooFewCenters(centers.len()));
        }
        if let Some(i) = centers.iter().position(|&c| c <= 0.0 || !c.is_finite()) {
            return Err(BandError::UnorderedCenters(i));
        }
        if let Some(i) = centers.windows(2).position(|w| w[1] <= w[0]) {
            return Err(BandError::UnorderedCenters(i + 1));
        }
        Ok(Self::build(centers.to_vec()))
    }

    fn build(centers: Vec<f64>) -> Self {
        let n = centers.len();
        let edges: Vec<f64> = centers.windows(2).map(|w| (w[0] * w[1]).sqrt()).collect();

        let first_low = centers[0] / (centers[1] / centers[0]).sqrt();
        let last_high = centers[n - 1] * (centers[n - 1] / centers[n - 2]).sqrt();

        let mut lows = Vec::with_capacity(n);
        lows.push(first_low);
        lows.extend_from_slice(&edges);

        let mut highs = edges;
        highs.push(last_high);

        Self { centers, lows, highs }
    }

    pub fn centers(&self) -> &[f64] {
        &self.centers
    }

    pub fn lows(&self) -> &[f64] {
        &self.lows
    }

    pub fn highs(&self) -> &[f64] {
        &self.highs
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// Labels for every center, see [`format_band_label`]
    pub fn labels(&self) -> Vec<String> {
        self.centers.iter().map(|&c| format_band_label(c)).collect()
    }

    /// Map a dB spectrum onto the bands
    ///
    /// # Arguments
    /// * `freqs` - Bin frequencies in Hz
    /// * `spectrum_db` - Bin magnitudes in dB (20*log10)
    ///
    /// # Returns
    /// Band levels in dB (10*log10 of mean power), [`EMPTY_BAND_DB`] for empty bands
    pub fn spectrum_to_bands(&self, freqs: &[f64], spectrum_db: &[f64]) -> Result<Vec<f64>, BandError> {
        if freqs.len() != spectrum_db.len() {
            return Err(BandError::LengthMismatch {
                freqs: freqs.len(),
                spectrum: spectrum_db.len(),
            });
        }

        let power: Vec<f64> = spectrum_db
            .iter()
            .map(|&db| {
                let mag = 10f64.powf(db / 20.0);
                mag * mag
            })
            .collect();

        let bands = self
            .lows
            .iter()
            .zip(self.highs.iter())
            .map(|(&lo, &hi)| {
                let (sum, count) = freqs
                    .iter()
                    .zip(power.iter())
                    .filter(|&(&f, _)| f >= lo && f < hi)
                    .fold((0.0, 0usize), |(sum, count), (_, &p)| (sum + p, count + 1));

                if count == 0 {
                    EMPTY_BAND_DB
                } else {
                    10.0 * (sum / count as f64 + POWER_FLOOR).log10()
                }
            })
            .collect();

        Ok(bands)
    }

    /// Index of the band whose center is nearest to `hz` on a log scale
    pub fn nearest_band(&self, hz: f64) -> usize {
        let target = hz.max(f64::MIN_POSITIVE).ln();
        self.centers
            .iter()
            .enumerate()
            .map(|(i, &c)| (i, (c.ln() - target).abs()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

/// Shift band levels so the loudest band sits at 0 dB
pub fn normalize_to_peak(bands: &[f64]) -> Vec<f64> {
    let peak = bands.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !peak.is_finite() {
        return bands.to_vec();
    }
    bands.iter().map(|&b| b - peak).collect()
}

/// Graphic-EQ style label: "50", "630", "1k", "1.6k", "12.5k"
pub fn format_band_label(hz: f64) -> String {
    if hz >= 1000.0 {
        if hz % 1000.0 == 0.0 {
            format!("{}k", (hz / 1000.0) as i64)
        } else {
            format!("{:.1}k", hz / 1000.0)
        }
    } else {
        format!("{}", hz as i64)
    }
}

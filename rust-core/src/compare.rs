//! A/B track comparison
//!
//! Level-match two tracks, average their spectra, collapse them onto
//! graphic-EQ bands and compare the band shapes.

use crate::audio::level::{gain_to_db, match_levels};
use crate::bands::{normalize_to_peak, BandError, BandLayout, THIRD_OCTAVE_CENTERS_HZ};
use crate::spectrum::{AnalyzerConfig, SpectrumAnalyzer, SpectrumError};
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default tolerance for a band to count as matching
pub const DEFAULT_MATCH_THRESHOLD_DB: f64 = 0.5;

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("Spectrum analysis of track {track} failed: {source}")]
    Spectrum {
        track: char,
        #[source]
        source: SpectrumError,
    },

    #[error(transparent)]
    Analyzer(#[from] SpectrumError),

    #[error(transparent)]
    Bands(#[from] BandError),

    #[error("Match threshold must be a non-negative number (got {0})")]
    InvalidThreshold(f64),
}

/// Comparison configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareConfig {
    pub analyzer: AnalyzerConfig,
    pub centers_hz: Vec<f64>,
    pub match_threshold_db: f64,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            analyzer: AnalyzerConfig::default(),
            centers_hz: THIRD_OCTAVE_CENTERS_HZ.to_vec(),
            match_threshold_db: DEFAULT_MATCH_THRESHOLD_DB,
        }
    }
}

/// RMS levels before matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub rms_a: f64,
    pub rms_b: f64,
    pub target_rms: f64,
}

/// Per-band comparison of two tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub centers_hz: Vec<f64>,
    pub labels: Vec<String>,
    /// Track A band levels, peak at 0 dB
    pub bands_a: Vec<f64>,
    /// Track B band levels, peak at 0 dB
    pub bands_b: Vec<f64>,
    /// B minus A per band
    pub diff_db: Vec<f64>,
    pub level: LevelSummary,
    pub frames_a: usize,
    pub frames_b: usize,
    pub match_threshold_db: f64,
}

impl Comparison {
    /// Whether each band matches within the threshold
    pub fn matches(&self) -> Vec<bool> {
        self.diff_db
            .iter()
            .map(|d| d.abs() <= self.match_threshold_db)
            .collect()
    }

    pub fn match_count(&self) -> usize {
        self.matches().iter().filter(|&&m| m).count()
    }

    /// Band index and difference of the largest absolute deviation
    pub fn largest_deviation(&self) -> Option<(usize, f64)> {
        self.diff_db
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
    }

    pub fn len(&self) -> usize {
        self.centers_hz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers_hz.is_empty()
    }
}

/// Compare two mono tracks sampled at `sample_rate`
pub fn compare_tracks(
    a: &[f64],
    b: &[f64],
    sample_rate: f64,
    config: &CompareConfig,
) -> Result<Comparison, CompareError> {
    let threshold = config.match_threshold_db;
    if threshold.is_nan() || threshold < 0.0 {
        return Err(CompareError::InvalidThreshold(threshold));
    }

    let layout = BandLayout::from_centers(&config.centers_hz)?;
    let mut analyzer = SpectrumAnalyzer::new(AnalyzerConfig {
        sample_rate,
        ..config.analyzer.clone()
    })?;

    let levels = match_levels(a, b);
    info!(
        "RMS matched: A {:.4} / B {:.4} -> {:.4} (A {:+.1} dB, B {:+.1} dB)",
        levels.rms_a,
        levels.rms_b,
        levels.target_rms,
        gain_to_db(levels.gain_a),
        gain_to_db(levels.gain_b)
    );

    let spec_a = analyzer
        .averaged_spectrum(&levels.a)
        .map_err(|source| CompareError::Spectrum { track: 'A', source })?;
    let spec_b = analyzer
        .averaged_spectrum(&levels.b)
        .map_err(|source| CompareError::Spectrum { track: 'B', source })?;

    let bands_a = normalize_to_peak(&layout.spectrum_to_bands(&spec_a.frequencies_hz, &spec_a.magnitude_db)?);
    let bands_b = normalize_to_peak(&layout.spectrum_to_bands(&spec_b.frequencies_hz, &spec_b.magnitude_db)?);

    let diff_db = bands_a
        .iter()
        .zip(bands_b.iter())
        .map(|(&da, &db)| db - da)
        .collect();

    let comparison = Comparison {
        centers_hz: layout.centers().to_vec(),
        labels: layout.labels(),
        bands_a,
        bands_b,
        diff_db,
        level: LevelSummary {
            rms_a: levels.rms_a,
            rms_b: levels.rms_b,
            target_rms: levels.target_rms,
        },
        frames_a: spec_a.frames,
        frames_b: spec_b.frames,
        match_threshold_db: threshold,
    };

    info!(
        "compared {} bands, {} within ±{} dB",
        comparison.len(),
        comparison.match_count(),
        threshold
    );
    Ok(comparison)
}

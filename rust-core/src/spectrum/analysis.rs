//! Long-term averaged spectrum
//!
//! Slides a windowed FFT across a whole track and averages the magnitudes,
//! giving the track's overall tonal balance rather than a momentary snapshot.

use super::fft::FftEngine;
use super::windowing::{apply_window_inplace, generate_periodic_window, WindowType};
use super::SpectrumError;
use log::debug;
use serde::{Deserialize, Serialize};

/// Offset added to magnitudes before taking the log
pub const MAGNITUDE_FLOOR: f64 = 1e-9;

/// Spectrum analyzer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// FFT size (number of samples per frame)
    pub fft_size: usize,

    /// Distance between frame starts in samples
    pub hop_size: usize,

    /// Window type for spectral analysis
    pub window_type: WindowType,

    /// Sample rate in Hz
    pub sample_rate: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fft_size: 4096,
            hop_size: 2048,
            window_type: WindowType::Hann,
            sample_rate: 44100.0,
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<(), SpectrumError> {
        if self.fft_size < 2 || self.fft_size % 2 != 0 {
            return Err(SpectrumError::InvalidConfig(format!(
                "fft_size must be even and at least 2 (got {})",
                self.fft_size
            )));
        }
        if self.hop_size == 0 {
            return Err(SpectrumError::InvalidConfig(
                "hop_size must be at least 1".to_string(),
            ));
        }
        if self.sample_rate.is_nan() || self.sample_rate <= 0.0 {
            return Err(SpectrumError::InvalidConfig(format!(
                "sample_rate must be positive (got {})",
                self.sample_rate
            )));
        }
        Ok(())
    }

    /// Number of frames a signal of `len` samples produces
    ///
    /// Frames start at 0, hop, 2*hop, ... while start < len - fft_size,
    /// so a signal of exactly one FFT length yields no frame.
    pub fn frame_count(&self, len: usize) -> usize {
        if len <= self.fft_size || self.hop_size == 0 {
            return 0;
        }
        (len - self.fft_size - 1) / self.hop_size + 1
    }
}

/// Averaged magnitude spectrum of a whole signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AveragedSpectrum {
    /// Bin center frequencies in Hz
    pub frequencies_hz: Vec<f64>,

    /// Mean magnitude per bin in dB (20*log10)
    pub magnitude_db: Vec<f64>,

    /// Number of frames that were averaged
    pub frames: usize,
}

/// Averaging spectrum analyzer
pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,
    fft_engine: FftEngine,
    window: Vec<f64>,
}

impl SpectrumAnalyzer {
    /// Create new spectrum analyzer
    pub fn new(config: AnalyzerConfig) -> Result<Self, SpectrumError> {
        config.validate()?;
        let fft_engine = FftEngine::new(config.fft_size);
        let window = generate_periodic_window(config.window_type, config.fft_size);

        Ok(Self {
            config,
            fft_engine,
            window,
        })
    }

    /// Compute the frame-averaged spectrum of `signal`
    pub fn averaged_spectrum(&mut self, signal: &[f64]) -> Result<AveragedSpectrum, SpectrumError> {
        let fft_size = self.config.fft_size;
        let frames = self.config.frame_count(signal.len());
        if frames == 0 {
            return Err(SpectrumError::SignalTooShort {
                len: signal.len(),
                fft_size,
            });
        }

        let num_bins = self.fft_engine.num_bins();
        let mut sum = vec![0.0; num_bins];
        let mut frame = vec![0.0; fft_size];
        let mut magnitude = vec![0.0; num_bins];

        for index in 0..frames {
            let start = index * self.config.hop_size;
            frame.copy_from_slice(&signal[start..start + fft_size]);
            apply_window_inplace(&mut frame, &self.window);
            self.fft_engine.magnitude_into(&frame, &mut magnitude)?;
            for (acc, &m) in sum.iter_mut().zip(magnitude.iter()) {
                *acc += m;
            }
        }

        let magnitude_db = sum
            .iter()
            .map(|&s| 20.0 * (s / frames as f64 + MAGNITUDE_FLOOR).log10())
            .collect();

        debug!(
            "averaged {} frames of {} samples (hop {})",
            frames, fft_size, self.config.hop_size
        );

        Ok(AveragedSpectrum {
            frequencies_hz: self.fft_engine.frequencies_hz(self.config.sample_rate),
            magnitude_db,
            frames,
        })
    }

    /// Get frequency bins in Hz
    pub fn frequency_bins_hz(&self) -> Vec<f64> {
        self.fft_engine.frequencies_hz(self.config.sample_rate)
    }

    /// Update configuration
    pub fn update_config(&mut self, config: AnalyzerConfig) -> Result<(), SpectrumError> {
        config.validate()?;

        if config.fft_size != self.config.fft_size {
            self.fft_engine = FftEngine::new(config.fft_size);
        }
        if config.fft_size != self.config.fft_size || config.window_type != self.config.window_type {
            self.window = generate_periodic_window(config.window_type, config.fft_size);
        }

        self.config = config;
        Ok(())
    }

    /// Get current configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Get number of frequency bins
    pub fn num_bins(&self) -> usize {
        self.fft_engine.num_bins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq_hz: f64, sample_rate: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|n| (2.0 * PI * freq_hz * n as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_frame_count() {
        let config = AnalyzerConfig::default();

        assert_eq!(config.frame_count(0), 0);
        assert_eq!(config.frame_count(4096), 0);
        assert_eq!(config.frame_count(4097), 1);
        // starts 0 and 2048 are both < 6145 - 4096
        assert_eq!(config.frame_count(6145), 2);
        assert_eq!(config.frame_count(6144), 1);
    }

    #[test]
    fn test_signal_too_short() {
        let mut analyzer = SpectrumAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let err = analyzer.averaged_spectrum(&[0.0; 4096]).unwrap_err();
        assert!(matches!(
            err,
            SpectrumError::SignalTooShort { len: 4096, fft_size: 4096 }
        ));
    }

    #[test]
    fn test_invalid_config() {
        let config = AnalyzerConfig {
            fft_size: 1023,
            ..AnalyzerConfig::default()
        };
        assert!(SpectrumAnalyzer::new(config).is_err());

        let config = AnalyzerConfig {
            hop_size: 0,
            ..AnalyzerConfig::default()
        };
        assert!(SpectrumAnalyzer::new(config).is_err());
    }

    #[test]
    fn test_peak_at_tone_frequency() {
        let mut analyzer = SpectrumAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let signal = sine(1000.0, 44100.0, 44100);

        let spectrum = analyzer.averaged_spectrum(&signal).unwrap();
        assert_eq!(spectrum.frequencies_hz.len(), 2049);
        assert_eq!(spectrum.magnitude_db.len(), 2049);
        assert_eq!(spectrum.frames, 20);

        let (peak_idx, _) = spectrum
            .magnitude_db
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap();
        let bin_width = 44100.0 / 4096.0;
        assert!((spectrum.frequencies_hz[peak_idx] - 1000.0).abs() < bin_width);
    }

    #[test]
    fn test_silence_hits_floor() {
        let mut analyzer = SpectrumAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let spectrum = analyzer.averaged_spectrum(&vec![0.0; 10_000]).unwrap();
        assert!(spectrum.magnitude_db.iter().all(|&db| (db + 180.0).abs() < 1e-9));
    }

    #[test]
    fn test_update_config_changes_resolution() {
        let mut analyzer = SpectrumAnalyzer::new(AnalyzerConfig::default()).unwrap();
        analyzer
            .update_config(AnalyzerConfig {
                fft_size: 1024,
                hop_size: 512,
                ..AnalyzerConfig::default()
            })
            .unwrap();
        assert_eq!(analyzer.num_bins(), 513);
        assert_eq!(analyzer.frequency_bins_hz().len(), 513);
    }
}

//! Audio file loading
//!
//! Decodes WAV files with hound, downmixes to mono and resamples to the
//! analysis rate with rubato.

use hound::{SampleFormat, WavReader};
use log::{debug, info};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Sample rate every track is converted to before analysis
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Input frames handed to the resampler per call
const RESAMPLE_CHUNK: usize = 1024;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Path not found or not a file: {0}")]
    NotFound(PathBuf),

    #[error("File exists but could not be decoded as audio: {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Unsupported audio format: {0}")]
    InvalidFormat(String),

    #[error("Resampling failed: {0}")]
    Resample(String),
}

/// Loader configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Rate the decoded audio is resampled to
    pub target_sample_rate: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

/// Decoded mono track ready for analysis
#[derive(Debug, Clone)]
pub struct LoadedAudio {
    pub path: PathBuf,
    pub samples: Vec<f64>,
    pub sample_rate: u32,
    pub source_sample_rate: u32,
    pub source_channels: u16,
}

impl LoadedAudio {
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Load an audio file as mono at the configured sample rate
pub fn load_audio(path: impl AsRef<Path>, config: &LoaderConfig) -> Result<LoadedAudio, AudioError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(AudioError::NotFound(path.to_path_buf()));
    }

    let reader = WavReader::open(path).map_err(|e| AudioError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let loaded = decode(reader, path, config)?;

    info!(
        "loaded {} ({} ch @ {} Hz -> mono @ {} Hz, {:.2} s)",
        path.display(),
        loaded.source_channels,
        loaded.source_sample_rate,
        loaded.sample_rate,
        loaded.duration_secs()
    );
    Ok(loaded)
}

fn decode<R: Read>(
    reader: WavReader<R>,
    path: &Path,
    config: &LoaderConfig,
) -> Result<LoadedAudio, AudioError> {
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(AudioError::InvalidFormat("zero channels".to_string()));
    }
    if spec.sample_rate == 0 || config.target_sample_rate == 0 {
        return Err(AudioError::InvalidFormat("zero sample rate".to_string()));
    }

    let decode_err = |e: hound::Error| AudioError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let interleaved: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>()
            .map_err(decode_err)?,
        SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(AudioError::InvalidFormat(format!(
                    "{} bits per sample",
                    spec.bits_per_sample
                )));
            }
            let scale = (1u64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f64 / scale))
                .collect::<Result<_, _>>()
                .map_err(decode_err)?
        }
    };

    debug!(
        "decoded {} interleaved samples ({:?}, {} bit)",
        interleaved.len(),
        spec.sample_format,
        spec.bits_per_sample
    );

    let mono = downmix(&interleaved, spec.channels);
    let samples = resample(&mono, spec.sample_rate, config.target_sample_rate)?;

    Ok(LoadedAudio {
        path: path.to_path_buf(),
        samples,
        sample_rate: config.target_sample_rate,
        source_sample_rate: spec.sample_rate,
        source_channels: spec.channels,
    })
}

/// Average interleaved channels into a single mono channel
///
/// A trailing partial frame is dropped.
pub fn downmix(interleaved: &[f64], channels: u16) -> Vec<f64> {
    let channels = channels as usize;
    match channels {
        0 => Vec::new(),
        1 => interleaved.to_vec(),
        _ => interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f64>() / channels as f64)
            .collect(),
    }
}

/// Resample a mono signal from `from_hz` to `to_hz`
///
/// Output length is `round(len * to_hz / from_hz)`.
pub fn resample(samples: &[f64], from_hz: u32, to_hz: u32) -> Result<Vec<f64>, AudioError> {
    if from_hz == to_hz || samples.is_empty() {
        return Ok(samples.to_vec());
    }
    if from_hz == 0 || to_hz == 0 {
        return Err(AudioError::InvalidFormat("zero sample rate".to_string()));
    }

    let ratio = to_hz as f64 / from_hz as f64;
    let expected_len = (samples.len() as f64 * ratio).round() as usize;

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f64>::new(ratio, 1.0, params, RESAMPLE_CHUNK, 1)
        .map_err(|e| AudioError::Resample(e.to_string()))?;

    // Skip the filter delay so the output lines up with the input
    let delay = resampler.output_delay();
    let mut output = Vec::with_capacity(expected_len + delay + RESAMPLE_CHUNK);

    let mut position = 0;
    while samples.len() - position >= resampler.input_frames_next() {
        let needed = resampler.input_frames_next();
        let chunk = [&samples[position..position + needed]];
        let out = resampler
            .process(&chunk, None)
            .map_err(|e| AudioError::Resample(e.to_string()))?;
        output.extend_from_slice(&out[0]);
        position += needed;
    }

    if position < samples.len() {
        let tail = [&samples[position..]];
        let out = resampler
            .process_partial(Some(&tail[..]), None)
            .map_err(|e| AudioError::Resample(e.to_string()))?;
        output.extend_from_slice(&out[0]);
    }

    // Flush the remaining delay line
    while output.len() < expected_len + delay {
        let out = resampler
            .process_partial::<&[f64]>(None, None)
            .map_err(|e| AudioError::Resample(e.to_string()))?;
        if out[0].is_empty() {
            break;
        }
        output.extend_from_slice(&out[0]);
    }

    let start = delay.min(output.len());
    let mut resampled = output.split_off(start);
    resampled.resize(expected_len, 0.0);

    debug!(
        "resampled {} -> {} samples ({} Hz -> {} Hz)",
        samples.len(),
        resampled.len(),
        from_hz,
        to_hz
    );
    Ok(resampled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_downmix_stereo() {
        let interleaved = vec![1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        assert_eq!(downmix(&interleaved, 2), vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_downmix_drops_partial_frame() {
        let interleaved = vec![1.0, 1.0, 1.0, 0.3, 0.3];
        assert_eq!(downmix(&interleaved, 3), vec![1.0]);
    }

    #[test]
    fn test_downmix_mono_passthrough() {
        let samples = vec![0.1, -0.2, 0.3];
        assert_eq!(downmix(&samples, 1), samples);
    }

    #[test]
    fn test_resample_same_rate_is_identity() {
        let samples = vec![0.25; 300];
        assert_eq!(resample(&samples, 44100, 44100).unwrap(), samples);
    }

    #[test]
    fn test_resample_length() {
        let samples = vec![0.0; 48000];
        let out = resample(&samples, 48000, 44100).unwrap();
        assert_eq!(out.len(), 44100);

        let samples = vec![0.0; 1000];
        let out = resample(&samples, 22050, 44100).unwrap();
        assert_eq!(out.len(), 2000);
    }

    #[test]
    fn test_resample_preserves_tone_level() {
        let samples: Vec<f64> = (0..48000)
            .map(|n| (2.0 * PI * 440.0 * n as f64 / 48000.0).sin())
            .collect();
        let out = resample(&samples, 48000, 44100).unwrap();

        // Ignore the edges where the sinc filter ramps
        let middle = &out[4000..40000];
        let rms = (middle.iter().map(|x| x * x).sum::<f64>() / middle.len() as f64).sqrt();
        assert!((rms - std::f64::consts::FRAC_1_SQRT_2).abs() < 0.02);
    }

    #[test]
    fn test_missing_file() {
        let err = load_audio("/definitely/not/here.wav", &LoaderConfig::default()).unwrap_err();
        assert!(matches!(err, AudioError::NotFound(_)));
    }
}

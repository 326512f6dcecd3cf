//! End-to-end: write WAV fixtures with hound, load them, compare them

use free_the_quencies::audio::{load_audio, rms, AudioError, LoaderConfig};
use free_the_quencies::compare::{compare_tracks, CompareConfig};
use free_the_quencies::eq::EqCurve;
use free_the_quencies::settings::Settings;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::f64::consts::PI;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("ftq-it-{}-{}", std::process::id(), name))
}

/// Write `seconds` of a sine at `freq` as 16-bit PCM
fn write_tone_i16(name: &str, freq: f64, amp: f64, sample_rate: u32, channels: u16, seconds: f64) -> PathBuf {
    let path = fixture_path(name);
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&path, spec).unwrap();
    let frames = (seconds * sample_rate as f64) as usize;
    for n in 0..frames {
        let value = amp * (2.0 * PI * freq * n as f64 / sample_rate as f64).sin();
        let sample = (value * i16::MAX as f64) as i16;
        for _ in 0..channels {
            writer.write_sample(sample).unwrap();
        }
    }
    writer.finalize().unwrap();
    path
}

/// Write a two-tone mix as 32-bit float
fn write_mix_f32(name: &str, tones: &[(f64, f64)], sample_rate: u32, seconds: f64) -> PathBuf {
    let path = fixture_path(name);
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(&path, spec).unwrap();
    let frames = (seconds * sample_rate as f64) as usize;
    for n in 0..frames {
        let t = n as f64 / sample_rate as f64;
        let value: f64 = tones.iter().map(|&(f, a)| a * (2.0 * PI * f * t).sin()).sum();
        writer.write_sample(value as f32).unwrap();
    }
    writer.finalize().unwrap();
    path
}

#[test]
fn loads_stereo_pcm_as_mono() {
    let path = write_tone_i16("stereo.wav", 440.0, 0.5, 44100, 2, 0.5);
    let audio = load_audio(&path, &LoaderConfig::default()).unwrap();

    assert_eq!(audio.source_channels, 2);
    assert_eq!(audio.sample_rate, 44100);
    assert_eq!(audio.samples.len(), 22050);
    // Sine of amplitude 0.5 has RMS 0.5/sqrt(2)
    assert!((rms(&audio.samples) - 0.5 / 2f64.sqrt()).abs() < 1e-3);
    assert!((audio.duration_secs() - 0.5).abs() < 1e-9);

    std::fs::remove_file(path).unwrap();
}

#[test]
fn resamples_to_analysis_rate() {
    let path = write_tone_i16("48k.wav", 1000.0, 0.5, 48000, 1, 1.0);
    let audio = load_audio(&path, &LoaderConfig::default()).unwrap();

    assert_eq!(audio.source_sample_rate, 48000);
    assert_eq!(audio.sample_rate, 44100);
    assert_eq!(audio.samples.len(), 44100);

    std::fs::remove_file(path).unwrap();
}

#[test]
fn rejects_non_wav_file() {
    let path = fixture_path("not-audio.wav");
    std::fs::write(&path, b"definitely not RIFF").unwrap();

    let err = load_audio(&path, &LoaderConfig::default()).unwrap_err();
    assert!(matches!(err, AudioError::Decode { .. }));

    std::fs::remove_file(path).unwrap();
}

#[test]
fn compares_files_and_suggests_eq() {
    // A: balanced lows and highs. B: the same with the 4 kHz tone 12 dB down
    let a_path = write_mix_f32("mix-a.wav", &[(125.0, 0.4), (4000.0, 0.4)], 44100, 2.0);
    let b_path = write_mix_f32("mix-b.wav", &[(125.0, 0.4), (4000.0, 0.1)], 44100, 2.0);

    let loader = LoaderConfig::default();
    let a = load_audio(&a_path, &loader).unwrap();
    let b = load_audio(&b_path, &loader).unwrap();

    let comparison = compare_tracks(&a.samples, &b.samples, 44100.0, &CompareConfig::default()).unwrap();

    // 125 Hz band is the peak of both
    assert!(comparison.bands_a[4].abs() < 0.1);
    assert!(comparison.bands_b[4].abs() < 0.1);
    assert!(comparison.matches()[4]);

    // 4 kHz band: B is 12 dB lower than A
    assert!((comparison.diff_db[19] + 12.04).abs() < 0.5);
    assert!(!comparison.matches()[19]);

    let curve = EqCurve::from_comparison(&comparison);
    let band_4k = curve.bands().iter().find(|b| b.freq_hz == 4000).unwrap();
    assert!((band_4k.gain_db + 12.0).abs() < 0.5);

    std::fs::remove_file(a_path).unwrap();
    std::fs::remove_file(b_path).unwrap();
}

#[test]
fn settings_keep_eq_curve() {
    let path = fixture_path("settings.json");
    let settings = Settings {
        last_path_a: Some("a.wav".to_string()),
        eq_bands: Some(EqCurve::default().bands().to_vec()),
        ..Settings::default()
    };
    settings.save(&path).unwrap();

    let loaded = Settings::load(&path);
    assert_eq!(loaded.eq_bands.map(|b| b.len()), Some(9));

    std::fs::remove_file(path).unwrap();
}

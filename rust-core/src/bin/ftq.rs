//! Command-line front end: compare two tracks on graphic-EQ bands

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use free_the_quencies::audio::{load_audio, LoaderConfig};
use free_the_quencies::bands::BandLayout;
use free_the_quencies::compare::{compare_tracks, CompareConfig, DEFAULT_MATCH_THRESHOLD_DB};
use free_the_quencies::eq::EqCurve;
use free_the_quencies::render::{render_comparison, render_eq_curve, RenderOptions};
use free_the_quencies::session::{normalize_path_input, Prompter, WavLoader};
use free_the_quencies::settings::{default_settings_path, Settings, SettingsError};
use free_the_quencies::spectrum::{AnalyzerConfig, WindowType};
use log::info;
use std::io;
use std::path::{Path, PathBuf};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "ftq")]
#[command(about = "Compare the tonal balance of two tracks on graphic-EQ bands", long_about = None)]
struct Args {
    /// Settings file (defaults to ./audio_compare_settings.json)
    #[arg(long, global = true, value_name = "PATH")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare track A against reference track B
    Compare {
        /// Track A (falls back to the last used path)
        track_a: Option<String>,

        /// Track B (falls back to the last used path)
        track_b: Option<String>,

        /// Print the comparison as JSON instead of charts
        #[arg(long)]
        json: bool,

        /// Bands within this many dB count as matching
        #[arg(long, value_name = "DB", default_value_t = DEFAULT_MATCH_THRESHOLD_DB)]
        threshold: f64,

        /// FFT frame size in samples
        #[arg(long, value_name = "N", default_value_t = 4096)]
        fft_size: usize,

        /// Distance between frames in samples
        #[arg(long, value_name = "N", default_value_t = 2048)]
        hop: usize,

        /// Analysis window: hann, hamming, blackman, rectangular
        #[arg(long, value_name = "NAME", default_value = "hann")]
        window: String,

        /// Also print EQ gains that would move A towards B
        #[arg(long)]
        suggest_eq: bool,

        /// Do not remember the paths in the settings file
        #[arg(long)]
        no_save: bool,
    },

    /// Prompt for tracks on the terminal and compare repeatedly
    Interactive,

    /// Print the third-octave band layout
    Bands,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings_path = args.settings.unwrap_or_else(default_settings_path);

    match args.command {
        Command::Compare {
            track_a,
            track_b,
            json,
            threshold,
            fft_size,
            hop,
            window,
            suggest_eq,
            no_save,
        } => {
            let window_type = WindowType::from_name(&window)
                .with_context(|| format!("unknown window '{window}'"))?;
            let config = CompareConfig {
                analyzer: AnalyzerConfig {
                    fft_size,
                    hop_size: hop,
                    window_type,
                    ..AnalyzerConfig::default()
                },
                match_threshold_db: threshold,
                ..CompareConfig::default()
            };

            let mut settings = Settings::load(&settings_path);
            let path_a = resolve_track(track_a, settings.last_path_a.as_deref(), 'A')?;
            let path_b = resolve_track(track_b, settings.last_path_b.as_deref(), 'B')?;

            let loader = LoaderConfig::default();
            let audio_a = load_audio(&path_a, &loader)
                .with_context(|| format!("loading track A ({path_a})"))?;
            let audio_b = load_audio(&path_b, &loader)
                .with_context(|| format!("loading track B ({path_b})"))?;

            persist(&mut settings, &settings_path, no_save, |s| {
                s.last_path_a = Some(path_a.clone());
                s.last_path_b = Some(path_b.clone());
            })
            .context("saving last used paths")?;

            let comparison = compare_tracks(
                &audio_a.samples,
                &audio_b.samples,
                audio_a.sample_rate as f64,
                &config,
            )
            .context("comparing tracks")?;

            let suggestion = suggest_eq.then(|| EqCurve::from_comparison(&comparison));

            if json {
                let output = serde_json::json!({
                    "comparison": comparison,
                    "suggested_eq": suggestion,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print!("{}", render_comparison(&comparison, &RenderOptions::default()));
                if let Some(curve) = &suggestion {
                    println!("\nSuggested EQ for track A:");
                    print!("{}", render_eq_curve(curve));
                }
            }

            if let Some(curve) = &suggestion {
                let stored = persist(&mut settings, &settings_path, no_save, |s| {
                    s.eq_bands = Some(curve.bands().to_vec());
                })
                .context("saving suggested EQ")?;
                if stored {
                    info!("stored suggested EQ in {}", settings_path.display());
                }
            }
        }

        Command::Interactive => {
            let stdin = io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), io::stdout());
            prompter.run_session(
                &settings_path,
                &WavLoader::default(),
                &CompareConfig::default(),
                &RenderOptions::default(),
            )?;
        }

        Command::Bands => {
            let layout = BandLayout::third_octave();
            println!("{:>8} {:>10} {:>10} {:>6}", "center", "low", "high", "label");
            for (((center, low), high), label) in layout
                .centers()
                .iter()
                .zip(layout.lows())
                .zip(layout.highs())
                .zip(layout.labels())
            {
                println!("{center:>8.0} {low:>10.1} {high:>10.1} {label:>6}");
            }
        }
    }

    Ok(())
}

/// Pick the explicit path, else the remembered one
fn resolve_track(explicit: Option<String>, remembered: Option<&str>, track: char) -> Result<String> {
    let chosen = explicit
        .map(|p| normalize_path_input(&p))
        .filter(|p| !p.is_empty())
        .or_else(|| remembered.map(normalize_path_input).filter(|p| !p.is_empty()));

    match chosen {
        Some(path) => Ok(path),
        None => bail!("no path given for track {track} and none remembered"),
    }
}

/// Apply `update` and write the settings, unless `--no-save` was given
fn persist(
    settings: &mut Settings,
    path: &Path,
    no_save: bool,
    update: impl FnOnce(&mut Settings),
) -> Result<bool, SettingsError> {
    if no_save {
        return Ok(false);
    }
    update(settings);
    settings.save(path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use free_the_quencies::eq::EqBand;

    fn temp_settings(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("ftq-cli-{}-{}.json", name, std::process::id()));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = resolve_track(Some("new.wav".to_string()), Some("old.wav"), 'A').unwrap();
        assert_eq!(path, "new.wav");
    }

    #[test]
    fn test_quoted_path_is_stripped() {
        let path = resolve_track(Some("\"C:\\mix\\a.wav\"".to_string()), None, 'A').unwrap();
        assert_eq!(path, "C:\\mix\\a.wav");
    }

    #[test]
    fn test_falls_back_to_remembered_path() {
        assert_eq!(resolve_track(None, Some("old.wav"), 'B').unwrap(), "old.wav");
        // An empty or bare-quote argument counts as missing
        assert_eq!(resolve_track(Some("''".to_string()), Some("'old.wav'"), 'B').unwrap(), "old.wav");
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let err = resolve_track(None, None, 'B').unwrap_err();
        assert!(err.to_string().contains("track B"));
        assert!(resolve_track(Some("  ".to_string()), Some(""), 'A').is_err());
    }

    #[test]
    fn test_persist_writes_update() {
        let path = temp_settings("persist");
        let mut settings = Settings::default();

        let stored = persist(&mut settings, &path, false, |s| {
            s.last_path_a = Some("a.wav".to_string());
            s.eq_bands = Some(vec![EqBand::new(4000, -12.0)]);
        })
        .unwrap();

        assert!(stored);
        let loaded = Settings::load(&path);
        assert_eq!(loaded.last_path_a.as_deref(), Some("a.wav"));
        assert_eq!(loaded.eq_bands, Some(vec![EqBand::new(4000, -12.0)]));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_no_save_leaves_everything_alone() {
        let path = temp_settings("no-save");
        let mut settings = Settings::default();

        let stored = persist(&mut settings, &path, true, |s| {
            s.last_path_a = Some("a.wav".to_string());
        })
        .unwrap();

        assert!(!stored);
        assert_eq!(settings, Settings::default());
        assert!(!path.exists());
    }

    #[test]
    fn test_compare_flags_parse() {
        let args = Args::try_parse_from([
            "ftq",
            "--settings",
            "s.json",
            "compare",
            "a.wav",
            "--no-save",
            "--suggest-eq",
        ])
        .unwrap();

        assert_eq!(args.settings, Some(PathBuf::from("s.json")));
        match args.command {
            Command::Compare {
                track_a,
                track_b,
                no_save,
                suggest_eq,
                threshold,
                ..
            } => {
                assert_eq!(track_a.as_deref(), Some("a.wav"));
                assert_eq!(track_b, None);
                assert!(no_save);
                assert!(suggest_eq);
                assert_eq!(threshold, DEFAULT_MATCH_THRESHOLD_DB);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}

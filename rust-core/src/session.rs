//! Interactive terminal session
//!
//! Asks for track A and track B, compares them, then offers to reload B,
//! start over, or quit. Paths are remembered in the settings file once a
//! track has actually loaded.

use crate::audio::loader::{load_audio, AudioError, LoadedAudio, LoaderConfig};
use crate::compare::{compare_tracks, CompareConfig};
use crate::render::{render_comparison, RenderOptions};
use crate::settings::Settings;
use log::warn;
use std::io::{self, BufRead, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Aborted by user.")]
    Aborted,

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Strip surrounding whitespace and any number of matching outer quotes
///
/// `"C:\foo\bar.wav"`, `'C:\foo\bar.wav'` and `""C:\x.wav""` all lose
/// their quotes.
pub fn normalize_path_input(s: &str) -> String {
    let mut s = s.trim();
    while (s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')) {
        // A lone quote both starts and ends the string
        s = if s.len() >= 2 { s[1..s.len() - 1].trim() } else { "" };
    }
    s.to_string()
}

/// Source of decoded tracks
pub trait TrackLoader {
    fn load(&self, path: &Path) -> Result<LoadedAudio, AudioError>;
}

/// Loads WAV files from disk
#[derive(Debug, Clone, Default)]
pub struct WavLoader {
    pub config: LoaderConfig,
}

impl TrackLoader for WavLoader {
    fn load(&self, path: &Path) -> Result<LoadedAudio, AudioError> {
        load_audio(path, &self.config)
    }
}

impl<F> TrackLoader for F
where
    F: Fn(&Path) -> Result<LoadedAudio, AudioError>,
{
    fn load(&self, path: &Path) -> Result<LoadedAudio, AudioError> {
        self(path)
    }
}

/// What to do after a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ReloadB,
    Restart,
    Quit,
}

/// Line-oriented prompt over any reader and writer
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print `prompt` and read one line; end of input counts as abort
    fn ask(&mut self, prompt: &str) -> Result<String, SessionError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Err(SessionError::Aborted);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Ask for a path until a track loads or the user aborts
    ///
    /// An empty answer takes `default` when there is one.
    pub fn ask_for_audio_file(
        &mut self,
        label: &str,
        default: Option<&str>,
        loader: &dyn TrackLoader,
    ) -> Result<LoadedAudio, SessionError> {
        let default = default
            .map(normalize_path_input)
            .filter(|d| !d.is_empty());

        loop {
            let chosen = match &default {
                Some(default) => {
                    let raw = normalize_path_input(&self.ask(&format!("{label} [Enter = last path]\n> "))?);
                    if raw.is_empty() {
                        default.clone()
                    } else {
                        raw
                    }
                }
                None => normalize_path_input(&self.ask(&format!("{label}\n> "))?),
            };

            if chosen.is_empty() {
                writeln!(self.output, "No path entered.")?;
            } else {
                match loader.load(Path::new(&chosen)) {
                    Ok(audio) => return Ok(audio),
                    Err(AudioError::NotFound(_)) => {
                        writeln!(self.output, "Path not found or not a file:\n{chosen}")?;
                    }
                    Err(e) => {
                        writeln!(
                            self.output,
                            "File exists but could not be loaded as audio:\n{chosen}\nError: {e}"
                        )?;
                    }
                }
            }

            let decision = self.ask("Try again (E) or abort (A)? ")?;
            if decision.trim().eq_ignore_ascii_case("a") {
                return Err(SessionError::Aborted);
            }
        }
    }

    /// Show the post-comparison menu until a valid choice is made
    pub fn ask_menu(&mut self) -> Result<MenuChoice, SessionError> {
        loop {
            writeln!(self.output, "\nWhat next?")?;
            writeln!(self.output, "1) Reload track B (track A stays)")?;
            writeln!(self.output, "2) Start over (choose A and B again)")?;
            writeln!(self.output, "3) Quit")?;

            match self.ask("> ")?.trim() {
                "1" => return Ok(MenuChoice::ReloadB),
                "2" => return Ok(MenuChoice::Restart),
                "3" => return Ok(MenuChoice::Quit),
                _ => writeln!(self.output, "Invalid choice. Please enter 1, 2 or 3.")?,
            }
        }
    }

    /// Run the full A/B loop, persisting chosen paths to `settings_path`
    pub fn run_session(
        &mut self,
        settings_path: &Path,
        loader: &dyn TrackLoader,
        config: &CompareConfig,
        render_options: &RenderOptions,
    ) -> Result<(), SessionError> {
        writeln!(
            self.output,
            "Press Enter to reuse the last path, or type a new one.\n"
        )?;
        let mut settings = Settings::load(settings_path);

        loop {
            let track_a = match self.ask_for_audio_file(
                "Path to track A (e.g. riff.wav):",
                settings.last_path_a.as_deref(),
                loader,
            ) {
                Ok(track) => track,
                Err(SessionError::Aborted) => return self.aborted(),
                Err(e) => return Err(e),
            };
            settings.last_path_a = Some(track_a.path.display().to_string());
            save(&settings, settings_path);

            loop {
                let track_b = match self.ask_for_audio_file(
                    "Path to track B (e.g. reference.wav):",
                    settings.last_path_b.as_deref(),
                    loader,
                ) {
                    Ok(track) => track,
                    Err(SessionError::Aborted) => return self.aborted(),
                    Err(e) => return Err(e),
                };
                settings.last_path_b = Some(track_b.path.display().to_string());
                save(&settings, settings_path);

                match compare_tracks(
                    &track_a.samples,
                    &track_b.samples,
                    track_a.sample_rate as f64,
                    config,
                ) {
                    Ok(comparison) => {
                        write!(self.output, "{}", render_comparison(&comparison, render_options))?;
                    }
                    Err(e) => writeln!(self.output, "Comparison failed: {e}")?,
                }

                match self.ask_menu() {
                    Ok(MenuChoice::ReloadB) => continue,
                    Ok(MenuChoice::Restart) => break,
                    Ok(MenuChoice::Quit) | Err(SessionError::Aborted) => return Ok(()),
                    Err(e) => return Err(e),
                }
            }
        }
    }

    fn aborted(&mut self) -> Result<(), SessionError> {
        writeln!(self.output, "{}", SessionError::Aborted)?;
        Ok(())
    }
}

fn save(settings: &Settings, path: &Path) {
    if let Err(e) = settings.save(path) {
        warn!("{e}");
    }
}

//! Audio file loading and level handling

pub mod level;
pub mod loader;

pub use level::{match_levels, rms, rms_normalize, LevelMatch};
pub use loader::{load_audio, AudioError, LoadedAudio, LoaderConfig, DEFAULT_SAMPLE_RATE};

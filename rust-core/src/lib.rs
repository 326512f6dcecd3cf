//! free-the-quencies - A/B tonal balance comparison
//!
//! Compares the long-term spectrum of two tracks on one-third-octave
//! graphic-EQ bands, with a manual EQ curve model and optional Python
//! bindings for the desktop front end.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![cfg_attr(feature = "python", allow(non_local_definitions))]

pub mod audio;
pub mod bands;
pub mod compare;
pub mod eq;
pub mod render;
pub mod session;
pub mod settings;
pub mod spectrum;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use bands::BandLayout;
pub use compare::{compare_tracks, CompareConfig, Comparison};
pub use eq::EqCurve;
pub use settings::Settings;
pub use spectrum::{SpectrumAnalyzer, WindowType};

//! Window functions for spectral analysis
//!
//! Applies windows to time-domain frames before FFT to reduce spectral leakage

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/D)
    /// Sidelobe attenuation: ~31 dB, rolls off quickly
    Hann,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/D)
    /// Sidelobe attenuation: ~43 dB
    Hamming,

    /// Blackman window: w[n] = 0.42 - 0.5*cos(2πn/D) + 0.08*cos(4πn/D)
    /// Sidelobe attenuation: ~58 dB, widest mainlobe
    Blackman,

    /// Rectangular window (no windowing)
    Rectangular,
}

impl WindowType {
    /// Parse a window name as used on the command line and in Python
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "hann" | "hanning" => Some(WindowType::Hann),
            "hamming" => Some(WindowType::Hamming),
            "blackman" => Some(WindowType::Blackman),
            "rectangular" | "rect" | "boxcar" => Some(WindowType::Rectangular),
            _ => None,
        }
    }

    fn coefficient(&self, n: usize, denominator: f64) -> f64 {
        let angle = 2.0 * PI * n as f64 / denominator;
        match self {
            WindowType::Hann => 0.5 - 0.5 * angle.cos(),
            WindowType::Hamming => 0.54 - 0.46 * angle.cos(),
            WindowType::Blackman => 0.42 - 0.5 * angle.cos() + 0.08 * (2.0 * angle).cos(),
            WindowType::Rectangular => 1.0,
        }
    }
}

/// Generate symmetric window coefficients (denominator M-1)
///
/// # Arguments
/// * `window_type` - Type of window function
/// * `length` - Number of samples (M)
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    match length {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let denominator = (length - 1) as f64;
            (0..length)
                .map(|n| window_type.coefficient(n, denominator))
                .collect()
        }
    }
}

/// Generate periodic (DFT-even) window coefficients (denominator M)
///
/// This is the variant used for framed spectral analysis: the window
/// repeats seamlessly when frames are laid end to end.
pub fn generate_periodic_window(window_type: WindowType, length: usize) -> Vec<f64> {
    match length {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let denominator = length as f64;
            (0..length)
                .map(|n| window_type.coefficient(n, denominator))
                .collect()
        }
    }
}

/// Apply precomputed window in-place
pub fn apply_window_inplace(frame: &mut [f64], window: &[f64]) {
    for (s, w) in frame.iter_mut().zip(window.iter()) {
        *s *= w;
    }
}

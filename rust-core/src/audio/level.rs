//! RMS level measurement and matching
//!
//! Both tracks are brought to a common RMS before their spectra are
//! compared, so loudness differences do not masquerade as tonal ones.

use log::debug;

/// Root mean square of a signal (0 for an empty signal)
pub fn rms(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    (signal.iter().map(|&x| x * x).sum::<f64>() / signal.len() as f64).sqrt()
}

/// Scale `signal` so its RMS equals `target_rms`
///
/// A silent signal is returned unchanged.
pub fn rms_normalize(signal: &[f64], target_rms: f64) -> Vec<f64> {
    let current = rms(signal);
    if current == 0.0 {
        return signal.to_vec();
    }
    let gain = target_rms / current;
    signal.iter().map(|&x| x * gain).collect()
}

/// Result of matching two signals to their mean RMS
#[derive(Debug, Clone)]
pub struct LevelMatch {
    pub rms_a: f64,
    pub rms_b: f64,
    pub target_rms: f64,
    /// Linear gain applied to A (1.0 when A is silent)
    pub gain_a: f64,
    /// Linear gain applied to B (1.0 when B is silent)
    pub gain_b: f64,
    pub a: Vec<f64>,
    pub b: Vec<f64>,
}

/// Normalize both signals to the mean of their RMS levels
pub fn match_levels(a: &[f64], b: &[f64]) -> LevelMatch {
    let rms_a = rms(a);
    let rms_b = rms(b);
    let target_rms = (rms_a + rms_b) / 2.0;

    let gain = |current: f64| if current == 0.0 { 1.0 } else { target_rms / current };
    let gain_a = gain(rms_a);
    let gain_b = gain(rms_b);

    debug!(
        "level match: rms_a={:.6} rms_b={:.6} target={:.6} gain_a={:.3} gain_b={:.3}",
        rms_a, rms_b, target_rms, gain_a, gain_b
    );

    LevelMatch {
        rms_a,
        rms_b,
        target_rms,
        gain_a,
        gain_b,
        a: rms_normalize(a, target_rms),
        b: rms_normalize(b, target_rms),
    }
}

/// Convert a linear gain to dB
pub fn gain_to_db(gain: f64) -> f64 {
    20.0 * gain.max(1e-12).log10()
}

//! Text rendering of a comparison as two graphic-EQ bar charts

use crate::compare::Comparison;
use crate::eq::EqCurve;
use std::fmt::Write;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Characters available for the longest bar
    pub width: usize,
    /// Level drawn as an empty bar
    pub floor_db: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 40,
            floor_db: -90.0,
        }
    }
}

/// Bar length for a level between `floor_db` and 0 dB
pub fn bar_length(db: f64, options: &RenderOptions) -> usize {
    if options.floor_db >= 0.0 || db.is_nan() {
        return 0;
    }
    let clamped = db.clamp(options.floor_db, 0.0);
    let fraction = (clamped - options.floor_db) / -options.floor_db;
    (fraction * options.width as f64).round() as usize
}

fn chart(out: &mut String, title: &str, labels: &[String], bands: &[f64], options: &RenderOptions) {
    let _ = writeln!(out, "{title}");
    for (label, &db) in labels.iter().zip(bands.iter()) {
        let bar = "#".repeat(bar_length(db, options));
        let _ = writeln!(out, "{label:>6} |{bar:<width$}| {db:7.1} dB", width = options.width);
    }
}

/// Render both tracks' bands plus a per-band difference table
pub fn render_comparison(comparison: &Comparison, options: &RenderOptions) -> String {
    let mut out = String::new();

    chart(
        &mut out,
        "Track A - Graphic EQ (bands 50 Hz-16 kHz)",
        &comparison.labels,
        &comparison.bands_a,
        options,
    );
    out.push('\n');
    chart(
        &mut out,
        "Track B - Graphic EQ (bands 50 Hz-16 kHz)",
        &comparison.labels,
        &comparison.bands_b,
        options,
    );
    out.push('\n');

    let _ = writeln!(
        out,
        "Difference B - A (= within ±{:.1} dB)",
        comparison.match_threshold_db
    );
    for ((label, &diff), matched) in comparison
        .labels
        .iter()
        .zip(comparison.diff_db.iter())
        .zip(comparison.matches())
    {
        let marker = if matched { '=' } else { ' ' };
        let _ = writeln!(out, "{label:>6} {diff:+7.1} dB {marker}");
    }

    let _ = writeln!(
        out,
        "\n{}/{} bands match. RMS A {:.4}, B {:.4}, matched to {:.4}.",
        comparison.match_count(),
        comparison.len(),
        comparison.level.rms_a,
        comparison.level.rms_b,
        comparison.level.target_rms
    );
    if let Some((idx, diff)) = comparison.largest_deviation() {
        let _ = writeln!(
            out,
            "Largest deviation: {} Hz ({:+.1} dB)",
            comparison.labels[idx], diff
        );
    }
    out
}

/// Render an EQ curve as one line per band
pub fn render_eq_curve(curve: &EqCurve) -> String {
    let mut out = String::new();
    for band in curve.bands() {
        let _ = writeln!(out, "{:>6} Hz {:+5.1} dB", band.freq_hz, band.gain_db);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::LevelSummary;

    fn comparison() -> Comparison {
        Comparison {
            centers_hz: vec![100.0, 1000.0],
            labels: vec!["100".to_string(), "1k".to_string()],
            bands_a: vec![0.0, -45.0],
            bands_b: vec![-0.3, 0.0],
            diff_db: vec![-0.3, 45.0],
            level: LevelSummary {
                rms_a: 0.1,
                rms_b: 0.3,
                target_rms: 0.2,
            },
            frames_a: 10,
            frames_b: 12,
            match_threshold_db: 0.5,
        }
    }

    #[test]
    fn test_bar_length() {
        let options = RenderOptions::default();
        assert_eq!(bar_length(0.0, &options), 40);
        assert_eq!(bar_length(-45.0, &options), 20);
        assert_eq!(bar_length(-90.0, &options), 0);
        assert_eq!(bar_length(-200.0, &options), 0);
        assert_eq!(bar_length(5.0, &options), 40);
    }

    #[test]
    fn test_render_marks_matches() {
        let text = render_comparison(&comparison(), &RenderOptions::default());

        assert!(text.contains("Track A"));
        assert!(text.contains("   100    -0.3 dB ="));
        assert!(text.contains("    1k   +45.0 dB  "));
        assert!(text.contains("1/2 bands match"));
        assert!(text.contains("Largest deviation: 1k Hz (+45.0 dB)"));
    }

    #[test]
    fn test_render_eq_curve() {
        let text = render_eq_curve(&EqCurve::default());
        assert_eq!(text.lines().count(), 9);
        assert!(text.starts_with("    65 Hz  +0.0 dB"));
    }
}

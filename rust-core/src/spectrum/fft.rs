//! FFT engine using realfft for real-valued signals

use super::SpectrumError;
use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// FFT engine for real-valued signals
pub struct FftEngine {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Real FFT processor
    r2c: Arc<dyn RealToComplex<f64>>,

    /// Reusable input buffer
    input_buffer: Vec<f64>,

    /// Reusable output buffer (complex spectrum)
    output_buffer: Vec<Complex<f64>>,

    /// Scratch space required by realfft
    scratch: Vec<Complex<f64>>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_size);

        let input_buffer = r2c.make_input_vec();
        let output_buffer = r2c.make_output_vec();
        let scratch = r2c.make_scratch_vec();

        Self {
            fft_size,
            r2c,
            input_buffer,
            output_buffer,
            scratch,
        }
    }

    /// Compute FFT and write magnitude spectrum into `magnitude`
    ///
    /// `signal` is zero-padded (or truncated) to the FFT size and
    /// `magnitude` must hold `num_bins()` values.
    pub fn magnitude_into(
        &mut self,
        signal: &[f64],
        magnitude: &mut [f64],
    ) -> Result<(), SpectrumError> {
        let copy_len = signal.len().min(self.fft_size);
        self.input_buffer[..copy_len].copy_from_slice(&signal[..copy_len]);
        if copy_len < self.fft_size {
            self.input_buffer[copy_len..].fill(0.0);
        }

        self.r2c
            .process_with_scratch(
                &mut self.input_buffer,
                &mut self.output_buffer,
                &mut self.scratch,
            )
            .map_err(|e| SpectrumError::Fft(e.to_string()))?;

        for (m, c) in magnitude.iter_mut().zip(self.output_buffer.iter()) {
            *m = c.norm();
        }
        Ok(())
    }

    /// Compute FFT and return magnitude spectrum
    ///
    /// # Returns
    /// Magnitude spectrum |X[k]| for k = 0..fft_size/2 (positive frequencies only)
    pub fn compute_magnitude(&mut self, signal: &[f64]) -> Result<Vec<f64>, SpectrumError> {
        let mut magnitude = vec![0.0; self.num_bins()];
        self.magnitude_into(signal, &mut magnitude)?;
        Ok(magnitude)
    }

    /// Get number of frequency bins (fft_size/2 + 1 for real FFT)
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Frequency of bin `k` in Hz
    pub fn bin_to_hz(&self, bin: usize, sample_rate: f64) -> f64 {
        bin as f64 * sample_rate / self.fft_size as f64
    }

    /// Frequency axis in Hz, same layout as numpy's `rfftfreq`
    pub fn frequencies_hz(&self, sample_rate: f64) -> Vec<f64> {
        (0..self.num_bins())
            .map(|bin| self.bin_to_hz(bin, sample_rate))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_fft_dc_signal() {
        let mut fft = FftEngine::new(1024);

        // DC signal shorter than the FFT: zero-padded
        let signal = vec![1.0; 100];
        let spectrum = fft.compute_magnitude(&signal).unwrap();

        assert!((spectrum[0] - 100.0).abs() < 1e-9);
        assert!(spectrum[10] < spectrum[0]);
    }

    #[test]
    fn test_fft_sine_wave() {
        let mut fft = FftEngine::new(1024);

        // Exactly on bin 64
        let signal: Vec<f64> = (0..1024)
            .map(|n| (2.0 * PI * 64.0 * n as f64 / 1024.0).sin())
            .collect();

        let spectrum = fft.compute_magnitude(&signal).unwrap();

        let (peak_bin, &peak_mag) = spectrum
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap();

        assert_eq!(peak_bin, 64);
        // N/2 for a unit sine
        assert!((peak_mag - 512.0).abs() < 1e-6);
    }

    #[test]
    fn test_frequency_axis() {
        let fft = FftEngine::new(4096);
        let freqs = fft.frequencies_hz(44100.0);

        assert_eq!(freqs.len(), 2049);
        assert_eq!(freqs[0], 0.0);
        assert!((freqs[1] - 44100.0 / 4096.0).abs() < 1e-12);
        assert!((freqs[2048] - 22050.0).abs() < 1e-9);
    }

    #[test]
    fn test_long_signal_is_truncated() {
        let mut fft = FftEngine::new(8);
        let spectrum = fft.compute_magnitude(&[1.0; 32]).unwrap();
        assert!((spectrum[0] - 8.0).abs() < 1e-12);
    }
}

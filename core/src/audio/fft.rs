//! FFT spectrum analysis using RustFFT.
//!
//! Turns one frame's sample block into a Nyquist-limited magnitude spectrum.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Transform size used by the frame pipeline.
pub const FFT_SIZE: usize = 2048;

/// Spectrum analyzer for per-frame sample blocks.
///
/// Blocks shorter than the transform size are zero-padded and longer blocks
/// are truncated, so any block length is accepted.
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl SpectrumAnalyzer {
    /// Create a new spectrum analyzer with the given FFT size.
    ///
    /// # Panics
    ///
    /// Panics if `fft_size` is not a power of two.
    pub fn new(fft_size: usize) -> Self {
        assert!(fft_size.is_power_of_two(), "FFT size must be a power of 2");

        // Hamming window over the full transform length
        let window: Vec<f32> = (0..fft_size)
            .map(|i| {
                let t = i as f32 / (fft_size - 1).max(1) as f32;
                0.54 - 0.46 * (2.0 * std::f32::consts::PI * t).cos()
            })
            .collect();

        let fft = FftPlanner::new().plan_fft_forward(fft_size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Self {
            fft,
            fft_size,
            window,
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
            scratch,
        }
    }

    /// FFT size being used.
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of frequency bins in the output (FFT size / 2).
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2
    }

    /// Compute the magnitude spectrum of `samples` into `bins`.
    ///
    /// `bins` is resized to [`num_bins`](Self::num_bins) and overwritten. An
    /// empty block clears it to zero without running the transform.
    pub fn analyze_into(&mut self, samples: &[f32], bins: &mut Vec<f32>) {
        let half = self.num_bins();
        bins.resize(half, 0.0);

        if samples.is_empty() {
            bins.fill(0.0);
            return;
        }

        let copied = samples.len().min(self.fft_size);
        for (i, slot) in self.buffer.iter_mut().enumerate() {
            *slot = if i < copied {
                Complex::new(samples[i] * self.window[i], 0.0)
            } else {
                Complex::new(0.0, 0.0)
            };
        }

        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        for (bin, c) in bins.iter_mut().zip(&self.buffer[..half]) {
            *bin = (c.re * c.re + c.im * c.im).sqrt();
        }
    }

    /// Compute the magnitude spectrum of `samples`.
    ///
    /// The returned vector always has length `fft_size / 2`.
    pub fn analyze(&mut self, samples: &[f32]) -> Vec<f32> {
        let mut bins = Vec::with_capacity(self.num_bins());
        self.analyze_into(samples, &mut bins);
        bins
    }

    /// Get the frequency in Hz for a given bin index.
    pub fn bin_to_freq(&self, bin: usize, sample_rate: u32) -> f32 {
        bin as f32 * sample_rate as f32 / self.fft_size as f32
    }

    /// Get the bin index for a given frequency in Hz.
    pub fn freq_to_bin(&self, freq: f32, sample_rate: u32) -> usize {
        (freq * self.fft_size as f32 / sample_rate as f32).round() as usize
    }
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new(FFT_SIZE)
    }
}

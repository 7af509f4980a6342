//! Windowed FFT magnitude analysis.

use rustfft::{num_complex::Complex, FftPlanner};

/// Floor reported for bins with no measurable energy
pub const MIN_DB: f32 = -160.0;

/// Stateful analyzer with a reusable FFT planner and precomputed window.
pub struct SpectrumAnalyzer {
    fft_planner: FftPlanner<f32>,
    fft_size: usize,
    window: Vec<f32>,
    window_gain: f32,
}

impl SpectrumAnalyzer {
    /// Creates an analyzer for blocks of `fft_size` samples.
    pub fn new(fft_size: usize) -> Self {
        let fft_size = fft_size.max(2);

        // Periodic Hann window to reduce spectral leakage
        let window: Vec<f32> = (0..fft_size)
            .map(|i| {
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / fft_size as f32).cos())
            })
            .collect();
        let window_gain = window.iter().sum();

        Self {
            fft_planner: FftPlanner::new(),
            fft_size,
            window,
            window_gain,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of bins returned by [`magnitudes_db`](Self::magnitudes_db).
    pub fn bins(&self) -> usize {
        self.fft_size / 2
    }

    /// Computes per-bin magnitudes in dBFS from DC up to Nyquist.
    ///
    /// Uses the newest `fft_size` samples; shorter input is zero-padded.
    /// A full-scale sine centred on a bin reads close to 0 dB.
    pub fn magnitudes_db(&mut self, samples: &[f32]) -> Vec<f32> {
        if samples.is_empty() {
            return vec![MIN_DB; self.bins()];
        }

        let start = samples.len().saturating_sub(self.fft_size);
        let mut buffer: Vec<Complex<f32>> = samples[start..]
            .iter()
            .zip(&self.window)
            .map(|(&sample, &weight)| Complex::new(sample * weight, 0.0))
            .collect();
        buffer.resize(self.fft_size, Complex::new(0.0, 0.0));

        let fft = self.fft_planner.plan_fft_forward(self.fft_size);
        fft.process(&mut buffer);

        let scale = 2.0 / self.window_gain;
        buffer[..self.bins()]
            .iter()
            .map(|bin| {
                let amplitude = bin.norm() * scale;
                if amplitude > 1e-8 {
                    (20.0 * amplitude.log10()).max(MIN_DB)
                } else {
                    MIN_DB
                }
            })
            .collect()
    }
}

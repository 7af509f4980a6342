//! Synthetic input for running without a microphone.
//!
//! Produces a logarithmic sine sweep with a quieter second harmonic, which
//! draws a diagonal trace across the waterfall.

use std::f64::consts::TAU;

use super::SampleInput;

const DEFAULT_START_HZ: f64 = 100.0;
const DEFAULT_END_HZ: f64 = 8_000.0;
const DEFAULT_PERIOD_SECS: f64 = 10.0;
const AMPLITUDE: f64 = 0.5;

/// Deterministic sweep generator. Every call to [`latest`](SampleInput::latest)
/// advances time by the number of samples returned.
#[derive(Debug, Clone)]
pub struct SweepGenerator {
    sample_rate: u32,
    start_hz: f64,
    end_hz: f64,
    period_secs: f64,
    harmonic: bool,
    elapsed: u64,
    phase: f64,
}

impl SweepGenerator {
    /// 100 Hz to 8 kHz over ten seconds of sample time, capped at Nyquist.
    ///
    /// Time advances only as samples are pulled, so the on-screen sweep rate
    /// depends on the FFT size and frame delay.
    pub fn new(sample_rate: u32) -> Self {
        let nyquist = f64::from(sample_rate) / 2.0;
        Self {
            sample_rate,
            start_hz: DEFAULT_START_HZ.min(nyquist),
            end_hz: DEFAULT_END_HZ.min(nyquist),
            period_secs: DEFAULT_PERIOD_SECS,
            harmonic: true,
            elapsed: 0,
            phase: 0.0,
        }
    }

    /// A steady sine at `freq_hz` without harmonics.
    pub fn tone(freq_hz: f64, sample_rate: u32) -> Self {
        Self {
            start_hz: freq_hz,
            end_hz: freq_hz,
            harmonic: false,
            ..Self::new(sample_rate)
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Instantaneous frequency after `elapsed` samples.
    pub fn frequency_at(&self, elapsed: u64) -> f64 {
        let seconds = elapsed as f64 / f64::from(self.sample_rate);
        let progress = (seconds % self.period_secs) / self.period_secs;
        self.start_hz * (self.end_hz / self.start_hz).powf(progress)
    }

    fn next_sample(&mut self) -> f32 {
        let freq = self.frequency_at(self.elapsed);
        let mut sample = self.phase.sin();
        if self.harmonic {
            sample += 0.25 * (2.0 * self.phase).sin();
        }

        self.phase = (self.phase + TAU * freq / f64::from(self.sample_rate)) % TAU;
        self.elapsed += 1;
        (AMPLITUDE * sample) as f32
    }
}

impl SampleInput for SweepGenerator {
    fn latest(&mut self, count: usize) -> Vec<f32> {
        (0..count).map(|_| self.next_sample()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_rises_then_restarts() {
        let sweep = SweepGenerator::new(48_000);
        assert!((sweep.frequency_at(0) - 100.0).abs() < 1e-9);
        let halfway = sweep.frequency_at(240_000);
        assert!(halfway > 800.0 && halfway < 1000.0);
        assert!(sweep.frequency_at(479_999) > 7_900.0);
        assert!((sweep.frequency_at(480_000) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_range_capped_at_nyquist() {
        let sweep = SweepGenerator::new(8_000);
        assert!(sweep.frequency_at(39_999) <= 4_000.0);
    }

    #[test]
    fn test_samples_bounded_and_continuous() {
        let mut sweep = SweepGenerator::new(16_000);
        let first = sweep.latest(512);
        let second = sweep.latest(512);
        assert_eq!(first.len(), 512);
        assert!(first.iter().chain(&second).all(|s| s.abs() <= 0.63));
        assert_ne!(first, second);
    }
}

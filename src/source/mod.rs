//! Spectral sources feeding the waterfall.
//!
//! A source hands out one magnitude buffer (dB per frequency bin) each time it
//! is asked. The bundled sources run a windowed FFT over the newest block of
//! samples from either the microphone or a synthetic sweep.

pub mod analyzer;
pub mod capture;
pub mod sweep;

pub use analyzer::SpectrumAnalyzer;
pub use capture::MicrophoneCapture;
pub use sweep::SweepGenerator;

/// Anything that can produce a magnitude buffer on demand.
pub trait SpectralSource {
    /// Returns the current spectrum. The length may change between calls.
    fn get_buffer(&mut self) -> Vec<f32>;
}

impl<S: SpectralSource + ?Sized> SpectralSource for Box<S> {
    fn get_buffer(&mut self) -> Vec<f32> {
        (**self).get_buffer()
    }
}

/// Time-domain mono samples in [-1, 1].
pub trait SampleInput {
    /// Returns up to `count` of the newest samples, oldest first.
    fn latest(&mut self, count: usize) -> Vec<f32>;
}

/// FFT magnitudes of the newest block of an input.
pub struct FftSource<I: SampleInput> {
    input: I,
    analyzer: SpectrumAnalyzer,
}

impl<I: SampleInput> FftSource<I> {
    pub fn new(input: I, fft_size: usize) -> Self {
        Self {
            input,
            analyzer: SpectrumAnalyzer::new(fft_size),
        }
    }
}

impl<I: SampleInput> SpectralSource for FftSource<I> {
    fn get_buffer(&mut self) -> Vec<f32> {
        let samples = self.input.latest(self.analyzer.fft_size());
        self.analyzer.magnitudes_db(&samples)
    }
}

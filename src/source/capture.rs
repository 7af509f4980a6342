//! Live microphone capture.
//!
//! Captures from the system default or a named input device at its native
//! format, mixes down to mono and keeps a bounded window of the newest samples
//! for the analyzer to read.

use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use super::SampleInput;

#[cfg(target_os = "linux")]
use std::fs::OpenOptions;
#[cfg(target_os = "linux")]
use std::os::unix::io::AsRawFd;

type SharedSamples = Arc<Mutex<VecDeque<f32>>>;

/// Microphone input backed by a cpal stream.
pub struct MicrophoneCapture {
    /// Actual capture sample rate from device
    sample_rate: u32,
    /// Newest mono samples, oldest first
    samples: SharedSamples,
    /// Maximum number of samples retained
    capacity: usize,
    /// Active input stream (kept alive while capturing)
    stream: Option<cpal::Stream>,
    /// Device name, index or "default"
    device_name: String,
}

impl MicrophoneCapture {
    /// Creates an idle capture for `device_name` keeping `capacity` samples.
    ///
    /// # Arguments
    /// * `device_name` - "default", a numeric index or a device name
    /// * `capacity` - Samples to retain; at least one analysis block
    pub fn new(device_name: String, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            sample_rate: 0,
            samples: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
            stream: None,
            device_name,
        }
    }

    /// Opens the device and starts streaming samples.
    ///
    /// # Errors
    /// - If the device is not available
    /// - If the device reports an unsupported sample format
    /// - If the input stream cannot be created or started
    pub fn start(&mut self) -> Result<()> {
        let device = suppress_stderr(|| {
            let host = cpal::default_host();

            if self.device_name == "default" {
                host.default_input_device()
                    .ok_or_else(|| anyhow!("No audio input device available"))
            } else {
                find_device_by_name(&host, &self.device_name)
            }
        })?;

        let device_name = device
            .name()
            .unwrap_or_else(|_| "Unknown device".to_string());
        tracing::info!("Capture device: {}", device_name);

        let device_config = device.default_input_config()?;
        let sample_format = device_config.sample_format();
        let channels = usize::from(device_config.channels());
        self.sample_rate = device_config.sample_rate().0;

        tracing::debug!(
            "Device configuration: {}Hz, {} channels, {:?}",
            self.sample_rate,
            channels,
            sample_format
        );

        let config: cpal::StreamConfig = device_config.into();
        let stream = match sample_format {
            SampleFormat::F32 => self.build_stream::<f32>(&device, &config, channels)?,
            SampleFormat::I16 => self.build_stream::<i16>(&device, &config, channels)?,
            SampleFormat::U16 => self.build_stream::<u16>(&device, &config, channels)?,
            SampleFormat::I32 => self.build_stream::<i32>(&device, &config, channels)?,
            other => return Err(anyhow!("Unsupported sample format: {other:?}")),
        };

        stream.play()?;
        self.stream = Some(stream);

        tracing::debug!("Capture stream started");
        Ok(())
    }

    fn build_stream<T>(
        &self,
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        channels: usize,
    ) -> Result<cpal::Stream>
    where
        T: SizedSample,
        f32: FromSample<T>,
    {
        let samples = Arc::clone(&self.samples);
        let capacity = self.capacity;

        let stream = device.build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                push_mono(data, channels, &samples, capacity);
            },
            |err| {
                tracing::error!("Audio stream error: {}", err);
            },
            None,
        )?;
        Ok(stream)
    }

    /// Actual device sample rate; zero until [`start`](Self::start) succeeds.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }
}

impl SampleInput for MicrophoneCapture {
    fn latest(&mut self, count: usize) -> Vec<f32> {
        let samples = self.samples.lock().unwrap_or_else(PoisonError::into_inner);
        let skip = samples.len().saturating_sub(count);
        samples.iter().skip(skip).copied().collect()
    }
}

/// Appends interleaved `data` to `samples` as mono, dropping the oldest
/// samples beyond `capacity`.
fn push_mono<T>(data: &[T], channels: usize, samples: &Mutex<VecDeque<f32>>, capacity: usize)
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = channels.max(1);
    let mut samples = samples.lock().unwrap_or_else(PoisonError::into_inner);

    for frame in data.chunks_exact(channels) {
        let sum: f32 = frame.iter().map(|&s| f32::from_sample(s)).sum();
        samples.push_back(sum / channels as f32);
    }

    while samples.len() > capacity {
        samples.pop_front();
    }
}

/// Finds an audio input device by name or numeric index.
///
/// # Errors
/// - If no device with the specified name/index is found
fn find_device_by_name(host: &cpal::Host, device_spec: &str) -> Result<cpal::Device> {
    let devices: Vec<cpal::Device> = host
        .input_devices()
        .map_err(|e| anyhow!("Failed to enumerate devices: {e}"))?
        .collect();

    if let Ok(index) = device_spec.parse::<usize>() {
        let count = devices.len();
        return devices.into_iter().nth(index).ok_or_else(|| {
            anyhow!(
                "Device index {} is out of range (0-{})",
                index,
                count.saturating_sub(1)
            )
        });
    }

    devices
        .into_iter()
        .find(|device| device.name().is_ok_and(|name| name == device_spec))
        .ok_or_else(|| {
            anyhow!(
                "Audio input device '{device_spec}' not found. Use 'livefft list-devices' to see available devices."
            )
        })
}

/// Runs `f` with stderr redirected to /dev/null, hiding ALSA's chatter about
/// unusable PCM plugins while devices are probed.
#[cfg(target_os = "linux")]
pub(crate) fn suppress_stderr<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let dev_null = OpenOptions::new()
        .write(true)
        .open("/dev/null")
        .map_err(|e| anyhow!("Failed to open /dev/null: {e}"))?;

    let old_stderr = unsafe { libc::dup(libc::STDERR_FILENO) };
    if old_stderr == -1 {
        return Err(anyhow!("Failed to duplicate stderr"));
    }

    if unsafe { libc::dup2(dev_null.as_raw_fd(), libc::STDERR_FILENO) } == -1 {
        unsafe { libc::close(old_stderr) };
        return Err(anyhow!("Failed to redirect stderr"));
    }

    let result = f();

    unsafe {
        libc::dup2(old_stderr, libc::STDERR_FILENO);
        libc::close(old_stderr);
    }

    result
}

#[cfg(not(target_os = "linux"))]
pub(crate) fn suppress_stderr<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_mono_averages_channels() {
        let samples = Mutex::new(VecDeque::new());
        push_mono(&[0.5f32, -0.5, 1.0, 0.0], 2, &samples, 16);
        let samples = samples.into_inner().unwrap();
        assert_eq!(samples, VecDeque::from(vec![0.0, 0.5]));
    }

    #[test]
    fn test_push_mono_converts_integer_samples() {
        let samples = Mutex::new(VecDeque::new());
        push_mono(&[i16::MAX, 0], 1, &samples, 16);
        let samples = samples.into_inner().unwrap();
        assert!((samples[0] - 1.0).abs() < 1e-3);
        assert_eq!(samples[1], 0.0);
    }

    #[test]
    fn test_push_mono_keeps_newest_within_capacity() {
        let samples = Mutex::new(VecDeque::new());
        let data: Vec<f32> = (0..10).map(|i| i as f32).collect();
        push_mono(&data, 1, &samples, 4);
        let samples = samples.into_inner().unwrap();
        assert_eq!(samples, VecDeque::from(vec![6.0, 7.0, 8.0, 9.0]));
    }

    #[test]
    fn test_latest_before_start_is_empty() {
        let mut capture = MicrophoneCapture::new("default".to_string(), 2048);
        assert!(capture.latest(1024).is_empty());
        assert!(!capture.is_running());
        assert_eq!(capture.sample_rate(), 0);
    }
}

//! Configuration file management for livefft.
//!
//! Configuration is stored at `~/.config/livefft/livefft.toml`.

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::visual::params::{
    DEFAULT_COLOUR_OFFSET, DEFAULT_COLOUR_RANGE, DEFAULT_DELAY_MS, DEFAULT_LEADING_LINE_WIDTH,
    MAX_FREQ_ZOOM,
};
use crate::visual::resample::{DEFAULT_RANGE_MAX, DEFAULT_RANGE_MIN};
use crate::visual::{DisplayRange, VisualError, VisualizationParameters};

const MIN_FFT_SIZE: usize = 64;
const MAX_FFT_SIZE: usize = 16384;

/// Audio capture and analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Audio device to use. Options:
    /// - "default" for system default device
    /// - numeric index (0, 1, 2, etc.) from `livefft list-devices`
    /// - device name from `livefft list-devices`
    #[serde(default = "default_device")]
    pub device: String,
    /// Samples per FFT block; a power of two between 64 and 16384
    #[serde(default = "default_fft_size")]
    pub fft_size: usize,
}

fn default_device() -> String {
    "default".to_string()
}

fn default_fft_size() -> usize {
    2048
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            fft_size: default_fft_size(),
        }
    }
}

/// Initial waterfall settings. All of these can be changed while running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Delay between frames in milliseconds (1-100)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u32,
    /// Magnitude mapped to black, in dB
    #[serde(default = "default_fft_range_min")]
    pub fft_range_min: f32,
    /// Magnitude mapped to full brightness, in dB
    #[serde(default = "default_fft_range_max")]
    pub fft_range_max: f32,
    /// Rows of the grey band marking the newest line
    #[serde(default = "default_leading_line_width")]
    pub leading_line_width: usize,
    /// Hue baseline (0-1)
    #[serde(default = "default_colour_offset")]
    pub colour_offset: f32,
    /// Hue excursion across the magnitude range (0-2)
    #[serde(default = "default_colour_range")]
    pub colour_range: f32,
    /// Fraction of the spectrum shown, from the low end (0.1-1)
    #[serde(default = "default_freq_zoom")]
    pub freq_zoom: f32,
    /// Draw the clock each time the display wraps
    #[serde(default)]
    pub clock: bool,
    /// Slowly rotate the colours
    #[serde(default)]
    pub party_mode: bool,
    /// Cells between overlay text and the display edge
    #[serde(default = "default_text_margin")]
    pub text_margin: usize,
}

fn default_delay_ms() -> u32 {
    DEFAULT_DELAY_MS
}

fn default_fft_range_min() -> f32 {
    DEFAULT_RANGE_MIN
}

fn default_fft_range_max() -> f32 {
    DEFAULT_RANGE_MAX
}

fn default_leading_line_width() -> usize {
    DEFAULT_LEADING_LINE_WIDTH
}

fn default_colour_offset() -> f32 {
    DEFAULT_COLOUR_OFFSET
}

fn default_colour_range() -> f32 {
    DEFAULT_COLOUR_RANGE
}

fn default_freq_zoom() -> f32 {
    MAX_FREQ_ZOOM
}

fn default_text_margin() -> usize {
    1
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            fft_range_min: default_fft_range_min(),
            fft_range_max: default_fft_range_max(),
            leading_line_width: default_leading_line_width(),
            colour_offset: default_colour_offset(),
            colour_range: default_colour_range(),
            freq_zoom: default_freq_zoom(),
            clock: false,
            party_mode: false,
            text_margin: default_text_margin(),
        }
    }
}

impl DisplayConfig {
    /// The configured magnitude window.
    ///
    /// # Errors
    /// - If `fft_range_min` is not below `fft_range_max`
    pub fn fft_range(&self) -> Result<DisplayRange, VisualError> {
        DisplayRange::new(self.fft_range_min, self.fft_range_max)
    }

    /// Builds the starting parameters, clamping values into their domains.
    ///
    /// # Errors
    /// - If the magnitude window is empty or inverted
    pub fn to_parameters(&self) -> Result<VisualizationParameters, VisualError> {
        Ok(VisualizationParameters::default()
            .with_delay_ms(self.delay_ms)
            .with_fft_display_range(self.fft_range()?)
            .with_leading_line_width(self.leading_line_width)
            .with_colour(self.colour_offset, self.colour_range)
            .with_freq_zoom(self.freq_zoom)
            .with_clock(self.clock)
            .with_party_mode(self.party_mode))
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LivefftConfig {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl LivefftConfig {
    /// Loads configuration from the user's config directory.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    /// - If the config directory cannot be determined
    /// - If the file exists but cannot be read
    /// - If the TOML is malformed or fails validation
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path()?;
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Loads and validates the configuration at `path`.
    ///
    /// # Errors
    /// - If the file cannot be read
    /// - If the TOML is malformed or fails validation
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        tracing::debug!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Parses and validates TOML configuration text.
    ///
    /// # Errors
    /// - If the TOML is malformed
    /// - If a setting is out of its allowed range
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: LivefftConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks settings that cannot be clamped into shape.
    ///
    /// # Errors
    /// - If the FFT size is not a power of two within 64..=16384
    /// - If the magnitude window is empty or inverted
    pub fn validate(&self) -> anyhow::Result<()> {
        let fft_size = self.audio.fft_size;
        if !fft_size.is_power_of_two() || !(MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&fft_size) {
            return Err(anyhow!(
                "audio.fft_size must be a power of two between {MIN_FFT_SIZE} and {MAX_FFT_SIZE}, got {fft_size}"
            ));
        }
        self.display.fft_range()?;
        Ok(())
    }
}

/// Path of the config file, `~/.config/livefft/livefft.toml`.
///
/// # Errors
/// - If the home directory cannot be determined
pub fn config_path() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home.join(".config").join("livefft").join("livefft.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = LivefftConfig::parse("").unwrap();
        assert_eq!(config, LivefftConfig::default());
        assert_eq!(config.audio.device, "default");
        assert_eq!(config.audio.fft_size, 2048);
        assert_eq!(
            config.display.to_parameters().unwrap(),
            VisualizationParameters::default()
        );
    }

    #[test]
    fn test_bundled_template_parses() {
        let template = include_str!("../../environments/livefft.toml");
        assert_eq!(LivefftConfig::parse(template).unwrap(), LivefftConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = LivefftConfig::parse(
            r#"
            [audio]
            device = "2"

            [display]
            delay_ms = 25
            clock = true
            fft_range_min = -90.0
            "#,
        )
        .unwrap();

        assert_eq!(config.audio.device, "2");
        assert_eq!(config.audio.fft_size, 2048);
        let params = config.display.to_parameters().unwrap();
        assert_eq!(params.delay_ms(), 25);
        assert!(params.clock_enabled());
        assert_eq!(params.fft_display_range().min(), -90.0);
        assert_eq!(params.colour_offset(), 0.94);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let config = LivefftConfig::parse(
            r#"
            [display]
            delay_ms = 5000
            freq_zoom = 0.01
            colour_offset = 1.5
            "#,
        )
        .unwrap();
        let params = config.display.to_parameters().unwrap();
        assert_eq!(params.delay_ms(), 100);
        assert_eq!(params.freq_zoom(), 0.1);
        assert!((params.colour_offset() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_range_rejected() {
        let err = LivefftConfig::parse(
            r#"
            [display]
            fft_range_min = -20.0
            fft_range_max = -20.0
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid display range"));
    }

    #[test]
    fn test_fft_size_validated() {
        assert!(LivefftConfig::parse("[audio]\nfft_size = 1000").is_err());
        assert!(LivefftConfig::parse("[audio]\nfft_size = 32").is_err());
        assert!(LivefftConfig::parse("[audio]\nfft_size = 4096").is_ok());
    }

    #[test]
    fn test_malformed_toml_rejected() {
        assert!(LivefftConfig::parse("[display\ndelay_ms = 3").is_err());
        assert!(LivefftConfig::parse("[display]\ndelay_ms = \"fast\"").is_err());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = LivefftConfig::default();
        config.display.party_mode = true;
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(LivefftConfig::parse(&text).unwrap(), config);
    }
}

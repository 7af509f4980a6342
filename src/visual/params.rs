//! User-adjustable waterfall parameters.
//!
//! All mutation goes through the operations on [`VisualizationParameters`],
//! which clamp or wrap every value back into its domain and hand back a
//! [`StatusMessage`] for the caller to show wherever it likes.

use std::fmt;
use std::time::Duration;

use super::resample::DisplayRange;

pub const MIN_DELAY_MS: u32 = 1;
pub const MAX_DELAY_MS: u32 = 100;
pub const DEFAULT_DELAY_MS: u32 = 10;

pub const MIN_FREQ_ZOOM: f32 = 0.1;
pub const MAX_FREQ_ZOOM: f32 = 1.0;

pub const DEFAULT_COLOUR_OFFSET: f32 = 0.94;
pub const DEFAULT_COLOUR_RANGE: f32 = 0.4;
pub const DEFAULT_LEADING_LINE_WIDTH: usize = 2;

/// Colour offset wraps at one full hue turn
const COLOUR_OFFSET_PERIOD: f32 = 1.0;
/// Colour range wraps at two hue turns
const COLOUR_RANGE_PERIOD: f32 = 2.0;
/// Fraction of the colour range added to the offset each party-mode frame
pub const PARTY_DRIFT_RATE: f32 = 0.001;

/// Human-readable result of a parameter change, e.g. `"Delay: 10"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage(String);

impl StatusMessage {
    fn flag(label: &str, value: bool) -> Self {
        Self(format!("{label}: {value}"))
    }

    fn number(label: &str, value: f32) -> Self {
        Self(format!("{label}: {value:.2}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single interactive adjustment, as routed from the input layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    /// Change the inter-frame delay by this many milliseconds
    Delay(i32),
    /// Rotate the hue baseline
    ColourOffset(f32),
    /// Change the hue excursion
    ColourRange(f32),
    /// Change the used fraction of the spectrum
    FreqZoom(f32),
    TogglePause,
    ToggleClock,
    TogglePartyMode,
}

/// Everything the user can tune while the waterfall runs.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualizationParameters {
    delay_ms: u32,
    fft_display_range: DisplayRange,
    leading_line_width: usize,
    paused: bool,
    party_mode: bool,
    clock_enabled: bool,
    freq_zoom: f32,
    colour_offset: f32,
    colour_range: f32,
}

impl Default for VisualizationParameters {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            fft_display_range: DisplayRange::default(),
            leading_line_width: DEFAULT_LEADING_LINE_WIDTH,
            paused: false,
            party_mode: false,
            clock_enabled: false,
            freq_zoom: MAX_FREQ_ZOOM,
            colour_offset: DEFAULT_COLOUR_OFFSET,
            colour_range: DEFAULT_COLOUR_RANGE,
        }
    }
}

impl VisualizationParameters {
    // Startup values, folded through the same rules as the live operations

    pub fn with_delay_ms(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms.clamp(MIN_DELAY_MS, MAX_DELAY_MS);
        self
    }

    pub fn with_fft_display_range(mut self, range: DisplayRange) -> Self {
        self.fft_display_range = range;
        self
    }

    pub fn with_leading_line_width(mut self, width: usize) -> Self {
        self.leading_line_width = width;
        self
    }

    pub fn with_colour(mut self, offset: f32, range: f32) -> Self {
        self.colour_offset = wrap(offset, COLOUR_OFFSET_PERIOD);
        self.colour_range = wrap(range, COLOUR_RANGE_PERIOD);
        self
    }

    pub fn with_freq_zoom(mut self, zoom: f32) -> Self {
        self.freq_zoom = clamp_zoom(zoom);
        self
    }

    pub fn with_clock(mut self, enabled: bool) -> Self {
        self.clock_enabled = enabled;
        self
    }

    pub fn with_party_mode(mut self, enabled: bool) -> Self {
        self.party_mode = enabled;
        self
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn fft_display_range(&self) -> DisplayRange {
        self.fft_display_range
    }

    pub fn leading_line_width(&self) -> usize {
        self.leading_line_width
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn party_mode(&self) -> bool {
        self.party_mode
    }

    pub fn clock_enabled(&self) -> bool {
        self.clock_enabled
    }

    pub fn freq_zoom(&self) -> f32 {
        self.freq_zoom
    }

    pub fn colour_offset(&self) -> f32 {
        self.colour_offset
    }

    pub fn colour_range(&self) -> f32 {
        self.colour_range
    }

    /// Minimum pause the driver loop should leave between frames.
    pub fn recommended_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.delay_ms))
    }

    pub fn alter_delay(&mut self, delta: i32) -> StatusMessage {
        let delay = i64::from(self.delay_ms) + i64::from(delta);
        self.delay_ms = delay.clamp(i64::from(MIN_DELAY_MS), i64::from(MAX_DELAY_MS)) as u32;
        StatusMessage(format!("Delay: {}", self.delay_ms))
    }

    pub fn alter_colour_offset(&mut self, delta: f32) -> StatusMessage {
        self.colour_offset = wrap(self.colour_offset + delta, COLOUR_OFFSET_PERIOD);
        StatusMessage::number("Colour offset", self.colour_offset)
    }

    pub fn alter_colour_range(&mut self, delta: f32) -> StatusMessage {
        self.colour_range = wrap(self.colour_range + delta, COLOUR_RANGE_PERIOD);
        StatusMessage::number("Colour range", self.colour_range)
    }

    pub fn alter_freq_zoom(&mut self, delta: f32) -> StatusMessage {
        self.freq_zoom = clamp_zoom(self.freq_zoom + delta);
        StatusMessage::number("FFT range", self.freq_zoom)
    }

    pub fn toggle_pause(&mut self) -> StatusMessage {
        self.paused = !self.paused;
        StatusMessage::flag("Pause", self.paused)
    }

    pub fn toggle_clock(&mut self) -> StatusMessage {
        self.clock_enabled = !self.clock_enabled;
        StatusMessage::flag("Clock", self.clock_enabled)
    }

    pub fn toggle_party_mode(&mut self) -> StatusMessage {
        self.party_mode = !self.party_mode;
        StatusMessage::flag("Party mode", self.party_mode)
    }

    /// One party-mode step of hue drift. Kept within [0, 1) so long runs do
    /// not lose precision.
    pub fn drift_colour(&mut self) {
        self.colour_offset = wrap(
            self.colour_offset + self.colour_range * PARTY_DRIFT_RATE,
            COLOUR_OFFSET_PERIOD,
        );
    }

    /// Dispatches `control` to the matching operation.
    pub fn apply(&mut self, control: Control) -> StatusMessage {
        match control {
            Control::Delay(delta) => self.alter_delay(delta),
            Control::ColourOffset(delta) => self.alter_colour_offset(delta),
            Control::ColourRange(delta) => self.alter_colour_range(delta),
            Control::FreqZoom(delta) => self.alter_freq_zoom(delta),
            Control::TogglePause => self.toggle_pause(),
            Control::ToggleClock => self.toggle_clock(),
            Control::TogglePartyMode => self.toggle_party_mode(),
        }
    }
}

fn wrap(value: f32, period: f32) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    let wrapped = value.rem_euclid(period);
    // rem_euclid can round up to the period itself for tiny negative inputs
    if wrapped >= period {
        0.0
    } else {
        wrapped
    }
}

fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_nan() {
        return MAX_FREQ_ZOOM;
    }
    zoom.clamp(MIN_FREQ_ZOOM, MAX_FREQ_ZOOM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = VisualizationParameters::default();
        assert_eq!(params.delay_ms(), 10);
        assert_eq!(params.fft_display_range(), DisplayRange::new(-120.0, 0.0).unwrap());
        assert_eq!(params.leading_line_width(), 2);
        assert!(!params.paused() && !params.party_mode() && !params.clock_enabled());
        assert_eq!(params.freq_zoom(), 1.0);
        assert_eq!(params.colour_offset(), 0.94);
        assert_eq!(params.colour_range(), 0.4);
    }

    #[test]
    fn test_delay_is_clamped() {
        let mut params = VisualizationParameters::default();
        assert_eq!(params.alter_delay(1000).as_str(), "Delay: 100");
        assert_eq!(params.delay_ms(), 100);
        assert_eq!(params.alter_delay(-5000).as_str(), "Delay: 1");
        params.alter_delay(i32::MIN);
        assert_eq!(params.delay_ms(), 1);
        params.alter_delay(4);
        assert_eq!(params.recommended_interval(), Duration::from_millis(5));
    }

    #[test]
    fn test_colour_offset_full_turn_returns_home() {
        let mut params = VisualizationParameters::default();
        let start = params.colour_offset();
        for _ in 0..10 {
            params.alter_colour_offset(0.1);
        }
        assert!((params.colour_offset() - start).abs() < 1e-4);

        for _ in 0..4 {
            params.alter_colour_offset(-0.25);
        }
        assert!((params.colour_offset() - start).abs() < 1e-4);
    }

    #[test]
    fn test_colour_offset_stays_in_unit_interval() {
        let mut params = VisualizationParameters::default();
        for delta in [0.07, -0.5, 3.3, -9.9, 0.001] {
            params.alter_colour_offset(delta);
            assert!((0.0..1.0).contains(&params.colour_offset()));
        }
    }

    #[test]
    fn test_colour_range_wraps_at_two() {
        let mut params = VisualizationParameters::default();
        let message = params.alter_colour_range(1.7);
        assert!((params.colour_range() - 0.1).abs() < 1e-5);
        assert_eq!(message.as_str(), "Colour range: 0.10");

        params.alter_colour_range(-0.2);
        assert!((params.colour_range() - 1.9).abs() < 1e-5);
    }

    #[test]
    fn test_freq_zoom_is_clamped() {
        let mut params = VisualizationParameters::default();
        assert_eq!(params.alter_freq_zoom(0.5).as_str(), "FFT range: 1.00");
        assert_eq!(params.alter_freq_zoom(-0.25).as_str(), "FFT range: 0.75");
        params.alter_freq_zoom(-10.0);
        assert_eq!(params.freq_zoom(), MIN_FREQ_ZOOM);
        assert_eq!(params.apply(Control::FreqZoom(f32::NAN)).as_str(), "FFT range: 1.00");
    }

    #[test]
    fn test_toggles_report_state() {
        let mut params = VisualizationParameters::default();
        assert_eq!(params.toggle_pause().as_str(), "Pause: true");
        assert_eq!(params.toggle_pause().as_str(), "Pause: false");
        assert_eq!(params.toggle_clock().as_str(), "Clock: true");
        assert_eq!(params.toggle_party_mode().as_str(), "Party mode: true");
        assert!(params.clock_enabled() && params.party_mode());
    }

    #[test]
    fn test_apply_routes_controls() {
        let mut params = VisualizationParameters::default();
        assert_eq!(params.apply(Control::Delay(-3)).as_str(), "Delay: 7");
        assert_eq!(
            params.apply(Control::ColourOffset(0.01)).as_str(),
            "Colour offset: 0.95"
        );
        assert_eq!(params.apply(Control::TogglePause).to_string(), "Pause: true");
    }

    #[test]
    fn test_party_drift_stays_normalized() {
        let mut params = VisualizationParameters::default().with_colour(0.0, 1.0);
        params.drift_colour();
        assert!((params.colour_offset() - 0.001).abs() < 1e-6);

        for _ in 0..100_000 {
            params.drift_colour();
            assert!((0.0..1.0).contains(&params.colour_offset()));
        }
    }

    #[test]
    fn test_builders_clamp_out_of_contract_values() {
        let params = VisualizationParameters::default()
            .with_delay_ms(0)
            .with_freq_zoom(4.0)
            .with_colour(2.25, 5.0);
        assert_eq!(params.delay_ms(), 1);
        assert_eq!(params.freq_zoom(), 1.0);
        assert!((params.colour_offset() - 0.25).abs() < 1e-6);
        assert!((params.colour_range() - 1.0).abs() < 1e-6);
    }
}

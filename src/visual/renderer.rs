//! Per-frame orchestration of the waterfall.

use std::time::Duration;

use chrono::Local;

use super::colour::{colour, Rgb8};
use super::error::VisualError;
use super::overlay::{Overlay, TextRenderer};
use super::params::{Control, StatusMessage, VisualizationParameters};
use super::resample::resample;
use super::scan::{ScanState, Wrapped};
use super::surface::Surface;
use crate::source::SpectralSource;

/// Colour of the band marking the newest edge of the waterfall
pub const LEADING_LINE_COLOUR: Rgb8 = Rgb8::new(100, 100, 100);

/// Draws one spectrum row per frame onto a scrolling surface.
///
/// Owns the surface, the parameters and the scan state; the source is polled
/// once per [`update`](Self::update).
pub struct FrameRenderer<S, G, T>
where
    S: SpectralSource,
    G: Surface,
    T: TextRenderer,
{
    source: S,
    surface: G,
    params: VisualizationParameters,
    scan: ScanState,
    overlay: Overlay<T>,
    frames: u64,
}

impl<S, G, T> FrameRenderer<S, G, T>
where
    S: SpectralSource,
    G: Surface,
    T: TextRenderer,
{
    /// Creates a renderer drawing into `surface`, which is cleared.
    ///
    /// # Errors
    /// - If the surface has zero width or height
    pub fn new(
        source: S,
        mut surface: G,
        params: VisualizationParameters,
        overlay: Overlay<T>,
    ) -> Result<Self, VisualError> {
        check_dimensions(&surface)?;
        let scan = ScanState::new(surface.height())?;
        surface.fill(Rgb8::BLACK);

        Ok(Self {
            source,
            surface,
            params,
            scan,
            overlay,
            frames: 0,
        })
    }

    pub fn surface(&self) -> &G {
        &self.surface
    }

    pub fn params(&self) -> &VisualizationParameters {
        &self.params
    }

    pub fn scan_row(&self) -> usize {
        self.scan.row()
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Pause the driver loop should leave after this frame.
    pub fn recommended_interval(&self) -> Duration {
        self.params.recommended_interval()
    }

    /// Renders one frame.
    ///
    /// Returns `Some(Wrapped)` when the scan row wrapped during this frame.
    pub fn update(&mut self) -> Option<Wrapped> {
        let mut buffer = self.source.get_buffer();
        let zoom = self.params.freq_zoom();
        if zoom < 1.0 {
            let keep = (buffer.len() as f32 * zoom).floor() as usize;
            buffer.truncate(keep);
        }

        self.render_leading_line();
        self.render_colour_line(&buffer);

        let wrapped = self.scan.advance(self.params.paused());
        if wrapped.is_some() {
            tracing::trace!("Scan wrapped after {} frames", self.frames);
            if self.params.clock_enabled() {
                self.overlay
                    .draw_clock(&mut self.surface, &Local::now().naive_local());
            }
        }

        if self.params.party_mode() {
            self.params.drift_colour();
        }

        self.frames += 1;
        wrapped
    }

    /// Applies a user adjustment and shows its status message.
    pub fn apply(&mut self, control: Control) -> StatusMessage {
        let message = self.params.apply(control);
        self.show_status(&message);
        message
    }

    /// Writes `message` into the status band at the top of the surface.
    pub fn show_status(&mut self, message: &StatusMessage) {
        self.overlay.draw_status(&mut self.surface, message.as_str());
    }

    /// Swaps in a new surface after the display changed size.
    ///
    /// The new surface is cleared and scanning restarts at its bottom row.
    ///
    /// # Errors
    /// - If the new surface has zero width or height; the current surface
    ///   and scan row are kept
    pub fn resize(&mut self, mut surface: G) -> Result<(), VisualError> {
        check_dimensions(&surface)?;
        self.scan.on_resize(surface.height())?;
        surface.fill(Rgb8::BLACK);
        tracing::debug!(
            "Surface resized to {}x{}",
            surface.width(),
            surface.height()
        );
        self.surface = surface;
        Ok(())
    }

    fn render_leading_line(&mut self) {
        let row = self.scan.row();
        let right = self.surface.width() - 1;
        let top = row.saturating_sub(self.params.leading_line_width());
        for y in top..row {
            self.surface.draw_hline(LEADING_LINE_COLOUR, 0, y, right);
        }
    }

    fn render_colour_line(&mut self, buffer: &[f32]) {
        let row = self.scan.row();
        let offset = self.params.colour_offset();
        let range = self.params.colour_range();
        let points = resample(
            buffer,
            self.surface.width(),
            1,
            Some(self.params.fft_display_range()),
        );

        for (x, value) in points {
            self.surface.set_pixel(x, row, colour(value, offset, range));
        }
    }
}

fn check_dimensions<G: Surface>(surface: &G) -> Result<(), VisualError> {
    if surface.width() == 0 || surface.height() == 0 {
        return Err(VisualError::InvalidDimensions {
            width: surface.width(),
            height: surface.height(),
        });
    }
    Ok(())
}

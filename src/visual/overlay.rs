//! Overlay text: transient status messages and the wall clock.

use chrono::NaiveDateTime;

use super::colour::Rgb8;
use super::surface::{Cell, PixelGrid, Surface};

/// strftime pattern of the clock overlay, e.g. `05/03/24 14:07`
pub const CLOCK_FORMAT: &str = "%d/%m/%y %H:%M";

/// Renders a string into a standalone surface that can be blitted.
pub trait TextRenderer {
    fn render(&self, text: &str) -> PixelGrid;
}

/// One glyph per cell on a single row.
#[derive(Debug, Clone, Copy)]
pub struct CellTextRenderer {
    pub foreground: Rgb8,
    pub background: Rgb8,
}

impl Default for CellTextRenderer {
    fn default() -> Self {
        Self {
            foreground: Rgb8::WHITE,
            background: Rgb8::BLACK,
        }
    }
}

impl TextRenderer for CellTextRenderer {
    fn render(&self, text: &str) -> PixelGrid {
        let mut sprite = PixelGrid::new(text.chars().count(), 1);
        for (x, symbol) in text.chars().enumerate() {
            sprite.set_cell(x, 0, Cell::text(symbol, self.foreground, self.background));
        }
        sprite
    }
}

/// Places rendered text on a surface.
#[derive(Debug, Clone)]
pub struct Overlay<T: TextRenderer> {
    renderer: T,
    margin: usize,
}

impl<T: TextRenderer> Overlay<T> {
    pub fn new(renderer: T, margin: usize) -> Self {
        Self { renderer, margin }
    }

    /// Blanks the top band of `surface` and writes `message` into it.
    ///
    /// The band is the text height plus a margin above and below.
    pub fn draw_status<S: Surface + ?Sized>(&self, surface: &mut S, message: &str) {
        let sprite = self.renderer.render(message);
        let band = (sprite.height() + 2 * self.margin).min(surface.height());
        let right = surface.width().saturating_sub(1);

        for y in 0..band {
            surface.draw_hline(Rgb8::BLACK, 0, y, right);
        }
        surface.blit(&sprite, self.margin, self.margin);
    }

    /// Writes the clock into the top-right corner over whatever is there.
    pub fn draw_clock<S: Surface + ?Sized>(&self, surface: &mut S, now: &NaiveDateTime) {
        let sprite = self.renderer.render(&clock_text(now));
        let x = surface
            .width()
            .saturating_sub(sprite.width() + self.margin);
        let y = self.margin.min(surface.height());
        surface.blit(&sprite, x, y);
    }
}

/// Formats `now` for the clock overlay.
pub fn clock_text(now: &NaiveDateTime) -> String {
    now.format(CLOCK_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const GREEN: Rgb8 = Rgb8::new(0, 200, 0);

    fn sample_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|date| date.and_hms_opt(14, 7, 0))
            .unwrap()
    }

    fn text_at(surface: &PixelGrid, y: usize) -> String {
        (0..surface.width())
            .filter_map(|x| surface.cell(x, y).and_then(|c| c.glyph))
            .map(|glyph| glyph.symbol)
            .collect()
    }

    #[test]
    fn test_clock_format() {
        assert_eq!(clock_text(&sample_time()), "05/03/24 14:07");
    }

    #[test]
    fn test_renderer_lays_out_one_glyph_per_cell() {
        let sprite = CellTextRenderer::default().render("Delay: 10");
        assert_eq!(sprite.width(), 9);
        assert_eq!(sprite.height(), 1);
        assert_eq!(text_at(&sprite, 0), "Delay: 10");
        assert_eq!(CellTextRenderer::default().render("").width(), 0);
    }

    #[test]
    fn test_status_clears_band_and_writes_text() {
        let overlay = Overlay::new(CellTextRenderer::default(), 1);
        let mut surface = PixelGrid::new(20, 6);
        surface.fill(GREEN);

        overlay.draw_status(&mut surface, "Pause: true");

        // Band is 1 text row + 2 margin rows
        assert_eq!(surface.pixel(19, 0), Some(Rgb8::BLACK));
        assert_eq!(surface.pixel(19, 2), Some(Rgb8::BLACK));
        assert_eq!(surface.pixel(19, 3), Some(GREEN));
        assert_eq!(text_at(&surface, 1), "Pause: true");
        assert_eq!(surface.cell(1, 1).and_then(|c| c.glyph).map(|g| g.symbol), Some('P'));
    }

    #[test]
    fn test_status_band_limited_to_surface() {
        let overlay = Overlay::new(CellTextRenderer::default(), 5);
        let mut surface = PixelGrid::new(4, 3);
        surface.fill(GREEN);
        overlay.draw_status(&mut surface, "Clock: false");
        assert!(surface.rows().flatten().all(|c| c.background == Rgb8::BLACK));
    }

    #[test]
    fn test_clock_is_right_aligned_without_clearing() {
        let overlay = Overlay::new(CellTextRenderer::default(), 1);
        let mut surface = PixelGrid::new(30, 5);
        surface.fill(GREEN);

        overlay.draw_clock(&mut surface, &sample_time());

        // 14 glyphs ending one cell before the right edge
        assert_eq!(text_at(&surface, 1), "05/03/24 14:07");
        assert_eq!(surface.cell(15, 1).and_then(|c| c.glyph).map(|g| g.symbol), Some('0'));
        assert_eq!(surface.pixel(29, 1), Some(GREEN));
        assert_eq!(surface.pixel(0, 0), Some(GREEN));
        assert_eq!(surface.pixel(14, 1), Some(GREEN));
    }

    #[test]
    fn test_clock_on_narrow_surface_starts_at_left_edge() {
        let overlay = Overlay::new(CellTextRenderer::default(), 1);
        let mut surface = PixelGrid::new(8, 3);
        overlay.draw_clock(&mut surface, &sample_time());
        assert_eq!(text_at(&surface, 1), "05/03/24");
    }
}

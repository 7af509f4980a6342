//! Terminal user interface for the scrolling waterfall.
//!
//! Each terminal cell shows one pixel of the waterfall surface as its
//! background colour; overlay glyphs are drawn on top. A one-line footer
//! shows the live/paused state and the key bindings.

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    style::{Color, Style},
    widgets::Paragraph,
};
use std::error::Error;
use std::io::{stdout, Stdout};
use std::time::Duration;

use crate::visual::{Control, PixelGrid, Rgb8, Surface, VisualizationParameters};

const FOOTER_HEIGHT: u16 = 1;

const DELAY_STEP: i32 = 1;
const COLOUR_OFFSET_STEP: f32 = 0.01;
const COLOUR_RANGE_STEP: f32 = 0.05;
const FREQ_ZOOM_STEP: f32 = 0.05;

/// User input while the waterfall runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisualizerCommand {
    /// No key, or a key without a binding
    Continue,
    /// Leave the waterfall (Escape, 'q' or Ctrl+C)
    Quit,
    /// Change a visualization parameter
    Adjust(Control),
}

/// Maps a key press to a command.
pub fn command_for_key(key: KeyEvent) -> VisualizerCommand {
    let adjust = VisualizerCommand::Adjust;
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            VisualizerCommand::Quit
        }
        KeyCode::Char('q') | KeyCode::Esc => VisualizerCommand::Quit,
        KeyCode::Up => adjust(Control::Delay(DELAY_STEP)),
        KeyCode::Down => adjust(Control::Delay(-DELAY_STEP)),
        KeyCode::Right => adjust(Control::ColourOffset(COLOUR_OFFSET_STEP)),
        KeyCode::Left => adjust(Control::ColourOffset(-COLOUR_OFFSET_STEP)),
        KeyCode::Char(']') => adjust(Control::ColourRange(COLOUR_RANGE_STEP)),
        KeyCode::Char('[') => adjust(Control::ColourRange(-COLOUR_RANGE_STEP)),
        KeyCode::Char('+') | KeyCode::Char('=') => adjust(Control::FreqZoom(FREQ_ZOOM_STEP)),
        KeyCode::Char('-') => adjust(Control::FreqZoom(-FREQ_ZOOM_STEP)),
        KeyCode::Char(' ') => adjust(Control::TogglePause),
        KeyCode::Char('c') => adjust(Control::ToggleClock),
        KeyCode::Char('p') => adjust(Control::TogglePartyMode),
        _ => VisualizerCommand::Continue,
    }
}

/// Widget painting a [`PixelGrid`] cell for cell.
pub struct PixelView<'a> {
    grid: &'a PixelGrid,
}

impl<'a> PixelView<'a> {
    pub fn new(grid: &'a PixelGrid) -> Self {
        Self { grid }
    }
}

impl Widget for PixelView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = self.grid.rows().take(usize::from(area.height));
        for (y, row) in (area.y..).zip(rows) {
            for (x, cell) in (area.x..).zip(row.iter().take(usize::from(area.width))) {
                let Some(target) = buf.cell_mut((x, y)) else {
                    continue;
                };
                target.set_bg(rgb(cell.background));
                match cell.glyph {
                    Some(glyph) => {
                        target.set_char(glyph.symbol).set_fg(rgb(glyph.colour));
                    }
                    None => {
                        target.set_char(' ');
                    }
                }
            }
        }
    }
}

fn rgb(colour: Rgb8) -> Color {
    Color::Rgb(colour.r, colour.g, colour.b)
}

/// Footer text for the current parameters.
pub fn footer_line(params: &VisualizationParameters) -> Line<'static> {
    let indicator = if params.paused() {
        Span::styled("⏸ paused ", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("● live ", Style::default().fg(Color::Red))
    };

    Line::from(vec![
        indicator,
        Span::raw(format!(
            "{}ms / zoom {:.2} ",
            params.delay_ms(),
            params.freq_zoom()
        )),
        Span::styled(
            "↑↓ delay  ←→ hue  [] range  +- zoom  space pause  c clock  p party  q quit",
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

/// Terminal session showing the waterfall.
pub struct WaterfallTui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
}

impl WaterfallTui {
    /// Creates a new TUI instance and enters alternate screen mode.
    ///
    /// # Errors
    /// - If raw mode cannot be enabled
    /// - If the alternate screen cannot be entered
    /// - If the terminal cannot be initialized
    pub fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        Ok(WaterfallTui {
            terminal,
            active: true,
        })
    }

    /// Width and height available for the waterfall surface.
    ///
    /// # Errors
    /// - If the terminal size cannot be queried
    pub fn surface_size(&self) -> Result<(usize, usize), Box<dyn Error>> {
        let size = self.terminal.size()?;
        Ok((
            usize::from(size.width),
            usize::from(size.height.saturating_sub(FOOTER_HEIGHT)),
        ))
    }

    /// Draws the surface and the status footer.
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn draw(
        &mut self,
        surface: &PixelGrid,
        params: &VisualizationParameters,
    ) -> Result<(), Box<dyn Error>> {
        self.terminal.draw(|frame| {
            let area = frame.area();
            let view_height = area.height.saturating_sub(FOOTER_HEIGHT);

            let view_area = Rect {
                height: view_height.min(surface.height() as u16),
                ..area
            };
            frame.render_widget(PixelView::new(surface), view_area);

            let footer_area = Rect {
                y: area.y + view_height,
                height: area.height - view_height,
                ..area
            };
            let footer = Paragraph::new(footer_line(params)).style(
                Style::default()
                    .fg(Color::Rgb(185, 207, 212))
                    .bg(Color::Rgb(0, 0, 0)),
            );
            frame.render_widget(footer, footer_area);
        })?;

        Ok(())
    }

    /// Polls for one key press without blocking.
    ///
    /// # Errors
    /// - If event polling fails
    pub fn handle_input(&mut self) -> Result<VisualizerCommand, Box<dyn Error>> {
        if event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let command = command_for_key(key);
                    if command != VisualizerCommand::Continue {
                        tracing::debug!("{:?} pressed: {:?}", key.code, command);
                    }
                    return Ok(command);
                }
            }
        }
        Ok(VisualizerCommand::Continue)
    }

    /// Restores the terminal and leaves alternate screen mode.
    ///
    /// # Errors
    /// - If terminal mode cannot be disabled
    /// - If cursor cannot be shown
    pub fn cleanup(&mut self) -> Result<(), Box<dyn Error>> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for WaterfallTui {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::Cell;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(command_for_key(press(KeyCode::Char('q'))), VisualizerCommand::Quit);
        assert_eq!(command_for_key(press(KeyCode::Esc)), VisualizerCommand::Quit);
        assert_eq!(
            command_for_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            VisualizerCommand::Quit
        );
        assert_eq!(
            command_for_key(press(KeyCode::Char('c'))),
            VisualizerCommand::Adjust(Control::ToggleClock)
        );
        assert_eq!(
            command_for_key(press(KeyCode::Up)),
            VisualizerCommand::Adjust(Control::Delay(1))
        );
        assert_eq!(
            command_for_key(press(KeyCode::Char('-'))),
            VisualizerCommand::Adjust(Control::FreqZoom(-FREQ_ZOOM_STEP))
        );
        assert_eq!(
            command_for_key(press(KeyCode::Char(' '))),
            VisualizerCommand::Adjust(Control::TogglePause)
        );
        assert_eq!(command_for_key(press(KeyCode::Char('x'))), VisualizerCommand::Continue);
    }

    #[test]
    fn test_pixel_view_paints_backgrounds_and_glyphs() {
        let mut grid = PixelGrid::new(3, 2);
        grid.set_pixel(0, 0, Rgb8::new(10, 20, 30));
        grid.set_cell(2, 1, Cell::text('A', Rgb8::WHITE, Rgb8::BLACK));

        let area = Rect::new(0, 0, 3, 2);
        let mut buf = Buffer::empty(area);
        PixelView::new(&grid).render(area, &mut buf);

        let first = buf.cell((0, 0)).unwrap();
        assert_eq!(first.bg, Color::Rgb(10, 20, 30));
        assert_eq!(first.symbol(), " ");

        let glyph = buf.cell((2, 1)).unwrap();
        assert_eq!(glyph.symbol(), "A");
        assert_eq!(glyph.fg, Color::Rgb(255, 255, 255));
    }

    #[test]
    fn test_pixel_view_clips_to_area() {
        let mut grid = PixelGrid::new(10, 10);
        grid.fill(Rgb8::new(1, 2, 3));

        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 6));
        PixelView::new(&grid).render(Rect::new(2, 2, 2, 2), &mut buf);

        assert_eq!(buf.cell((2, 2)).unwrap().bg, Color::Rgb(1, 2, 3));
        assert_eq!(buf.cell((3, 3)).unwrap().bg, Color::Rgb(1, 2, 3));
        assert_eq!(buf.cell((4, 4)).unwrap().bg, Color::Reset);
    }

    #[test]
    fn test_footer_reflects_pause() {
        let mut params = VisualizationParameters::default();
        let text = |line: Line<'_>| line.spans.iter().map(|s| s.content.to_string()).collect::<String>();

        assert!(text(footer_line(&params)).starts_with("● live 10ms / zoom 1.00"));
        params.toggle_pause();
        assert!(text(footer_line(&params)).starts_with("⏸ paused"));
    }
}

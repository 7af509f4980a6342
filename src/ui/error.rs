//! Full-screen error display shown when the waterfall cannot start.

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io::{self, Stdout};

/// Error screen with a titled panel, dismissed by any key.
pub struct ErrorScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
}

impl ErrorScreen {
    /// Enters the alternate screen in raw mode.
    ///
    /// # Errors
    /// - If raw mode or the alternate screen cannot be entered
    pub fn new() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(ErrorScreen {
            terminal,
            active: true,
        })
    }

    /// Shows `title` and `message` centred on a dark red panel until a key
    /// is pressed.
    ///
    /// # Errors
    /// - If terminal rendering or event polling fails
    pub fn show_error(&mut self, title: &str, message: &str) -> anyhow::Result<()> {
        let panel_style = Style::default()
            .fg(Color::Rgb(255, 255, 255))
            .bg(Color::Rgb(120, 0, 0));

        loop {
            self.terminal.draw(|frame| {
                let area = frame.area();
                let panel = centered(area, 70, 50);

                let text = Text::from(vec![
                    Line::from(message.to_string()),
                    Line::from(""),
                    Line::from(Span::styled(
                        "Press any key to exit",
                        Style::default().add_modifier(Modifier::DIM),
                    )),
                ]);

                let paragraph = Paragraph::new(text)
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .title(format!(" {title} ")),
                    )
                    .style(panel_style)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true });

                frame.render_widget(paragraph, panel);
            })?;

            if event::poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(_) = event::read()? {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Leaves the alternate screen and restores the terminal.
    ///
    /// # Errors
    /// - If terminal mode cannot be restored
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
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

impl Drop for ErrorScreen {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// A rectangle of the given percentage size centred in `area`.
fn centered(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let scale = |length: u16, percent: u16| (u32::from(length) * u32::from(percent) / 100) as u16;
    let width = scale(area.width, width_percent);
    let height = scale(area.height, height_percent);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

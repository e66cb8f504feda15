//! The character display

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

pub const DISPLAY_WIDTH: usize = 16;
pub const DISPLAY_HEIGHT: usize = 2;

/// Characters currently shown, one string per row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayState {
    rows: [String; DISPLAY_HEIGHT],
}

impl DisplayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        for row in self.rows.iter_mut() {
            row.clear();
        }
    }

    /// Replace a row, cutting it at the display width.
    pub fn set_row(&mut self, row: usize, text: &str) {
        if let Some(slot) = self.rows.get_mut(row) {
            *slot = text.chars().take(DISPLAY_WIDTH).collect();
        }
    }

    pub fn row(&self, row: usize) -> &str {
        self.rows.get(row).map_or("", String::as_str)
    }
}

/// Break text into display lines: at every newline and every
/// [`DISPLAY_WIDTH`] characters. Always at least one line.
pub fn wrap_text(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for part in text.split('\n') {
        let chars: Vec<char> = part.chars().collect();
        if chars.is_empty() {
            lines.push(String::new());
            continue;
        }
        lines.extend(chars.chunks(DISPLAY_WIDTH).map(|chunk| chunk.iter().collect()));
    }
    lines
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Render the display panel centered in `area`.
///
/// The border lights up while the program waits for a key.
pub fn render_display_pane(frame: &mut Frame, area: Rect, display: &DisplayState, is_waiting: bool) {
    let border_style = if is_waiting {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" ChipOS ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(border_style)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(DEFAULT_THEME.lcd_bg));

    let lines: Vec<Line> = (0..DISPLAY_HEIGHT)
        .map(|row| Line::from(format!("{:<width$}", display.row(row), width = DISPLAY_WIDTH)))
        .collect();

    let paragraph = Paragraph::new(lines).block(block).style(
        Style::default()
            .bg(DEFAULT_THEME.lcd_bg)
            .fg(DEFAULT_THEME.lcd_fg)
            .add_modifier(Modifier::BOLD),
    );

    let panel = centered(
        area,
        DISPLAY_WIDTH as u16 + 4,
        DISPLAY_HEIGHT as u16 + 2,
    );
    frame.render_widget(paragraph, panel);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_wrap_text_splits_long_lines() {
        assert_eq!(
            wrap_text("ABCDEFGHIJKLMNOPQRS"),
            vec!["ABCDEFGHIJKLMNOP", "QRS"]
        );
        assert_eq!(wrap_text("A\nB"), vec!["A", "B"]);
        assert_eq!(wrap_text(""), vec![""]);
    }

    #[test]
    fn test_rows_are_cut_at_display_width() {
        let mut display = DisplayState::new();
        display.set_row(1, "This line is far too long");
        assert_eq!(display.row(1), "This line is far");
        display.set_row(5, "ignored");
        display.clear();
        assert_eq!(display.row(1), "");
    }

    #[test]
    fn test_render_shows_both_rows() {
        let backend = TestBackend::new(30, 8);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut display = DisplayState::new();
        display.set_row(0, "Hello");
        display.set_row(1, "*World");
        terminal
            .draw(|frame| render_display_pane(frame, frame.area(), &display, true))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Hello"));
        assert!(text.contains("*World"));
        assert!(text.contains("ChipOS"));
    }
}

//! Status bar rendering with keybindings and state indicators

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// What the display is doing, shown on the right of the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Running,
    /// Showing printed text until a key is pressed
    Message,
    /// Editing a requested string or number
    Input,
    Menu,
}

/// Render the status bar at the bottom.
pub fn render_status_bar(frame: &mut Frame, area: Rect, message: &str, mode: DisplayMode) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let (label, color) = match mode {
        DisplayMode::Running => (" RUN ", DEFAULT_THEME.success),
        DisplayMode::Message => (" PRINT ", DEFAULT_THEME.primary),
        DisplayMode::Input => (" INPUT ", DEFAULT_THEME.secondary),
        DisplayMode::Menu => (" MENU ", DEFAULT_THEME.secondary),
    };

    let left_spans = vec![
        Span::styled(
            label,
            Style::default()
                .bg(color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " | ",
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!(" {} ", message),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.fg),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Left);

    frame.render_widget(left_paragraph, layout[0]);

    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.comment);

    let bindings: &[(&str, &str)] = match mode {
        DisplayMode::Running => &[(" esc ", " stop ")],
        DisplayMode::Message => &[(" ↑/↓ ", " scroll "), (" ↵ ", " continue "), (" esc ", " stop ")],
        DisplayMode::Input => &[(" ⌫ ", " erase "), (" ↵ ", " accept "), (" esc ", " stop ")],
        DisplayMode::Menu => &[(" ↑/↓ ", " choose "), (" ↵ ", " select "), (" esc ", " stop ")],
    };

    let mut right_spans = Vec::new();
    for (index, (key, description)) in bindings.iter().enumerate() {
        if index > 0 {
            right_spans.push(Span::styled("│", sep_style));
            right_spans.push(Span::styled(" ", desc_style));
        }
        right_spans.push(Span::styled(*key, key_style));
        right_spans.push(Span::styled(*description, desc_style));
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Right);

    frame.render_widget(right_paragraph, layout[1]);
}

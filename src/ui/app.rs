//! Character display console
//!
//! [`DisplayConsole`] emulates the 16×2 display and keypad the programs were
//! written for. It implements [`Console`], so the interpreter drives it
//! directly: every print, prompt and menu redraws the screen and then blocks
//! on the keyboard until the user answers.

use super::panes::{
    render_display_pane, render_status_bar, wrap_text, DisplayMode, DisplayState, DISPLAY_HEIGHT,
    DISPLAY_WIDTH,
};
use crate::interpreter::numbers::parse_number;
use crate::terminal::{Console, MenuChoice};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::collections::VecDeque;
use std::io;
use std::time::Duration;

/// Console drawing on a ratatui terminal
pub struct DisplayConsole<B: Backend> {
    terminal: Terminal<B>,

    /// What the display currently shows
    display: DisplayState,

    mode: DisplayMode,

    /// Message in the status bar
    status_message: String,

    /// Keys consumed before the keyboard is read
    pending_keys: VecDeque<KeyCode>,

    /// Whether to read the real keyboard once `pending_keys` runs out
    live_input: bool,
}

impl<B: Backend> DisplayConsole<B> {
    /// Create a console reading the keyboard through crossterm.
    pub fn new(terminal: Terminal<B>) -> Self {
        DisplayConsole {
            terminal,
            display: DisplayState::new(),
            mode: DisplayMode::Running,
            status_message: String::from("Ready"),
            pending_keys: VecDeque::new(),
            live_input: true,
        }
    }

    /// Create a console that only ever sees `keys`. Running out of keys
    /// counts as a cancel.
    pub fn with_keys(terminal: Terminal<B>, keys: impl IntoIterator<Item = KeyCode>) -> Self {
        let mut console = Self::new(terminal);
        console.pending_keys = keys.into_iter().collect();
        console.live_input = false;
        console
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    /// Show `message` in the status bar and wait for any key.
    pub fn wait_for_key(&mut self, message: &str) -> io::Result<()> {
        self.status_message = message.to_string();
        self.mode = DisplayMode::Message;
        self.draw()?;
        self.next_key().map(|_| ())
    }

    fn draw(&mut self) -> io::Result<()> {
        let display = &self.display;
        let mode = self.mode;
        let status = self.status_message.as_str();
        self.terminal
            .draw(|frame| render(frame, display, mode, status))?;
        Ok(())
    }

    fn next_key(&mut self) -> io::Result<KeyCode> {
        if let Some(code) = self.pending_keys.pop_front() {
            return Ok(code);
        }
        if !self.live_input {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no more keys"));
        }
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(key.code);
                }
            }
        }
    }

    /// Show `lines` from `top`, filling missing rows with blanks.
    fn show_lines(&mut self, lines: &[String], top: usize) {
        for row in 0..DISPLAY_HEIGHT {
            let text = lines.get(top + row).map_or("", String::as_str);
            self.display.set_row(row, text);
        }
    }

    /// Edit one line in place, accepting only characters `accept` allows.
    fn edit_line(&mut self, max_len: usize, accept: fn(char) -> bool) -> Option<String> {
        self.mode = DisplayMode::Input;
        self.status_message = String::from("Enter a value");
        let mut buffer = String::new();
        loop {
            // Keep the cursor visible on long input
            let shown = format!("{}_", buffer);
            let skip = shown.chars().count().saturating_sub(DISPLAY_WIDTH);
            let visible: String = shown.chars().skip(skip).collect();
            self.display.set_row(0, &visible);
            self.display.set_row(1, "");
            self.draw().ok()?;

            match self.next_key().ok()? {
                KeyCode::Enter => return Some(buffer),
                KeyCode::Esc => return None,
                KeyCode::Backspace => {
                    buffer.pop();
                }
                KeyCode::Char(character)
                    if accept(character) && buffer.chars().count() < max_len =>
                {
                    buffer.push(character);
                }
                _ => {}
            }
        }
    }
}

fn render(frame: &mut Frame, display: &DisplayState, mode: DisplayMode, status: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    render_display_pane(frame, chunks[0], display, mode != DisplayMode::Running);
    render_status_bar(frame, chunks[1], status, mode);
}

fn is_number_character(character: char) -> bool {
    character.is_ascii_digit() || matches!(character, '.' | 'e' | '-')
}

impl<B: Backend> Console for DisplayConsole<B> {
    fn print_text(&mut self, text: &str) -> bool {
        let lines = wrap_text(text);
        let mut top = 0;
        self.mode = DisplayMode::Message;
        self.status_message = String::from("Output");
        loop {
            self.show_lines(&lines, top);
            if self.draw().is_err() {
                return false;
            }
            match self.next_key() {
                Ok(KeyCode::Enter) => return true,
                Ok(KeyCode::Up) => top = top.saturating_sub(1),
                Ok(KeyCode::Down) => {
                    if top + DISPLAY_HEIGHT < lines.len() {
                        top += 1;
                    }
                }
                Ok(KeyCode::Esc) | Err(_) => return false,
                Ok(_) => {}
            }
        }
    }

    fn prompt_string(&mut self, max_len: usize) -> Option<String> {
        self.edit_line(max_len, |character| !character.is_control())
    }

    fn prompt_number(&mut self, max_len: usize) -> Option<f32> {
        let text = self.edit_line(max_len, is_number_character)?;
        Some(parse_number(text.as_bytes()))
    }

    fn present_menu(&mut self, title: &str, options: &[String]) -> MenuChoice {
        if options.is_empty() {
            return MenuChoice::Failed;
        }
        self.mode = DisplayMode::Menu;
        self.status_message = format!("{} options", options.len());
        let mut index = 0;
        loop {
            self.display.set_row(0, title);
            self.display.set_row(1, &format!("*{}", options[index]));
            if self.draw().is_err() {
                return MenuChoice::Failed;
            }
            match self.next_key() {
                Ok(KeyCode::Up | KeyCode::Left) => {
                    index = (index + options.len() - 1) % options.len();
                }
                Ok(KeyCode::Down | KeyCode::Right) => index = (index + 1) % options.len(),
                Ok(KeyCode::Enter) => return MenuChoice::Selected(index),
                Ok(KeyCode::Esc) => return MenuChoice::Cancelled,
                Ok(_) => {}
                Err(_) => return MenuChoice::Failed,
            }
        }
    }

    fn escape_pressed(&mut self) -> bool {
        if !self.live_input {
            if self.pending_keys.front() == Some(&KeyCode::Esc) {
                self.pending_keys.pop_front();
                return true;
            }
            return false;
        }
        while matches!(event::poll(Duration::ZERO), Ok(true)) {
            match event::read() {
                Ok(Event::Key(key))
                    if key.kind == KeyEventKind::Press && key.code == KeyCode::Esc =>
                {
                    return true;
                }
                Ok(_) => {}
                Err(_) => return false,
            }
        }
        false
    }

    fn show_running(&mut self) {
        self.mode = DisplayMode::Running;
        self.status_message = String::from("Running");
        self.display.clear();
        self.display.set_row(0, "Running...");
        if let Err(err) = self.draw() {
            log::warn!("failed to draw display: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn scripted(keys: &[KeyCode]) -> DisplayConsole<TestBackend> {
        let terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
        DisplayConsole::with_keys(terminal, keys.iter().copied())
    }

    #[test]
    fn test_print_scrolls_then_continues() {
        let mut console = scripted(&[KeyCode::Down, KeyCode::Down, KeyCode::Enter]);
        assert!(console.print_text("one\ntwo\nthree"));
        // Scrolling stops once the last line reaches the bottom row
        assert_eq!(console.display().row(0), "two");
        assert_eq!(console.display().row(1), "three");
    }

    #[test]
    fn test_print_cancelled_by_escape() {
        let mut console = scripted(&[KeyCode::Esc]);
        assert!(!console.print_text("Hello"));
        assert_eq!(console.display().row(0), "Hello");
    }

    #[test]
    fn test_prompt_number_filters_keys() {
        let mut console = scripted(&[
            KeyCode::Char('1'),
            KeyCode::Char('x'),
            KeyCode::Char('2'),
            KeyCode::Backspace,
            KeyCode::Char('5'),
            KeyCode::Char('.'),
            KeyCode::Char('5'),
            KeyCode::Enter,
        ]);
        assert_eq!(console.prompt_number(20), Some(15.5));
    }

    #[test]
    fn test_prompt_string_respects_length() {
        let keys: Vec<KeyCode> = "abcdef"
            .chars()
            .map(KeyCode::Char)
            .chain([KeyCode::Enter])
            .collect();
        let mut console = scripted(&keys);
        assert_eq!(console.prompt_string(3), Some("abc".to_string()));
    }

    #[test]
    fn test_prompt_cancelled_when_keys_run_out() {
        let mut console = scripted(&[KeyCode::Char('a')]);
        assert_eq!(console.prompt_string(10), None);
    }

    #[test]
    fn test_menu_wraps_around() {
        let options = vec!["Red".to_string(), "Green".to_string(), "Blue".to_string()];
        let mut console = scripted(&[KeyCode::Up, KeyCode::Enter]);
        assert_eq!(console.present_menu("Color?", &options), MenuChoice::Selected(2));
        assert_eq!(console.display().row(0), "Color?");
        assert_eq!(console.display().row(1), "*Blue");

        let mut console = scripted(&[KeyCode::Esc]);
        assert_eq!(console.present_menu("Color?", &options), MenuChoice::Cancelled);
    }

    #[test]
    fn test_escape_only_consumes_escape() {
        let mut console = scripted(&[KeyCode::Enter, KeyCode::Esc]);
        assert!(!console.escape_pressed());
        assert!(console.print_text("x"));
        assert!(console.escape_pressed());
    }
}

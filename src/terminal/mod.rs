//! User-facing collaborators of the interpreter
//!
//! The interpreter never draws or reads keys itself. Everything it shows or
//! asks for goes through [`Console`], which the host implements:
//! - [`MockTerminal`]: scripted input and captured output for tests
//! - [`StdioConsole`]: plain line-oriented standard input and output
//! - `ui::DisplayConsole`: the full-screen character display emulator

mod mock;
mod stdio;

pub use mock::{MockTerminal, ScriptedInput};
pub use stdio::StdioConsole;

/// Result of [`Console::present_menu`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Selected(usize),
    Cancelled,
    /// The menu could not be shown
    Failed,
}

pub trait Console {
    /// Show text and wait for the user to acknowledge it. Returns false when
    /// the user cancels instead.
    fn print_text(&mut self, text: &str) -> bool;

    /// Ask for a line of text of at most `max_len` characters. `None` on cancel.
    fn prompt_string(&mut self, max_len: usize) -> Option<String>;

    /// Ask for a number typed in at most `max_len` characters. `None` on cancel.
    fn prompt_number(&mut self, max_len: usize) -> Option<f32>;

    fn present_menu(&mut self, title: &str, options: &[String]) -> MenuChoice;

    /// Polled once per statement; true aborts the running program.
    fn escape_pressed(&mut self) -> bool {
        false
    }

    /// Called whenever the program resumes running after user interaction.
    fn show_running(&mut self) {}
}

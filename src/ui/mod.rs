//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: the [`DisplayConsole`], keyboard handling for prints, prompts and menus
//! - **[`panes`]**: stateless render functions for the display panel and status bar
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! Construct a [`DisplayConsole`] over a terminal and hand it to an
//! [`Interpreter`] as its console.
//!
//! [`Interpreter`]: crate::interpreter::engine::Interpreter

pub mod app;
pub mod panes;
pub mod theme;

pub use app::DisplayConsole;

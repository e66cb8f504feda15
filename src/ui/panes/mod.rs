//! TUI pane rendering
//!
//! - [`display`]: the 16×2 character display panel
//! - [`status`]: status bar with keybindings and the display mode
//!
//! Both are stateless render functions; the state they draw lives in
//! [`DisplayConsole`](crate::ui::DisplayConsole).

pub mod display;
pub mod status;

pub use display::{render_display_pane, wrap_text, DisplayState, DISPLAY_HEIGHT, DISPLAY_WIDTH};
pub use status::{render_status_bar, DisplayMode};

//! The two panels composed by the session controller.

pub mod input;
pub mod output;
pub mod scroll_view;
pub mod text_field;

pub use input::{FocusField, InputAction, InputPanel};
pub use output::{OutputPanel, OutputPhase};
pub use scroll_view::ScrollView;
pub use text_field::{TextField, TextFieldAction};

pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub(crate) fn spinner_char(frame: usize) -> &'static str {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}

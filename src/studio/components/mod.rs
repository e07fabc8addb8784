//! Shared UI components for the studio
//!
//! - `diff_view`: colored single-file diff with scrolling
//! - `text_input`: single-line editor for messages and names

pub mod diff_view;
pub mod text_input;

pub use diff_view::{DiffLine, DiffLineType, DiffViewState, parse_diff, render_diff_view};
pub use text_input::{InputOutcome, TextInput, render_text_input};

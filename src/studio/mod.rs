//! Studio - keyboard-driven Git workspace
//!
//! Four tabs over one repository:
//! - **Workspace**: stage files, preview diffs, resolve merge conflicts
//! - **Commit**: pick a suggested conventional commit or write one
//! - **Branches**: checkout, create, delete and compare branches
//! - **Tools**: undo, interactive rebase, history and remote sync
//!
//! State changes only through [`reduce`]; git work runs in background tasks
//! whose results come back as [`StudioEvent`]s.

mod app;
mod events;
mod executor;
mod reducer;
mod render;
mod state;
mod theme;

pub mod components;

#[cfg(test)]
mod tests;

pub use app::{StudioApp, run_studio};
pub use events::{SideEffect, StudioEvent};
pub use executor::{Executor, execute};
pub use reducer::{reduce, startup};
pub use state::{
    AppState, InputField, PendingConfirmation, StatusLevel, StatusMessage, Tab, ToolMode,
    WorkspaceView,
};

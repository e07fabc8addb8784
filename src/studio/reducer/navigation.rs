//! Tab switching and the layered escape key

use super::super::events::SideEffect;
use super::super::state::{AppState, StatusLevel, Tab, ToolMode, WorkspaceView};

/// Enter `tab`, returning the loads it needs
pub(super) fn switch_tab(state: &mut AppState, tab: Tab) -> Vec<SideEffect> {
    let effects = match tab {
        Tab::Workspace => SideEffect::refresh(),
        Tab::Commit => {
            if state.staged_count() == 0 {
                state.notify(
                    StatusLevel::Info,
                    "No staged changes. Stage files before committing",
                );
                return Vec::new();
            }
            vec![
                SideEffect::LoadChanges,
                SideEffect::LoadRecent(state.settings.recent_limit),
            ]
        }
        Tab::Branches => {
            state.branches.comparison = None;
            vec![SideEffect::LoadBranches]
        }
        Tab::Tools => {
            state.tools.mode = ToolMode::Menu;
            Vec::new()
        }
    };

    state.tab = tab;
    effects
}

/// Escape unwinds one level per press: input focus, then the innermost
/// sub-view, then a pending confirmation.
pub(super) fn escape(state: &mut AppState) {
    if state.focus.take().is_some() {
        return;
    }

    if close_sub_view(state) {
        return;
    }

    if state.pending.take().is_some() {
        state.notify(StatusLevel::Info, "Action cancelled");
    }
}

fn close_sub_view(state: &mut AppState) -> bool {
    match state.tab {
        Tab::Workspace => {
            let workspace = &mut state.workspace;
            match workspace.view {
                WorkspaceView::Diff | WorkspaceView::Conflicts => {
                    workspace.view = WorkspaceView::Files;
                    if !workspace.preview {
                        workspace.diff = None;
                    }
                    true
                }
                WorkspaceView::Files if workspace.preview => {
                    workspace.preview = false;
                    workspace.diff = None;
                    true
                }
                WorkspaceView::Files => false,
            }
        }
        Tab::Commit => false,
        Tab::Branches => state.branches.comparison.take().is_some(),
        Tab::Tools => {
            if state.tools.mode == ToolMode::Menu {
                false
            } else {
                state.tools.mode = ToolMode::Menu;
                true
            }
        }
    }
}

//! Key handling, global bindings first and then per tab

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::components::InputOutcome;
use super::super::events::SideEffect;
use super::super::state::{
    AppState, HistorySource, InputField, PendingConfirmation, StatusLevel, Tab, ToolMode,
    UndoEntry, WorkspaceView,
};
use super::clamp;
use super::navigation::{escape, switch_tab};
use crate::conflict::{ResolutionStrategy, all_resolved};
use crate::git::{MAX_REBASE_COUNT, RebaseAction, comparison_target, parse_rebase_count};

/// Lines moved per page in the diff view
const PAGE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Movement {
    Up,
    Down,
}

fn movement(key: KeyEvent) -> Option<Movement> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Movement::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Movement::Down),
        _ => None,
    }
}

/// Move a list cursor over `len` rows
fn step(selected: usize, len: usize, movement: Movement) -> usize {
    match movement {
        Movement::Up => selected.saturating_sub(1),
        Movement::Down => clamp(selected + 1, len),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Global Keys
// ═══════════════════════════════════════════════════════════════════════════════

pub(super) fn reduce_key(state: &mut AppState, key: KeyEvent) -> Vec<SideEffect> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return vec![SideEffect::Quit];
    }

    if key.code == KeyCode::Esc {
        escape(state);
        return Vec::new();
    }

    if let Some(field) = state.focus {
        return input_key(state, field, key);
    }

    match key.code {
        KeyCode::Char('q') => return vec![SideEffect::Quit],
        KeyCode::Char('y') => return confirm(state),
        KeyCode::Char(c @ '1'..='4') => {
            if let Some(tab) = Tab::from_digit(c) {
                return switch_tab(state, tab);
            }
        }
        KeyCode::Tab => {
            let next = state.tab.next();
            return switch_tab(state, next);
        }
        _ => {}
    }

    match state.tab {
        Tab::Workspace => workspace_key(state, key),
        Tab::Commit => commit_key(state, key),
        Tab::Branches => branches_key(state, key),
        Tab::Tools => tools_key(state, key),
    }
}

/// Consume the pending token, but only from the view that issued it
fn confirm(state: &mut AppState) -> Vec<SideEffect> {
    let (tab, mode) = (state.tab, state.tools.mode);
    let Some(pending) = state.pending.take_if(|pending| pending.matches(tab, mode)) else {
        return Vec::new();
    };

    match pending {
        PendingConfirmation::DeleteBranch(name) => {
            state.notify(StatusLevel::Info, format!("Deleting branch {name}..."));
            vec![SideEffect::DeleteBranch(name)]
        }
        PendingConfirmation::Reset(mode) => {
            state.notify(StatusLevel::Info, format!("Running {mode} reset..."));
            vec![SideEffect::Reset(mode)]
        }
        PendingConfirmation::Rebase => {
            if state.tools.rebase_plan.is_empty() {
                state.notify(StatusLevel::Error, "No rebase plan loaded");
                return Vec::new();
            }
            state.notify(StatusLevel::Info, "Rebasing...");
            vec![SideEffect::ExecuteRebase(state.tools.rebase_plan.clone())]
        }
    }
}

fn input_key(state: &mut AppState, field: InputField, key: KeyEvent) -> Vec<SideEffect> {
    let input = match field {
        InputField::CommitMessage => &mut state.commit.input,
        InputField::NewBranch => &mut state.branches.new_branch,
        InputField::RebaseCount => &mut state.tools.rebase_count,
    };
    if input.handle_key(key) != InputOutcome::Submitted {
        return Vec::new();
    }
    let value = input.value().trim().to_string();

    match field {
        InputField::CommitMessage => {
            if value.is_empty() {
                state.notify(StatusLevel::Error, "Commit message cannot be empty");
                return Vec::new();
            }
            state.focus = None;
            vec![SideEffect::Commit(value)]
        }
        InputField::NewBranch => {
            if value.is_empty() {
                state.notify(StatusLevel::Error, "Branch name cannot be empty");
                return Vec::new();
            }
            state.focus = None;
            state.branches.new_branch.clear();
            vec![SideEffect::CreateBranch(value)]
        }
        InputField::RebaseCount => match parse_rebase_count(&value) {
            Some(count) => {
                state.focus = None;
                vec![SideEffect::LoadRebasePlan(count)]
            }
            None => {
                state.notify(
                    StatusLevel::Error,
                    format!("Enter a number of commits between 1 and {MAX_REBASE_COUNT}"),
                );
                Vec::new()
            }
        },
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Workspace
// ═══════════════════════════════════════════════════════════════════════════════

fn workspace_key(state: &mut AppState, key: KeyEvent) -> Vec<SideEffect> {
    match state.workspace.view {
        WorkspaceView::Files => files_key(state, key),
        WorkspaceView::Diff => {
            if let Some(diff) = state.workspace.diff.as_mut() {
                match key.code {
                    KeyCode::Up | KeyCode::Char('k') => diff.scroll_up(1),
                    KeyCode::Down | KeyCode::Char('j') => diff.scroll_down(1),
                    KeyCode::PageUp => diff.scroll_up(PAGE),
                    KeyCode::PageDown => diff.scroll_down(PAGE),
                    _ => {}
                }
            }
            Vec::new()
        }
        WorkspaceView::Conflicts => conflicts_key(state, key),
    }
}

fn files_key(state: &mut AppState, key: KeyEvent) -> Vec<SideEffect> {
    let workspace = &mut state.workspace;

    if let Some(direction) = movement(key) {
        workspace.selected = step(workspace.selected, workspace.changes.len(), direction);
        return match workspace.selected_change() {
            Some(change) if workspace.preview => vec![SideEffect::LoadDiff(change.path.clone())],
            _ => Vec::new(),
        };
    }

    let selected_path = workspace.selected_change().map(|change| change.path.clone());

    match key.code {
        KeyCode::Char(' ') => selected_path
            .map(SideEffect::ToggleStaging)
            .into_iter()
            .collect(),
        KeyCode::Char('a') => vec![SideEffect::StageAll],
        KeyCode::Char('R') => {
            if state.staged_count() == 0 {
                state.notify(StatusLevel::Info, "Nothing staged to unstage");
                return Vec::new();
            }
            vec![SideEffect::UnstageAll]
        }
        KeyCode::Char('r') => SideEffect::refresh(),
        KeyCode::Char('v') => {
            workspace.preview = !workspace.preview;
            if !workspace.preview {
                workspace.diff = None;
            }
            match selected_path {
                Some(path) if workspace.preview => vec![SideEffect::LoadDiff(path)],
                _ => Vec::new(),
            }
        }
        KeyCode::Char('d') | KeyCode::Enter => {
            let Some(path) = selected_path else {
                state.notify(StatusLevel::Info, "No file selected");
                return Vec::new();
            };
            workspace.view = WorkspaceView::Diff;
            vec![SideEffect::LoadDiff(path)]
        }
        _ => Vec::new(),
    }
}

fn conflicts_key(state: &mut AppState, key: KeyEvent) -> Vec<SideEffect> {
    let workspace = &mut state.workspace;

    if let Some(direction) = movement(key) {
        workspace.conflict_selected = step(
            workspace.conflict_selected,
            workspace.conflicts.len(),
            direction,
        );
        return Vec::new();
    }

    let strategy = match key.code {
        KeyCode::Char('o') => ResolutionStrategy::Ours,
        KeyCode::Char('t') => ResolutionStrategy::Theirs,
        KeyCode::Char('b') => ResolutionStrategy::Both,
        KeyCode::Char('c') => {
            if all_resolved(&workspace.conflicts) {
                state.notify(StatusLevel::Info, "Continuing merge...");
                return vec![SideEffect::ContinueMerge];
            }
            state.notify(
                StatusLevel::Info,
                "Resolve every conflicted file before continuing",
            );
            return Vec::new();
        }
        KeyCode::Char('r') => return vec![SideEffect::LoadConflicts],
        _ => return Vec::new(),
    };

    match workspace.selected_conflict() {
        Some(file) if file.resolved => {
            let text = format!("{} is already resolved", file.path);
            state.notify(StatusLevel::Info, text);
            Vec::new()
        }
        Some(file) => vec![SideEffect::ResolveConflict {
            path: file.path.clone(),
            strategy,
        }],
        None => Vec::new(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commit
// ═══════════════════════════════════════════════════════════════════════════════

fn commit_key(state: &mut AppState, key: KeyEvent) -> Vec<SideEffect> {
    let commit = &mut state.commit;

    if let Some(direction) = movement(key) {
        commit.selected = step(commit.selected, commit.suggestions.len() + 1, direction);
        return Vec::new();
    }

    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some(suggestion) = commit.selected_suggestion() {
                return vec![SideEffect::Commit(suggestion.message.clone())];
            }
            state.focus = Some(InputField::CommitMessage);
            Vec::new()
        }
        KeyCode::Char('c') => {
            state.focus = Some(InputField::CommitMessage);
            Vec::new()
        }
        KeyCode::Char('A') => {
            let message = commit
                .selected_suggestion()
                .map(|suggestion| suggestion.message.clone())
                .or_else(|| {
                    let custom = commit.input.value().trim();
                    (!custom.is_empty()).then(|| custom.to_string())
                });
            match message {
                Some(message) => vec![SideEffect::Amend(message)],
                None => {
                    state.notify(
                        StatusLevel::Info,
                        "Select a suggestion or type a message to amend with",
                    );
                    Vec::new()
                }
            }
        }
        KeyCode::Char('r') => vec![SideEffect::LoadChanges],
        _ => Vec::new(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Branches
// ═══════════════════════════════════════════════════════════════════════════════

fn branches_key(state: &mut AppState, key: KeyEvent) -> Vec<SideEffect> {
    let branches = &mut state.branches;

    if let Some(direction) = movement(key) {
        branches.selected = step(branches.selected, branches.branches.len(), direction);
        return Vec::new();
    }

    let selected = branches.selected_branch().cloned();

    match key.code {
        KeyCode::Enter => match selected {
            Some(branch) if branch.is_current => {
                state.notify(StatusLevel::Info, format!("Already on {}", branch.name));
                Vec::new()
            }
            Some(branch) => vec![SideEffect::Checkout(branch.name)],
            None => Vec::new(),
        },
        KeyCode::Char('n') => {
            state.focus = Some(InputField::NewBranch);
            Vec::new()
        }
        KeyCode::Char('d') => match selected {
            Some(branch) if branch.is_current => {
                state.notify(StatusLevel::Error, "Cannot delete the current branch");
                Vec::new()
            }
            Some(branch) => {
                state.request_confirmation(PendingConfirmation::DeleteBranch(branch.name));
                Vec::new()
            }
            None => Vec::new(),
        },
        KeyCode::Char('c') => {
            let target = comparison_target(&branches.branches);
            vec![SideEffect::CompareBranches(target.to_string())]
        }
        KeyCode::Char('r') => vec![SideEffect::LoadBranches],
        _ => Vec::new(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tools
// ═══════════════════════════════════════════════════════════════════════════════

fn tools_key(state: &mut AppState, key: KeyEvent) -> Vec<SideEffect> {
    match state.tools.mode {
        ToolMode::Menu => menu_key(state, key),
        ToolMode::Undo => undo_key(state, key),
        ToolMode::Rebase => rebase_key(state, key),
        ToolMode::History => history_key(state, key),
        ToolMode::Remote => remote_key(state, key),
    }
}

fn menu_key(state: &mut AppState, key: KeyEvent) -> Vec<SideEffect> {
    let tools = &mut state.tools;

    if let Some(direction) = movement(key) {
        tools.menu_selected = step(tools.menu_selected, ToolMode::MENU.len(), direction);
        return Vec::new();
    }
    if key.code != KeyCode::Enter {
        return Vec::new();
    }

    let Some(&mode) = ToolMode::MENU.get(tools.menu_selected) else {
        return Vec::new();
    };
    tools.mode = mode;

    match mode {
        ToolMode::Undo => {
            tools.undo_selected = 0;
            Vec::new()
        }
        ToolMode::Rebase => {
            tools.rebase_plan.clear();
            tools.rebase_selected = 0;
            tools.rebase_count.clear();
            state.focus = Some(InputField::RebaseCount);
            Vec::new()
        }
        ToolMode::History => {
            tools.history_source = HistorySource::Log;
            vec![SideEffect::LoadHistory(state.settings.history_limit)]
        }
        ToolMode::Menu | ToolMode::Remote => Vec::new(),
    }
}

fn undo_key(state: &mut AppState, key: KeyEvent) -> Vec<SideEffect> {
    let tools = &mut state.tools;

    if let Some(direction) = movement(key) {
        tools.undo_selected = step(tools.undo_selected, UndoEntry::ALL.len(), direction);
        return Vec::new();
    }
    if key.code != KeyCode::Enter {
        return Vec::new();
    }

    match UndoEntry::ALL.get(tools.undo_selected) {
        Some(UndoEntry::Reset(mode)) => {
            state.request_confirmation(PendingConfirmation::Reset(*mode));
            Vec::new()
        }
        Some(UndoEntry::Reflog) => {
            tools.mode = ToolMode::History;
            tools.history_source = HistorySource::Reflog;
            vec![SideEffect::LoadReflog(state.settings.history_limit)]
        }
        None => Vec::new(),
    }
}

fn rebase_key(state: &mut AppState, key: KeyEvent) -> Vec<SideEffect> {
    let tools = &mut state.tools;

    if tools.rebase_plan.is_empty() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Char('n')) {
            state.focus = Some(InputField::RebaseCount);
        }
        return Vec::new();
    }

    if let Some(direction) = movement(key) {
        tools.rebase_selected = step(tools.rebase_selected, tools.rebase_plan.len(), direction);
        return Vec::new();
    }

    let action = match key.code {
        KeyCode::Char('p') => RebaseAction::Pick,
        KeyCode::Char('s') => RebaseAction::Squash,
        KeyCode::Char('r') => RebaseAction::Reword,
        KeyCode::Char('d') => RebaseAction::Drop,
        KeyCode::Char('f') => RebaseAction::Fixup,
        KeyCode::Enter => {
            let folds_into_nothing = tools.rebase_plan.first().is_some_and(|commit| {
                matches!(commit.action, RebaseAction::Squash | RebaseAction::Fixup)
            });
            if folds_into_nothing {
                state.notify(
                    StatusLevel::Error,
                    "The oldest commit cannot be squashed or fixed up",
                );
            } else {
                state.request_confirmation(PendingConfirmation::Rebase);
            }
            return Vec::new();
        }
        _ => return Vec::new(),
    };

    if let Some(commit) = tools.rebase_plan.get_mut(tools.rebase_selected) {
        commit.action = action;
    }
    Vec::new()
}

fn history_key(state: &mut AppState, key: KeyEvent) -> Vec<SideEffect> {
    let tools = &mut state.tools;

    if let Some(direction) = movement(key) {
        tools.history_selected = step(tools.history_selected, tools.history.len(), direction);
        return Vec::new();
    }

    match key.code {
        KeyCode::Char('r') => {
            let limit = state.settings.history_limit;
            match tools.history_source {
                HistorySource::Log => vec![SideEffect::LoadHistory(limit)],
                HistorySource::Reflog => vec![SideEffect::LoadReflog(limit)],
            }
        }
        KeyCode::Char('c') => {
            if let Some(commit) = tools.history.get(tools.history_selected) {
                let text = format!("Commit {}: {}", commit.hash, commit.subject);
                state.notify(StatusLevel::Info, text);
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn remote_key(state: &mut AppState, key: KeyEvent) -> Vec<SideEffect> {
    let (effect, text) = match key.code {
        KeyCode::Char('p') => (SideEffect::Push, "Pushing..."),
        KeyCode::Char('l') => (SideEffect::Pull, "Pulling..."),
        KeyCode::Char('f') => (SideEffect::Fetch, "Fetching..."),
        _ => return Vec::new(),
    };
    state.notify(StatusLevel::Info, text);
    vec![effect]
}

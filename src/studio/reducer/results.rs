//! Folding task results back into state

use super::super::components::DiffViewState;
use super::super::events::{SideEffect, StudioEvent};
use super::super::state::{AppState, HistorySource, InputField, StatusLevel, WorkspaceView};
use super::clamp;
use crate::conflict::{ConflictFile, all_resolved};
use crate::git::ops::{CommitOutcome, DeleteOutcome, PushOutcome, StagingChange};
use crate::git::{ChangeRecord, CommitRecord};

pub(super) fn reduce_result(state: &mut AppState, event: StudioEvent) -> Vec<SideEffect> {
    match event {
        // ─────────────────────────────────────────────────────────────────────────
        // Snapshots
        // ─────────────────────────────────────────────────────────────────────────
        StudioEvent::StatusLoaded(status) => {
            state.repo = Some(status);
            Vec::new()
        }

        StudioEvent::ChangesLoaded(changes) => changes_loaded(state, changes),

        StudioEvent::SuggestionsLoaded(set) => {
            let same_files = set.annotated.len() == state.workspace.changes.len()
                && set
                    .annotated
                    .iter()
                    .zip(&state.workspace.changes)
                    .all(|(annotated, current)| annotated.path == current.path);
            // Results arrive in any order; a set built for another change list is stale
            if !same_files {
                return Vec::new();
            }
            state.workspace.changes = set.annotated;
            state.commit.suggestions = set.suggestions;
            state.commit.selected = state.commit.selected.min(state.commit.suggestions.len());
            Vec::new()
        }

        StudioEvent::ConflictsLoaded(files) => {
            let workspace = &mut state.workspace;
            let has_conflicts = !files.is_empty();
            workspace.conflicts = merge_conflicts(std::mem::take(&mut workspace.conflicts), files);
            workspace.conflict_selected =
                clamp(workspace.conflict_selected, workspace.conflicts.len());
            if has_conflicts {
                workspace.view = WorkspaceView::Conflicts;
            } else if workspace.view == WorkspaceView::Conflicts {
                workspace.view = WorkspaceView::Files;
            }
            Vec::new()
        }

        StudioEvent::DiffLoaded { path, diff } => {
            let workspace = &mut state.workspace;
            let still_selected = workspace
                .selected_change()
                .is_some_and(|change| change.path == path);
            if !still_selected {
                return Vec::new();
            }

            if diff.trim().is_empty() {
                workspace.diff = None;
                if workspace.view == WorkspaceView::Diff {
                    workspace.view = WorkspaceView::Files;
                }
                state.notify(StatusLevel::Info, "No changes to display");
            } else {
                workspace.diff = Some(DiffViewState::new(path, &diff));
            }
            Vec::new()
        }

        StudioEvent::RecentLoaded(commits) => {
            state.commit.recent = commits;
            Vec::new()
        }

        StudioEvent::BranchesLoaded(branches) => {
            state.branches.selected = clamp(state.branches.selected, branches.len());
            state.branches.branches = branches;
            Vec::new()
        }

        StudioEvent::ComparisonLoaded(comparison) => {
            state.branches.comparison = Some(comparison);
            Vec::new()
        }

        StudioEvent::HistoryLoaded(commits) => {
            history_loaded(state, HistorySource::Log, commits);
            Vec::new()
        }

        StudioEvent::ReflogLoaded(entries) => {
            history_loaded(state, HistorySource::Reflog, entries);
            Vec::new()
        }

        StudioEvent::RebasePlanLoaded(plan) => {
            if plan.is_empty() {
                state.notify(StatusLevel::Error, "No commits to rebase");
                state.focus = Some(InputField::RebaseCount);
            } else {
                state.tools.rebase_plan = plan;
                state.tools.rebase_selected = 0;
                state.notify(
                    StatusLevel::Info,
                    "Set actions with p/s/r/d/f, then Enter to execute",
                );
            }
            Vec::new()
        }

        // ─────────────────────────────────────────────────────────────────────────
        // Mutations
        // ─────────────────────────────────────────────────────────────────────────
        StudioEvent::StagingToggled { path, change } => {
            let verb = match change {
                StagingChange::Staged => "Staged",
                StagingChange::Unstaged => "Unstaged",
            };
            state.notify(StatusLevel::Success, format!("{verb} {path}"));
            SideEffect::refresh()
        }

        StudioEvent::AllStaged => {
            state.notify(StatusLevel::Success, "Staged all changes");
            SideEffect::refresh()
        }

        StudioEvent::AllUnstaged(0) => {
            state.notify(StatusLevel::Info, "Nothing staged to unstage");
            Vec::new()
        }

        StudioEvent::AllUnstaged(count) => {
            state.notify(StatusLevel::Success, format!("Unstaged {count} files"));
            SideEffect::refresh()
        }

        StudioEvent::Committed(CommitOutcome::NothingStaged) => {
            state.notify(StatusLevel::Info, "No staged changes to commit");
            Vec::new()
        }

        StudioEvent::Committed(CommitOutcome::Committed { message }) => {
            state.commit.input.clear();
            state.commit.selected = 0;
            state.notify(StatusLevel::Success, format!("Committed: {message}"));
            after_commit(state)
        }

        StudioEvent::Amended(message) => {
            state.notify(StatusLevel::Success, format!("Amended last commit: {message}"));
            after_commit(state)
        }

        StudioEvent::CheckedOut(name) => {
            state.notify(StatusLevel::Success, format!("Switched to branch {name}"));
            let mut effects = SideEffect::refresh();
            effects.push(SideEffect::LoadBranches);
            effects
        }

        StudioEvent::BranchCreated(name) => {
            state.notify(
                StatusLevel::Success,
                format!("Created and switched to branch {name}"),
            );
            let mut effects = SideEffect::refresh();
            effects.push(SideEffect::LoadBranches);
            effects
        }

        StudioEvent::BranchDeleted { name, outcome } => {
            let text = match outcome {
                DeleteOutcome::Deleted => format!("Deleted branch {name}"),
                DeleteOutcome::ForceDeleted => format!("Force-deleted unmerged branch {name}"),
            };
            state.notify(StatusLevel::Success, text);
            vec![SideEffect::LoadBranches]
        }

        StudioEvent::ResetDone(mode) => {
            state.notify(StatusLevel::Success, format!("Completed {mode} reset to HEAD~1"));
            after_commit(state)
        }

        StudioEvent::RebaseFinished => {
            state.tools.rebase_plan.clear();
            state.tools.rebase_selected = 0;
            state.notify(StatusLevel::Success, "Rebase complete");
            after_commit(state)
        }

        StudioEvent::Pushed(PushOutcome::NothingToPush) => {
            state.notify(StatusLevel::Info, "Nothing to push");
            Vec::new()
        }

        StudioEvent::Pushed(PushOutcome::Pushed {
            output,
            last_commit,
        }) => {
            state.tools.last_push = Some(output);
            state.notify(StatusLevel::Success, format!("Pushed {last_commit}"));
            vec![SideEffect::LoadStatus]
        }

        StudioEvent::Pulled(output) => {
            let summary = output.lines().next_back().unwrap_or("Already up to date").to_string();
            state.notify(StatusLevel::Success, format!("Pulled: {summary}"));
            SideEffect::refresh()
        }

        StudioEvent::Fetched => {
            state.notify(StatusLevel::Success, "Fetched from remote");
            vec![SideEffect::LoadStatus]
        }

        StudioEvent::ConflictResolved { path, strategy } => {
            if let Some(file) = state
                .workspace
                .conflicts
                .iter_mut()
                .find(|file| file.path == path)
            {
                file.resolved = true;
            }
            if all_resolved(&state.workspace.conflicts) {
                state.notify(
                    StatusLevel::Success,
                    "All conflicts resolved. Press c to continue the merge",
                );
            } else {
                state.notify(
                    StatusLevel::Success,
                    format!("Resolved {path} using {strategy}"),
                );
            }
            SideEffect::refresh()
        }

        StudioEvent::MergeContinued => {
            state.workspace.conflicts.clear();
            state.workspace.conflict_selected = 0;
            state.workspace.view = WorkspaceView::Files;
            state.notify(StatusLevel::Success, "Merge completed");
            after_commit(state)
        }

        StudioEvent::TaskFailed { action, error } => {
            state.notify(StatusLevel::Error, format!("Failed to {action}: {error}"));
            Vec::new()
        }

        StudioEvent::Key(_) | StudioEvent::Tick(_) => Vec::new(),
    }
}

/// Replace the change list and decide what to derive from it
fn changes_loaded(
    state: &mut AppState,
    changes: Vec<ChangeRecord>,
) -> Vec<SideEffect> {
    let workspace = &mut state.workspace;
    workspace.selected = clamp(workspace.selected, changes.len());
    workspace.changes = changes;

    if workspace.changes.iter().any(|change| change.is_conflicted()) {
        return vec![SideEffect::LoadConflicts];
    }

    // Resolved conflicts stay listed until the merge is continued
    if !workspace.conflicts.is_empty() && !all_resolved(&workspace.conflicts) {
        workspace.conflicts.clear();
        workspace.conflict_selected = 0;
        if workspace.view == WorkspaceView::Conflicts {
            workspace.view = WorkspaceView::Files;
        }
    }

    if workspace.changes.is_empty() {
        state.commit.suggestions.clear();
        state.commit.selected = 0;
        return Vec::new();
    }

    vec![SideEffect::LoadSuggestions {
        changes: workspace.changes.clone(),
        max_individual: state.settings.max_individual,
    }]
}

/// Files resolved earlier drop out of git's unmerged list; keep them so
/// progress stays visible until the merge is continued
fn merge_conflicts(previous: Vec<ConflictFile>, loaded: Vec<ConflictFile>) -> Vec<ConflictFile> {
    let mut merged: Vec<ConflictFile> = previous
        .into_iter()
        .filter(|file| file.resolved && !loaded.iter().any(|other| other.path == file.path))
        .collect();
    merged.extend(loaded);
    merged
}

fn history_loaded(
    state: &mut AppState,
    source: HistorySource,
    entries: Vec<CommitRecord>,
) {
    let tools = &mut state.tools;
    tools.history_source = source;
    tools.history_selected = clamp(tools.history_selected, entries.len());
    tools.history = entries;
}

/// Reload everything a new or rewritten commit changes
fn after_commit(state: &AppState) -> Vec<SideEffect> {
    let mut effects = SideEffect::refresh();
    effects.push(SideEffect::LoadRecent(state.settings.recent_limit));
    effects
}

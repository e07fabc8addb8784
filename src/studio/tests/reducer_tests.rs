//! Tests for the reducer

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::commit::{CommitSuggestion, CommitType, SuggestionSet};
use crate::conflict::{ConflictFile, ConflictRegion, ResolutionStrategy};
use crate::git::ops::{CommitOutcome, ResetMode};
use crate::git::{BranchRecord, ChangeRecord, RepoStatus, StatusSummary};
use crate::studio::components::DiffViewState;
use crate::studio::events::{SideEffect, StudioEvent};
use crate::studio::reducer::{reduce, startup};
use crate::studio::state::{
    AppState, InputField, PendingConfirmation, StatusLevel, Tab, ToolMode, WorkspaceView,
};

fn press(state: AppState, code: KeyCode) -> (AppState, Vec<SideEffect>) {
    reduce(state, StudioEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

fn press_char(state: AppState, c: char) -> (AppState, Vec<SideEffect>) {
    press(state, KeyCode::Char(c))
}

fn with_staged(staged: usize) -> AppState {
    AppState {
        repo: Some(RepoStatus {
            branch: "main".to_string(),
            summary: StatusSummary {
                staged,
                unstaged: 0,
                clean: staged == 0,
            },
            ahead: 0,
            behind: 0,
        }),
        ..AppState::default()
    }
}

fn branch(name: &str, is_current: bool) -> BranchRecord {
    BranchRecord {
        name: name.to_string(),
        is_current,
        ..BranchRecord::default()
    }
}

fn conflict(path: &str) -> ConflictFile {
    ConflictFile::new(
        path,
        vec![ConflictRegion {
            start_line: 1,
            ours: vec!["a".to_string()],
            theirs: vec!["b".to_string()],
        }],
    )
}

fn message_text(state: &AppState) -> Option<&str> {
    state.message.as_ref().map(|message| message.text.as_str())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Navigation
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_initial_state_and_startup_loads() {
    let (state, effects) = startup(AppState::default());
    assert_eq!(state.tab, Tab::Workspace);
    assert_eq!(state.workspace.view, WorkspaceView::Files);
    assert_eq!(effects, vec![SideEffect::LoadStatus, SideEffect::LoadChanges]);
    assert_eq!(state.in_flight, 2);
}

#[test]
fn test_commit_tab_refused_without_staged_files() {
    let (state, effects) = press_char(with_staged(0), '2');
    assert_eq!(state.tab, Tab::Workspace);
    assert!(effects.is_empty());
    assert_eq!(
        state.message.as_ref().map(|m| m.level),
        Some(StatusLevel::Info)
    );
}

#[test]
fn test_commit_tab_entered_with_staged_files() {
    let (state, effects) = press_char(with_staged(2), '2');
    assert_eq!(state.tab, Tab::Commit);
    assert!(effects.contains(&SideEffect::LoadChanges));
    assert!(effects.contains(&SideEffect::LoadRecent(3)));
}

#[test]
fn test_entering_tools_resets_to_menu() {
    let mut state = AppState::default();
    state.tools.mode = ToolMode::History;

    let (state, _) = press_char(state, '4');
    assert_eq!(state.tab, Tab::Tools);
    assert_eq!(state.tools.mode, ToolMode::Menu);
}

#[test]
fn test_entering_branches_clears_comparison() {
    let mut state = AppState::default();
    state.branches.comparison = Some(Default::default());

    let (state, effects) = press_char(state, '3');
    assert!(state.branches.comparison.is_none());
    assert_eq!(effects, vec![SideEffect::LoadBranches]);
}

#[test]
fn test_quit_keys() {
    let (_, effects) = press_char(AppState::default(), 'q');
    assert_eq!(effects, vec![SideEffect::Quit]);

    let mut typing = AppState::default();
    typing.focus = Some(InputField::NewBranch);
    let (typing, effects) = press_char(typing, 'q');
    assert!(effects.is_empty());
    assert_eq!(typing.branches.new_branch.value(), "q");

    let (state, effects) = reduce(
        typing,
        StudioEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
    );
    assert_eq!(effects, vec![SideEffect::Quit]);
    assert!(state.should_quit);
}

#[test]
fn test_number_keys_type_into_focused_input() {
    let mut state = AppState::default();
    state.tab = Tab::Tools;
    state.tools.mode = ToolMode::Rebase;
    state.focus = Some(InputField::RebaseCount);

    let (state, _) = press_char(state, '3');
    assert_eq!(state.tab, Tab::Tools);
    assert_eq!(state.tools.rebase_count.value(), "3");
}

// ═══════════════════════════════════════════════════════════════════════════════
// Escape & Confirmation
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_escape_closes_diff_before_clearing_token() {
    let mut state = AppState::default();
    state.workspace.view = WorkspaceView::Diff;
    state.workspace.diff = Some(DiffViewState::new("a.go", "@@ -1 +1 @@\n+x\n"));
    state.pending = Some(PendingConfirmation::DeleteBranch("old".to_string()));

    let (state, _) = press(state, KeyCode::Esc);
    assert_eq!(state.workspace.view, WorkspaceView::Files);
    assert_eq!(
        state.pending,
        Some(PendingConfirmation::DeleteBranch("old".to_string()))
    );

    let (state, _) = press(state, KeyCode::Esc);
    assert!(state.pending.is_none());
    assert_eq!(message_text(&state), Some("Action cancelled"));
}

#[test]
fn test_escape_blurs_input_first() {
    let mut state = AppState::default();
    state.tab = Tab::Tools;
    state.tools.mode = ToolMode::Rebase;
    state.focus = Some(InputField::RebaseCount);

    let (state, _) = press(state, KeyCode::Esc);
    assert!(state.focus.is_none());
    assert_eq!(state.tools.mode, ToolMode::Rebase);

    let (state, _) = press(state, KeyCode::Esc);
    assert_eq!(state.tools.mode, ToolMode::Menu);
}

#[test]
fn test_escape_at_root_without_token_does_nothing() {
    let (state, effects) = press(AppState::default(), KeyCode::Esc);
    assert!(effects.is_empty());
    assert!(state.message.is_none());
}

#[test]
fn test_delete_branch_flow() {
    let mut state = AppState::default();
    state.tab = Tab::Branches;
    state.branches.branches = vec![branch("main", true), branch("feature", false)];

    let (state, effects) = press_char(state, 'd');
    assert!(effects.is_empty());
    assert!(state.pending.is_none(), "current branch cannot be deleted");

    let (state, _) = press(state, KeyCode::Down);
    let (state, _) = press_char(state, 'd');
    assert_eq!(
        state.pending,
        Some(PendingConfirmation::DeleteBranch("feature".to_string()))
    );

    let (state, effects) = press_char(state, 'y');
    assert!(state.pending.is_none());
    assert_eq!(
        effects,
        vec![SideEffect::DeleteBranch("feature".to_string())]
    );
}

#[test]
fn test_confirm_ignored_from_another_view() {
    let mut state = AppState::default();
    state.pending = Some(PendingConfirmation::DeleteBranch("feature".to_string()));

    let (state, effects) = press_char(state, 'y');
    assert!(effects.is_empty());
    assert!(state.pending.is_some());
}

#[test]
fn test_token_outlives_its_prompt() {
    let mut state = AppState::default();
    state.tab = Tab::Tools;
    state.tools.mode = ToolMode::Undo;
    state.tools.undo_selected = 2;

    let (state, _) = press(state, KeyCode::Enter);
    assert_eq!(state.pending, Some(PendingConfirmation::Reset(ResetMode::Hard)));

    let start = Instant::now();
    let (state, _) = reduce(state, StudioEvent::Tick(start));
    let (state, _) = reduce(state, StudioEvent::Tick(start + Duration::from_secs(16)));
    assert!(state.message.is_none());
    assert!(state.pending.is_some());

    let (_, effects) = press_char(state, 'y');
    assert_eq!(effects, vec![SideEffect::Reset(ResetMode::Hard)]);
}

#[test]
fn test_unrelated_keys_leave_token() {
    let mut state = AppState::default();
    state.tab = Tab::Tools;
    state.tools.mode = ToolMode::Undo;
    state.pending = Some(PendingConfirmation::Reset(ResetMode::Soft));

    let (state, _) = press(state, KeyCode::Down);
    let (state, _) = press_char(state, 'x');
    assert_eq!(state.pending, Some(PendingConfirmation::Reset(ResetMode::Soft)));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Status Line
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_status_message_expires_after_ttl() {
    let mut state = AppState::default();
    state.notify(StatusLevel::Info, "hello");

    let start = Instant::now();
    let (state, _) = reduce(state, StudioEvent::Tick(start));
    let (state, _) = reduce(state, StudioEvent::Tick(start + Duration::from_secs(2)));
    assert_eq!(message_text(&state), Some("hello"));

    let (state, _) = reduce(state, StudioEvent::Tick(start + Duration::from_secs(3)));
    assert!(state.message.is_none());
}

#[test]
fn test_task_failure_becomes_error_message() {
    let (state, _) = startup(AppState::default());
    let (state, effects) = reduce(
        state,
        StudioEvent::TaskFailed {
            action: "push".to_string(),
            error: "rejected".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.in_flight, 1);
    assert_eq!(message_text(&state), Some("Failed to push: rejected"));
    assert_eq!(
        state.message.as_ref().map(|m| m.level),
        Some(StatusLevel::Error)
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Workspace
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_changes_trigger_suggestions() {
    let changes = vec![ChangeRecord::new("src/a.rs", 'M', ' ')];
    let (state, effects) = reduce(
        AppState::default(),
        StudioEvent::ChangesLoaded(changes.clone()),
    );
    assert_eq!(
        effects,
        vec![SideEffect::LoadSuggestions {
            changes,
            max_individual: 5,
        }]
    );

    let annotated = vec![ChangeRecord {
        derived_type: Some(CommitType::Feat),
        derived_scope: Some("src".to_string()),
        ..ChangeRecord::new("src/a.rs", 'M', ' ')
    }];
    let suggestion = CommitSuggestion::new(CommitType::Feat, "src", "update a");
    let (state, _) = reduce(
        state,
        StudioEvent::SuggestionsLoaded(SuggestionSet {
            suggestions: vec![suggestion.clone()],
            annotated,
        }),
    );
    assert_eq!(state.commit.suggestions, vec![suggestion]);
    assert_eq!(state.workspace.changes[0].derived_type, Some(CommitType::Feat));
}

#[test]
fn test_suggestions_for_an_older_change_list_are_dropped() {
    let (mut state, _) = reduce(
        AppState::default(),
        StudioEvent::ChangesLoaded(vec![ChangeRecord::new("b.go", 'M', ' ')]),
    );
    let current = CommitSuggestion::new(CommitType::Fix, "", "fix b");
    state.commit.suggestions = vec![current.clone()];

    let (state, effects) = reduce(
        state,
        StudioEvent::SuggestionsLoaded(SuggestionSet {
            suggestions: vec![CommitSuggestion::new(CommitType::Feat, "a", "add a.go")],
            annotated: vec![ChangeRecord::new("a.go", 'A', ' ')],
        }),
    );
    assert!(effects.is_empty());
    assert_eq!(state.commit.suggestions, vec![current]);
    assert_eq!(state.workspace.changes[0].path, "b.go");
    assert_eq!(state.workspace.changes[0].derived_type, None);
}

#[test]
fn test_conflicted_changes_load_conflicts() {
    let changes = vec![
        ChangeRecord::new("a.txt", 'U', 'U'),
        ChangeRecord::new("b.txt", 'M', ' '),
    ];
    let (state, effects) = reduce(AppState::default(), StudioEvent::ChangesLoaded(changes));
    assert_eq!(effects, vec![SideEffect::LoadConflicts]);

    let (state, _) = reduce(state, StudioEvent::ConflictsLoaded(vec![conflict("a.txt")]));
    assert_eq!(state.workspace.view, WorkspaceView::Conflicts);
}

#[test]
fn test_continue_merge_requires_every_file_resolved() {
    let mut state = AppState::default();
    state.workspace.view = WorkspaceView::Conflicts;
    state.workspace.conflicts = vec![conflict("a.txt"), conflict("b.txt")];

    let (state, effects) = press_char(state, 'c');
    assert!(effects.is_empty());

    let (state, effects) = press_char(state, 't');
    assert_eq!(
        effects,
        vec![SideEffect::ResolveConflict {
            path: "a.txt".to_string(),
            strategy: ResolutionStrategy::Theirs,
        }]
    );

    let (state, _) = reduce(
        state,
        StudioEvent::ConflictResolved {
            path: "a.txt".to_string(),
            strategy: ResolutionStrategy::Theirs,
        },
    );
    // git now only reports b.txt as unmerged
    let (state, _) = reduce(state, StudioEvent::ConflictsLoaded(vec![conflict("b.txt")]));
    assert_eq!(state.workspace.conflicts.len(), 2);

    let (state, _) = reduce(
        state,
        StudioEvent::ConflictResolved {
            path: "b.txt".to_string(),
            strategy: ResolutionStrategy::Ours,
        },
    );
    let (state, effects) = reduce(
        state,
        StudioEvent::ChangesLoaded(vec![ChangeRecord::new("a.txt", 'M', ' ')]),
    );
    assert!(!effects.contains(&SideEffect::LoadConflicts));
    assert_eq!(state.workspace.conflicts.len(), 2);

    let (state, effects) = press_char(state, 'c');
    assert_eq!(effects, vec![SideEffect::ContinueMerge]);

    let (state, _) = reduce(state, StudioEvent::MergeContinued);
    assert!(state.workspace.conflicts.is_empty());
    assert_eq!(state.workspace.view, WorkspaceView::Files);
}

#[test]
fn test_stale_and_empty_diffs() {
    let mut state = AppState::default();
    state.workspace.changes = vec![
        ChangeRecord::new("a.rs", 'M', ' '),
        ChangeRecord::new("b.rs", 'M', ' '),
    ];

    let (state, effects) = press_char(state, 'd');
    assert_eq!(state.workspace.view, WorkspaceView::Diff);
    assert_eq!(effects, vec![SideEffect::LoadDiff("a.rs".to_string())]);

    let (state, _) = reduce(
        state,
        StudioEvent::DiffLoaded {
            path: "b.rs".to_string(),
            diff: "@@ -1 +1 @@\n+x\n".to_string(),
        },
    );
    assert!(state.workspace.diff.is_none());

    let (state, _) = reduce(
        state,
        StudioEvent::DiffLoaded {
            path: "a.rs".to_string(),
            diff: String::new(),
        },
    );
    assert_eq!(state.workspace.view, WorkspaceView::Files);
    assert_eq!(message_text(&state), Some("No changes to display"));
}

#[test]
fn test_unstage_all_refused_when_nothing_staged() {
    let (state, effects) = press_char(with_staged(0), 'R');
    assert!(effects.is_empty());
    assert_eq!(message_text(&state), Some("Nothing staged to unstage"));

    let (_, effects) = press_char(with_staged(1), 'R');
    assert_eq!(effects, vec![SideEffect::UnstageAll]);
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commit & Tools
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_custom_message_commit() {
    let mut state = with_staged(1);
    state.tab = Tab::Commit;

    let (mut state, _) = press(state, KeyCode::Enter);
    assert_eq!(state.focus, Some(InputField::CommitMessage));

    for c in "fix: typo".chars() {
        state = press_char(state, c).0;
    }
    let (state, effects) = press(state, KeyCode::Enter);
    assert_eq!(effects, vec![SideEffect::Commit("fix: typo".to_string())]);
    assert!(state.focus.is_none());

    let (state, effects) = reduce(
        state,
        StudioEvent::Committed(CommitOutcome::Committed {
            message: "fix: typo".to_string(),
        }),
    );
    assert!(state.commit.input.is_empty());
    assert!(effects.contains(&SideEffect::LoadStatus));
    assert!(effects.contains(&SideEffect::LoadRecent(3)));
}

#[test]
fn test_selected_suggestion_commits() {
    let mut state = with_staged(1);
    state.tab = Tab::Commit;
    state.commit.suggestions = vec![CommitSuggestion::new(
        CommitType::Docs,
        "docs",
        "add notes documentation",
    )];

    let (state, _) = press(state, KeyCode::Down);
    let (_, effects) = press(state, KeyCode::Enter);
    assert_eq!(
        effects,
        vec![SideEffect::Commit(
            "docs(docs): add notes documentation".to_string()
        )]
    );
}

#[test]
fn test_rebase_count_validation() {
    let mut state = AppState::default();
    state.tab = Tab::Tools;
    state.tools.mode = ToolMode::Rebase;
    state.focus = Some(InputField::RebaseCount);

    let (state, _) = press_char(state, '0');
    let (state, effects) = press(state, KeyCode::Enter);
    assert!(effects.is_empty());
    assert_eq!(
        state.message.as_ref().map(|m| m.level),
        Some(StatusLevel::Error)
    );

    let (state, _) = press(state, KeyCode::Backspace);
    let (state, _) = press_char(state, '3');
    let (state, effects) = press(state, KeyCode::Enter);
    assert_eq!(effects, vec![SideEffect::LoadRebasePlan(3)]);
    assert!(state.focus.is_none());
}

#[test]
fn test_tools_menu_opens_history() {
    let mut state = AppState::default();
    state.tab = Tab::Tools;

    let (state, _) = press(state, KeyCode::Down);
    let (state, _) = press(state, KeyCode::Down);
    let (state, effects) = press(state, KeyCode::Enter);
    assert_eq!(state.tools.mode, ToolMode::History);
    assert_eq!(effects, vec![SideEffect::LoadHistory(20)]);
}

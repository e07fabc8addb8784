//! Application state for the studio
//!
//! `AppState` is a plain value: the reducer consumes one and returns the next.

use std::time::{Duration, Instant};

use strum_macros::Display;

use super::components::{DiffViewState, TextInput};
use crate::commit::CommitSuggestion;
use crate::config::Config;
use crate::conflict::ConflictFile;
use crate::git::ops::ResetMode;
use crate::git::{
    BranchComparison, BranchRecord, ChangeRecord, CommitRecord, RebaseCommit, RepoStatus,
};

/// Prompts for destructive actions stay up longer than ordinary messages
const HARD_RESET_TTL: Duration = Duration::from_secs(15);

// ═══════════════════════════════════════════════════════════════════════════════
// Navigation
// ═══════════════════════════════════════════════════════════════════════════════

/// Top-level tabs, reachable with the number keys 1-4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum Tab {
    #[default]
    Workspace,
    Commit,
    Branches,
    Tools,
}

impl Tab {
    pub const ALL: [Self; 4] = [Self::Workspace, Self::Commit, Self::Branches, Self::Tools];

    /// Tab bound to a number key
    pub fn from_digit(c: char) -> Option<Self> {
        let index = c.to_digit(10)?.checked_sub(1)?;
        Self::ALL.get(usize::try_from(index).ok()?).copied()
    }

    pub fn next(self) -> Self {
        match self {
            Self::Workspace => Self::Commit,
            Self::Commit => Self::Branches,
            Self::Branches => Self::Tools,
            Self::Tools => Self::Workspace,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkspaceView {
    #[default]
    Files,
    Diff,
    Conflicts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum ToolMode {
    #[default]
    Menu,
    Undo,
    Rebase,
    History,
    Remote,
}

impl ToolMode {
    /// Entries of the tools menu, in display order
    pub const MENU: [Self; 4] = [Self::Undo, Self::Rebase, Self::History, Self::Remote];

    pub fn description(self) -> &'static str {
        match self {
            Self::Menu => "",
            Self::Undo => "Reset recent commits or browse the reflog",
            Self::Rebase => "Reorder, squash, reword or drop recent commits",
            Self::History => "Browse the commit log",
            Self::Remote => "Push, pull and fetch",
        }
    }
}

/// Entries of the undo view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoEntry {
    Reset(ResetMode),
    Reflog,
}

impl UndoEntry {
    pub const ALL: [Self; 4] = [
        Self::Reset(ResetMode::Soft),
        Self::Reset(ResetMode::Mixed),
        Self::Reset(ResetMode::Hard),
        Self::Reflog,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Reset(ResetMode::Soft) => "Soft reset HEAD~1 (keep changes staged)",
            Self::Reset(ResetMode::Mixed) => "Mixed reset HEAD~1 (keep changes unstaged)",
            Self::Reset(ResetMode::Hard) => "Hard reset HEAD~1 (discard changes)",
            Self::Reflog => "Show reflog",
        }
    }
}

/// The text input that currently receives keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    CommitMessage,
    NewBranch,
    RebaseCount,
}

/// A destructive action waiting for an explicit `y`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingConfirmation {
    DeleteBranch(String),
    Reset(ResetMode),
    Rebase,
}

impl PendingConfirmation {
    /// Whether the confirm key may consume this token from the given view
    pub fn matches(&self, tab: Tab, tool_mode: ToolMode) -> bool {
        match self {
            Self::DeleteBranch(_) => tab == Tab::Branches,
            Self::Reset(_) => tab == Tab::Tools && tool_mode == ToolMode::Undo,
            Self::Rebase => tab == Tab::Tools && tool_mode == ToolMode::Rebase,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::DeleteBranch(name) => format!("delete branch {name}"),
            Self::Reset(mode) => format!("{mode} reset to HEAD~1"),
            Self::Rebase => "execute rebase".to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Status Line
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Error,
    Prompt,
}

/// Transient status-line message.
///
/// `shown_at` is stamped by the first tick after the message was posted, so
/// expiry is decided from tick timestamps alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub ttl: Duration,
    pub shown_at: Option<Instant>,
}

impl StatusMessage {
    pub fn is_expired(&self, now: Instant) -> bool {
        self.shown_at
            .is_some_and(|shown| now.saturating_duration_since(shown) >= self.ttl)
    }
}

/// Timing and limits taken from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioSettings {
    pub status_ttl: Duration,
    pub confirm_ttl: Duration,
    pub hard_reset_ttl: Duration,
    pub history_limit: usize,
    pub recent_limit: usize,
    pub max_individual: usize,
}

impl From<&Config> for StudioSettings {
    fn from(config: &Config) -> Self {
        let confirm_ttl = Duration::from_secs(config.ui.confirm_ttl_secs);
        Self {
            status_ttl: Duration::from_secs(config.ui.status_ttl_secs),
            confirm_ttl,
            hard_reset_ttl: confirm_ttl.max(HARD_RESET_TTL),
            history_limit: config.history.limit,
            recent_limit: config.history.recent,
            max_individual: config.suggestions.max_individual,
        }
    }
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Per-tab State
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceState {
    pub view: WorkspaceView,
    pub changes: Vec<ChangeRecord>,
    pub selected: usize,
    /// Inline diff preview beside the file list
    pub preview: bool,
    pub diff: Option<DiffViewState>,
    pub conflicts: Vec<ConflictFile>,
    pub conflict_selected: usize,
}

impl WorkspaceState {
    pub fn selected_change(&self) -> Option<&ChangeRecord> {
        self.changes.get(self.selected)
    }

    pub fn selected_conflict(&self) -> Option<&ConflictFile> {
        self.conflicts.get(self.conflict_selected)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitState {
    pub suggestions: Vec<CommitSuggestion>,
    /// 0 is the custom message row, `n` is suggestion `n - 1`
    pub selected: usize,
    pub input: TextInput,
    pub recent: Vec<CommitRecord>,
}

impl CommitState {
    pub fn selected_suggestion(&self) -> Option<&CommitSuggestion> {
        self.selected
            .checked_sub(1)
            .and_then(|index| self.suggestions.get(index))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchesState {
    pub branches: Vec<BranchRecord>,
    pub selected: usize,
    pub new_branch: TextInput,
    pub comparison: Option<BranchComparison>,
}

impl BranchesState {
    pub fn selected_branch(&self) -> Option<&BranchRecord> {
        self.branches.get(self.selected)
    }
}

/// Which log the history list holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum HistorySource {
    #[default]
    Log,
    Reflog,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolsState {
    pub mode: ToolMode,
    pub menu_selected: usize,
    pub undo_selected: usize,
    pub rebase_count: TextInput,
    pub rebase_plan: Vec<RebaseCommit>,
    pub rebase_selected: usize,
    pub history: Vec<CommitRecord>,
    pub history_source: HistorySource,
    pub history_selected: usize,
    /// Output of the most recent push
    pub last_push: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Application State
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub tab: Tab,
    pub repo: Option<RepoStatus>,
    pub workspace: WorkspaceState,
    pub commit: CommitState,
    pub branches: BranchesState,
    pub tools: ToolsState,
    pub focus: Option<InputField>,
    pub pending: Option<PendingConfirmation>,
    pub message: Option<StatusMessage>,
    /// Tasks issued and not yet answered
    pub in_flight: usize,
    pub spinner_frame: usize,
    pub should_quit: bool,
    pub settings: StudioSettings,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            settings: StudioSettings::from(config),
            ..Self::default()
        }
    }

    pub fn staged_count(&self) -> usize {
        self.repo.as_ref().map_or(0, |repo| repo.summary.staged)
    }

    pub fn branch_name(&self) -> &str {
        self.repo.as_ref().map_or("unknown", |repo| repo.branch.as_str())
    }

    /// Post a message that expires after the ordinary status lifetime
    pub fn notify(&mut self, level: StatusLevel, text: impl Into<String>) {
        let ttl = self.settings.status_ttl;
        self.post(level, text, ttl);
    }

    pub fn post(&mut self, level: StatusLevel, text: impl Into<String>, ttl: Duration) {
        self.message = Some(StatusMessage {
            text: text.into(),
            level,
            ttl,
            shown_at: None,
        });
    }

    /// Install a confirmation token together with its prompt
    pub fn request_confirmation(&mut self, pending: PendingConfirmation) {
        let ttl = match pending {
            PendingConfirmation::Reset(ResetMode::Hard) => self.settings.hard_reset_ttl,
            _ => self.settings.confirm_ttl,
        };
        let prompt = format!(
            "Really {}? Press y to confirm, Esc to cancel",
            pending.describe()
        );
        self.post(StatusLevel::Prompt, prompt, ttl);
        self.pending = Some(pending);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_digits() {
        assert_eq!(Tab::from_digit('1'), Some(Tab::Workspace));
        assert_eq!(Tab::from_digit('4'), Some(Tab::Tools));
        assert_eq!(Tab::from_digit('5'), None);
        assert_eq!(Tab::from_digit('0'), None);
    }

    #[test]
    fn test_message_expires_only_after_being_shown() {
        let now = Instant::now();
        let mut message = StatusMessage {
            text: "hi".to_string(),
            level: StatusLevel::Info,
            ttl: Duration::from_secs(3),
            shown_at: None,
        };
        assert!(!message.is_expired(now + Duration::from_secs(60)));

        message.shown_at = Some(now);
        assert!(!message.is_expired(now + Duration::from_secs(2)));
        assert!(message.is_expired(now + Duration::from_secs(3)));
    }

    #[test]
    fn test_hard_reset_prompt_lasts_longer() {
        let mut state = AppState::default();
        state.request_confirmation(PendingConfirmation::Reset(ResetMode::Hard));
        assert_eq!(
            state.message.as_ref().map(|m| m.ttl),
            Some(Duration::from_secs(15))
        );

        state.request_confirmation(PendingConfirmation::Rebase);
        assert_eq!(
            state.message.as_ref().map(|m| m.ttl),
            Some(Duration::from_secs(10))
        );
        assert_eq!(state.pending, Some(PendingConfirmation::Rebase));
    }
}

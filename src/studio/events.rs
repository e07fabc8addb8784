//! Events flowing into the reducer and side effects flowing out of it
//!
//! Every side effect captures its inputs when it is issued and answers with
//! exactly one `StudioEvent`. Answers may arrive in any order.

use std::time::Instant;

use crossterm::event::KeyEvent;

use crate::commit::SuggestionSet;
use crate::conflict::{ConflictFile, ResolutionStrategy};
use crate::git::ops::{CommitOutcome, DeleteOutcome, PushOutcome, ResetMode, StagingChange};
use crate::git::{
    BranchComparison, BranchRecord, ChangeRecord, CommitRecord, RebaseCommit, RepoStatus,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Events
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudioEvent {
    // ─────────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────────
    Key(KeyEvent),
    Tick(Instant),

    // ─────────────────────────────────────────────────────────────────────────
    // Snapshots
    // ─────────────────────────────────────────────────────────────────────────
    StatusLoaded(RepoStatus),
    ChangesLoaded(Vec<ChangeRecord>),
    SuggestionsLoaded(SuggestionSet),
    ConflictsLoaded(Vec<ConflictFile>),
    DiffLoaded { path: String, diff: String },
    RecentLoaded(Vec<CommitRecord>),
    BranchesLoaded(Vec<BranchRecord>),
    ComparisonLoaded(BranchComparison),
    HistoryLoaded(Vec<CommitRecord>),
    ReflogLoaded(Vec<CommitRecord>),
    RebasePlanLoaded(Vec<RebaseCommit>),

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────
    StagingToggled { path: String, change: StagingChange },
    AllStaged,
    /// Number of entries that were staged; zero means nothing was done
    AllUnstaged(usize),
    Committed(CommitOutcome),
    Amended(String),
    CheckedOut(String),
    BranchCreated(String),
    BranchDeleted { name: String, outcome: DeleteOutcome },
    ResetDone(ResetMode),
    RebaseFinished,
    Pushed(PushOutcome),
    Pulled(String),
    Fetched,
    ConflictResolved { path: String, strategy: ResolutionStrategy },
    MergeContinued,

    /// Any task that failed; `action` names what was attempted
    TaskFailed { action: String, error: String },
}

impl StudioEvent {
    /// Whether this event answers a previously issued side effect
    pub fn is_task_result(&self) -> bool {
        !matches!(self, Self::Key(_) | Self::Tick(_))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Side Effects
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    LoadStatus,
    LoadChanges,
    LoadSuggestions {
        changes: Vec<ChangeRecord>,
        max_individual: usize,
    },
    LoadConflicts,
    LoadDiff(String),
    LoadRecent(usize),
    LoadBranches,
    CompareBranches(String),
    LoadHistory(usize),
    LoadReflog(usize),
    LoadRebasePlan(usize),

    ToggleStaging(String),
    StageAll,
    UnstageAll,
    Commit(String),
    Amend(String),
    Checkout(String),
    CreateBranch(String),
    DeleteBranch(String),
    Reset(ResetMode),
    ExecuteRebase(Vec<RebaseCommit>),
    Push,
    Pull,
    Fetch,
    ResolveConflict {
        path: String,
        strategy: ResolutionStrategy,
    },
    ContinueMerge,

    /// Leave the studio; handled by the app loop rather than a task
    Quit,
}

impl SideEffect {
    /// Label used in failure messages
    pub fn action(&self) -> &'static str {
        match self {
            Self::LoadStatus => "load status",
            Self::LoadChanges => "load changes",
            Self::LoadSuggestions { .. } => "generate suggestions",
            Self::LoadConflicts => "load conflicts",
            Self::LoadDiff(_) => "load diff",
            Self::LoadRecent(_) => "load recent commits",
            Self::LoadBranches => "load branches",
            Self::CompareBranches(_) => "compare branches",
            Self::LoadHistory(_) => "load history",
            Self::LoadReflog(_) => "load reflog",
            Self::LoadRebasePlan(_) => "load rebase plan",
            Self::ToggleStaging(_) => "toggle staging",
            Self::StageAll => "stage all",
            Self::UnstageAll => "unstage all",
            Self::Commit(_) => "commit",
            Self::Amend(_) => "amend",
            Self::Checkout(_) => "checkout",
            Self::CreateBranch(_) => "create branch",
            Self::DeleteBranch(_) => "delete branch",
            Self::Reset(_) => "reset",
            Self::ExecuteRebase(_) => "rebase",
            Self::Push => "push",
            Self::Pull => "pull",
            Self::Fetch => "fetch",
            Self::ResolveConflict { .. } => "resolve conflict",
            Self::ContinueMerge => "continue merge",
            Self::Quit => "quit",
        }
    }

    /// Reload status and the change list after anything that touches the index
    pub fn refresh() -> Vec<Self> {
        vec![Self::LoadStatus, Self::LoadChanges]
    }
}

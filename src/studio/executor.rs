//! Runs side effects as background tasks
//!
//! Each effect becomes one `tokio` task that sends exactly one `StudioEvent`
//! back over the app's channel. Tasks own clones of everything they touch.

use tokio::sync::mpsc;
use tracing::Instrument;

use super::events::{SideEffect, StudioEvent};
use crate::commit;
use crate::git::ops;
use crate::git::{GitError, SnapshotLoader};
use crate::{log_debug, log_error};

#[derive(Debug, Clone)]
pub struct Executor {
    loader: SnapshotLoader,
    tx: mpsc::UnboundedSender<StudioEvent>,
}

impl Executor {
    pub fn new(loader: SnapshotLoader, tx: mpsc::UnboundedSender<StudioEvent>) -> Self {
        Self { loader, tx }
    }

    /// Spawn a task for `effect`; `Quit` is the app loop's business and is ignored here
    pub fn spawn(&self, effect: SideEffect) {
        if effect == SideEffect::Quit {
            return;
        }

        let loader = self.loader.clone();
        let tx = self.tx.clone();
        let span = tracing::debug_span!("studio_task", action = effect.action());
        tokio::spawn(
            async move {
                let event = execute(&loader, effect).await;
                if tx.send(event).is_err() {
                    log_debug!("Studio closed before a task finished");
                }
            }
            .instrument(span),
        );
    }
}

/// Turn a task result into its event, reporting failures uniformly
fn settle<T>(
    action: &str,
    result: Result<T, GitError>,
    on_success: impl FnOnce(T) -> StudioEvent,
) -> StudioEvent {
    match result {
        Ok(value) => on_success(value),
        Err(e) => {
            log_error!("Task '{}' failed: {}", action, e);
            StudioEvent::TaskFailed {
                action: action.to_string(),
                error: e.to_string(),
            }
        }
    }
}

/// Perform one effect against the repository
pub async fn execute(loader: &SnapshotLoader, effect: SideEffect) -> StudioEvent {
    let action = effect.action();
    let runner = loader.runner();
    log_debug!("Executing {:?}", effect);

    match effect {
        SideEffect::LoadStatus => settle(action, loader.status().await, StudioEvent::StatusLoaded),
        SideEffect::LoadChanges => {
            settle(action, loader.changes().await, StudioEvent::ChangesLoaded)
        }
        SideEffect::LoadSuggestions {
            changes,
            max_individual,
        } => settle(
            action,
            commit::suggest(loader, &changes, max_individual).await,
            StudioEvent::SuggestionsLoaded,
        ),
        SideEffect::LoadConflicts => {
            settle(action, loader.conflicts().await, StudioEvent::ConflictsLoaded)
        }
        SideEffect::LoadDiff(path) => {
            let result = loader.file_diff(&path).await;
            settle(action, result, |diff| StudioEvent::DiffLoaded { path, diff })
        }
        SideEffect::LoadRecent(limit) => {
            settle(action, loader.history(limit).await, StudioEvent::RecentLoaded)
        }
        SideEffect::LoadBranches => {
            settle(action, loader.branches().await, StudioEvent::BranchesLoaded)
        }
        SideEffect::CompareBranches(target) => {
            StudioEvent::ComparisonLoaded(loader.comparison(&target).await)
        }
        SideEffect::LoadHistory(limit) => {
            settle(action, loader.history(limit).await, StudioEvent::HistoryLoaded)
        }
        SideEffect::LoadReflog(limit) => {
            settle(action, loader.reflog(limit).await, StudioEvent::ReflogLoaded)
        }
        SideEffect::LoadRebasePlan(count) => settle(
            action,
            loader.rebase_plan(count).await,
            StudioEvent::RebasePlanLoaded,
        ),

        SideEffect::ToggleStaging(path) => {
            let result = ops::toggle_staging(loader, &path).await;
            settle(action, result, |change| StudioEvent::StagingToggled { path, change })
        }
        SideEffect::StageAll => {
            settle(action, ops::stage_all(runner).await, |()| StudioEvent::AllStaged)
        }
        SideEffect::UnstageAll => {
            settle(action, ops::unstage_all(runner).await, StudioEvent::AllUnstaged)
        }
        SideEffect::Commit(message) => settle(
            action,
            ops::commit(loader, &message).await,
            StudioEvent::Committed,
        ),
        SideEffect::Amend(message) => {
            let result = ops::amend(runner, &message).await;
            settle(action, result, |()| StudioEvent::Amended(message))
        }
        SideEffect::Checkout(branch) => {
            let result = ops::checkout(runner, &branch).await;
            settle(action, result, |()| StudioEvent::CheckedOut(branch))
        }
        SideEffect::CreateBranch(branch) => {
            let result = ops::create_branch(runner, &branch).await;
            settle(action, result, |()| StudioEvent::BranchCreated(branch))
        }
        SideEffect::DeleteBranch(name) => {
            let result = ops::delete_branch(runner, &name).await;
            settle(action, result, |outcome| StudioEvent::BranchDeleted { name, outcome })
        }
        SideEffect::Reset(mode) => settle(action, ops::reset(runner, mode, 1).await, |()| {
            StudioEvent::ResetDone(mode)
        }),
        SideEffect::ExecuteRebase(plan) => settle(
            action,
            ops::execute_rebase(runner, &plan).await,
            |()| StudioEvent::RebaseFinished,
        ),
        SideEffect::Push => settle(action, ops::push(runner).await, StudioEvent::Pushed),
        SideEffect::Pull => settle(action, ops::pull(runner).await, StudioEvent::Pulled),
        SideEffect::Fetch => settle(action, ops::fetch(runner).await, |()| StudioEvent::Fetched),
        SideEffect::ResolveConflict { path, strategy } => {
            let result = ops::resolve_conflict(runner, &path, strategy).await;
            settle(action, result, |()| StudioEvent::ConflictResolved { path, strategy })
        }
        SideEffect::ContinueMerge => settle(
            action,
            ops::continue_merge(runner).await,
            |()| StudioEvent::MergeContinued,
        ),
        SideEffect::Quit => StudioEvent::TaskFailed {
            action: action.to_string(),
            error: "quit is not a task".to_string(),
        },
    }
}

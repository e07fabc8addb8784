//! Git command layer: process execution with lock retry, porcelain parsing and repository operations

mod branches;
mod error;
mod history;
pub mod hooks;
pub mod ops;
mod repository;
mod runner;
mod snapshot;
mod status;

pub use branches::{BranchRecord, comparison_target, parse_branch_listing};
pub use error::GitError;
pub use history::{
    CommitRecord, MAX_REBASE_COUNT, RebaseAction, RebaseCommit, parse_log, parse_rebase_count,
    parse_rebase_plan, parse_reflog, render_todo,
};
pub use repository::GitRepo;
pub use runner::{
    CommandOutput, CommandRunner, INDEX_LOCK_FILE, Invoker, RawOutput, RetryPolicy, SystemGit,
};
pub use snapshot::{BranchComparison, RepoStatus, SnapshotLoader};
pub use status::{ChangeRecord, StatusSummary, parse_ahead_behind, parse_porcelain, summarize};

//! Repository-mutating operations

use super::error::GitError;
use super::history::{RebaseCommit, render_todo};
use super::runner::CommandRunner;
use super::snapshot::SnapshotLoader;
use super::status::{branch_header_is_ahead, summarize};
use crate::conflict::{ResolutionStrategy, resolve};
use crate::{log_debug, log_info};
use std::io::Write;
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum StagingChange {
    Staged,
    Unstaged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed { message: String },
    NothingStaged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// `-d` refused (unmerged work) and `-D` was used
    ForceDeleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    NothingToPush,
    Pushed { output: String, last_commit: String },
}

/// `git reset` flavours offered by the undo view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ResetMode {
    Soft,
    Mixed,
    Hard,
}

/// Stage the file if it is not in the index, unstage it otherwise
pub async fn toggle_staging(
    loader: &SnapshotLoader,
    path: &str,
) -> Result<StagingChange, GitError> {
    let staged = loader.staged_paths().await?;
    let runner = loader.runner();
    if staged.iter().any(|p| p == path) {
        runner.run(&["reset", "HEAD", "--", path]).await?;
        Ok(StagingChange::Unstaged)
    } else {
        runner.run(&["add", "--", path]).await?;
        Ok(StagingChange::Staged)
    }
}

pub async fn stage_all(runner: &CommandRunner) -> Result<(), GitError> {
    runner.run(&["add", "."]).await.map(|_| ())
}

/// Unstage everything; returns how many entries were staged (zero means nothing was done)
pub async fn unstage_all(runner: &CommandRunner) -> Result<usize, GitError> {
    let status = runner.run(&["status", "--porcelain"]).await?;
    let staged = summarize(&status.stdout).staged;
    if staged > 0 {
        runner.run(&["reset", "HEAD"]).await?;
    }
    Ok(staged)
}

/// Commit the index, refusing when nothing is staged
pub async fn commit(loader: &SnapshotLoader, message: &str) -> Result<CommitOutcome, GitError> {
    if loader.staged_paths().await?.is_empty() {
        return Ok(CommitOutcome::NothingStaged);
    }
    loader.runner().run(&["commit", "-m", message]).await?;
    log_info!("Committed: {}", message);
    Ok(CommitOutcome::Committed {
        message: message.to_string(),
    })
}

/// Replace the last commit's message (and fold in anything staged)
pub async fn amend(runner: &CommandRunner, message: &str) -> Result<(), GitError> {
    runner.run(&["commit", "--amend", "-m", message]).await.map(|_| ())
}

pub async fn checkout(runner: &CommandRunner, branch: &str) -> Result<(), GitError> {
    runner.run(&["checkout", branch]).await.map(|_| ())
}

pub async fn create_branch(runner: &CommandRunner, branch: &str) -> Result<(), GitError> {
    runner.run(&["checkout", "-b", branch]).await.map(|_| ())
}

/// Delete a branch, forcing it when git refuses the safe delete
pub async fn delete_branch(
    runner: &CommandRunner,
    branch: &str,
) -> Result<DeleteOutcome, GitError> {
    match runner.run(&["branch", "-d", branch]).await {
        Ok(_) => Ok(DeleteOutcome::Deleted),
        Err(e) if e.is_lock_related() => Err(e),
        Err(e) => {
            log_debug!("Safe delete of {} refused ({}), forcing", branch, e);
            runner.run(&["branch", "-D", branch]).await?;
            Ok(DeleteOutcome::ForceDeleted)
        }
    }
}

/// Push when the branch header reports unpushed commits
pub async fn push(runner: &CommandRunner) -> Result<PushOutcome, GitError> {
    let status = runner.run(&["status", "--porcelain=v1", "--branch"]).await?;
    if !branch_header_is_ahead(&status.stdout) {
        return Ok(PushOutcome::NothingToPush);
    }

    let last_commit = runner
        .run(&["log", "-1", "--oneline"])
        .await
        .map(|output| output.stdout.trim().to_string())
        .unwrap_or_default();

    let output = runner.run(&["push"]).await?;
    Ok(PushOutcome::Pushed {
        output: output.combined().trim().to_string(),
        last_commit,
    })
}

pub async fn pull(runner: &CommandRunner) -> Result<String, GitError> {
    let output = runner.run(&["pull"]).await?;
    Ok(output.combined().trim().to_string())
}

pub async fn fetch(runner: &CommandRunner) -> Result<(), GitError> {
    runner.run(&["fetch"]).await.map(|_| ())
}

/// Move HEAD back `count` commits
pub async fn reset(runner: &CommandRunner, mode: ResetMode, count: usize) -> Result<(), GitError> {
    let mode_flag = format!("--{mode}");
    let target = format!("HEAD~{count}");
    runner.run(&["reset", &mode_flag, &target]).await.map(|_| ())
}

/// Rewrite a conflicted file with `strategy` and stage it
pub async fn resolve_conflict(
    runner: &CommandRunner,
    path: &str,
    strategy: ResolutionStrategy,
) -> Result<(), GitError> {
    let full_path = runner.repo_path().join(path);
    let content = tokio::fs::read_to_string(&full_path)
        .await
        .map_err(|e| GitError::io(&full_path, e))?;

    tokio::fs::write(&full_path, resolve(&content, strategy))
        .await
        .map_err(|e| GitError::io(&full_path, e))?;

    runner.run(&["add", "--", path]).await?;
    log_info!("Resolved {} using {}", path, strategy);
    Ok(())
}

/// Conclude a merge whose conflicts have all been staged
pub async fn continue_merge(runner: &CommandRunner) -> Result<(), GitError> {
    runner.run(&["commit", "--no-edit"]).await.map(|_| ())
}

/// Run a non-interactive `rebase -i` over the plan's commits.
///
/// The planned todo list is written to a temporary file and copied over
/// git's own by the sequence editor; reworded commits keep their message.
pub async fn execute_rebase(runner: &CommandRunner, plan: &[RebaseCommit]) -> Result<(), GitError> {
    let mut todo = tempfile::NamedTempFile::new().map_err(|e| GitError::io("rebase todo", e))?;
    todo.write_all(render_todo(plan).as_bytes())
        .map_err(|e| GitError::io(todo.path(), e))?;

    let sequence_editor = format!("cp {}", shell_quote(&todo.path().to_string_lossy()));

    // `HEAD~N` does not exist when the plan starts at the root commit
    let history_len = runner.run(&["rev-list", "--count", "HEAD"]).await?;
    let reaches_root = history_len
        .stdout
        .trim()
        .parse::<usize>()
        .is_ok_and(|total| plan.len() >= total);
    let base = if reaches_root {
        "--root".to_string()
    } else {
        format!("HEAD~{}", plan.len())
    };

    runner
        .run_with_env(
            &["rebase", "-i", &base],
            &[
                ("GIT_SEQUENCE_EDITOR", sequence_editor.as_str()),
                ("GIT_EDITOR", "true"),
            ],
        )
        .await?;
    Ok(())
}

fn shell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_flag_names() {
        assert_eq!(format!("--{}", ResetMode::Soft), "--soft");
        assert_eq!(format!("--{}", ResetMode::Hard), "--hard");
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("/tmp/a b"), "'/tmp/a b'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }
}

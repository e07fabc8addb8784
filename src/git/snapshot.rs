//! Read-only repository queries
//!
//! Every loader issues git commands through the [`CommandRunner`] and parses
//! the fixed-format text into typed records. Nothing here mutates the repository.

use super::branches::{BranchRecord, parse_branch_listing};
use super::error::GitError;
use super::history::{
    CommitRecord, LOG_FORMAT, REBASE_FORMAT, REFLOG_FORMAT, RebaseCommit, parse_log,
    parse_rebase_plan, parse_reflog,
};
use super::runner::CommandRunner;
use super::status::{ChangeRecord, StatusSummary, parse_ahead_behind, parse_porcelain, summarize};
use crate::conflict::{ConflictFile, parse_markers};
use crate::log_debug;

/// Header information for the status bar
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoStatus {
    pub branch: String,
    pub summary: StatusSummary,
    pub ahead: usize,
    pub behind: usize,
}

/// How the current branch relates to another one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchComparison {
    pub source: String,
    pub target: String,
    /// Commits on the current branch missing from the target
    pub ahead: Vec<CommitRecord>,
    /// Commits on the target missing from the current branch
    pub behind: Vec<CommitRecord>,
    pub differing_files: Vec<String>,
}

fn non_empty_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Loads typed snapshots of repository state
#[derive(Debug, Clone)]
pub struct SnapshotLoader {
    runner: CommandRunner,
}

impl SnapshotLoader {
    pub fn new(runner: CommandRunner) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &CommandRunner {
        &self.runner
    }

    /// Pending changes from `status --porcelain`
    pub async fn changes(&self) -> Result<Vec<ChangeRecord>, GitError> {
        let output = self.runner.run(&["status", "--porcelain"]).await?;
        Ok(parse_porcelain(&output.stdout))
    }

    /// Branch name, staged/unstaged counts and upstream divergence
    pub async fn status(&self) -> Result<RepoStatus, GitError> {
        let output = self.runner.run(&["status", "--porcelain"]).await?;
        let (ahead, behind) = self.ahead_behind().await;
        Ok(RepoStatus {
            branch: self.current_branch().await,
            summary: summarize(&output.stdout),
            ahead,
            behind,
        })
    }

    /// Name of the checked-out branch, or `unknown` (for example before the first commit)
    pub async fn current_branch(&self) -> String {
        match self.runner.run(&["rev-parse", "--abbrev-ref", "HEAD"]).await {
            Ok(output) => output.stdout.trim().to_string(),
            Err(e) => {
                log_debug!("Could not resolve current branch: {}", e);
                "unknown".to_string()
            }
        }
    }

    /// Commits ahead of and behind the upstream; zero when there is no upstream
    pub async fn ahead_behind(&self) -> (usize, usize) {
        match self
            .runner
            .run(&["rev-list", "--left-right", "--count", "HEAD...@{upstream}"])
            .await
        {
            Ok(output) => parse_ahead_behind(&output.stdout),
            Err(_) => (0, 0),
        }
    }

    pub async fn branches(&self) -> Result<Vec<BranchRecord>, GitError> {
        let output = self.runner.run(&["branch", "-vv"]).await?;
        Ok(parse_branch_listing(&output.stdout))
    }

    pub async fn history(&self, limit: usize) -> Result<Vec<CommitRecord>, GitError> {
        let limit = format!("-{limit}");
        let output = self.runner.run(&["log", &limit, LOG_FORMAT]).await?;
        Ok(parse_log(&output.stdout))
    }

    pub async fn reflog(&self, limit: usize) -> Result<Vec<CommitRecord>, GitError> {
        let limit = format!("-{limit}");
        let output = self.runner.run(&["reflog", &limit, REFLOG_FORMAT]).await?;
        Ok(parse_reflog(&output.stdout))
    }

    /// The last `count` commits, oldest first, all set to `pick`
    pub async fn rebase_plan(&self, count: usize) -> Result<Vec<RebaseCommit>, GitError> {
        let count = format!("-{count}");
        let output = self.runner.run(&["log", &count, REBASE_FORMAT]).await?;
        Ok(parse_rebase_plan(&output.stdout))
    }

    /// Compare HEAD with `target`; each part is best-effort and left empty on failure
    pub async fn comparison(&self, target: &str) -> BranchComparison {
        let ahead_range = format!("{target}..HEAD");
        let behind_range = format!("HEAD..{target}");
        let merge_base_range = format!("{target}...HEAD");
        let diff_args = ["diff", "--name-only", merge_base_range.as_str()];

        let log_range = |range: String| async move {
            self.runner
                .run(&["log", LOG_FORMAT, &range])
                .await
                .map(|output| parse_log(&output.stdout))
                .unwrap_or_default()
        };

        let (ahead, behind, files, source) = tokio::join!(
            log_range(ahead_range),
            log_range(behind_range),
            self.runner.run(&diff_args),
            self.current_branch(),
        );

        BranchComparison {
            source,
            target: target.to_string(),
            ahead,
            behind,
            differing_files: files
                .map(|output| non_empty_lines(&output.stdout))
                .unwrap_or_default(),
        }
    }

    /// Paths currently in the index
    pub async fn staged_paths(&self) -> Result<Vec<String>, GitError> {
        let output = self.runner.run(&["diff", "--cached", "--name-only"]).await?;
        Ok(non_empty_lines(&output.stdout))
    }

    /// Staged diff of one file, or the working-tree diff when nothing is staged for it
    pub async fn file_diff(&self, path: &str) -> Result<String, GitError> {
        let staged = self.runner.run(&["diff", "--cached", "--", path]).await?;
        if !staged.stdout.trim().is_empty() {
            return Ok(staged.stdout);
        }
        let unstaged = self.runner.run(&["diff", "--", path]).await?;
        Ok(unstaged.stdout)
    }

    /// Unmerged files that still contain conflict markers
    pub async fn conflicts(&self) -> Result<Vec<ConflictFile>, GitError> {
        let output = self
            .runner
            .run(&["diff", "--name-only", "--diff-filter=U"])
            .await?;

        let mut files = Vec::new();
        for path in non_empty_lines(&output.stdout) {
            let full_path = self.runner.repo_path().join(&path);
            let content = match tokio::fs::read_to_string(&full_path).await {
                Ok(content) => content,
                Err(e) => {
                    log_debug!("Skipping unreadable conflict file {}: {}", path, e);
                    continue;
                }
            };
            let regions = parse_markers(&content);
            if !regions.is_empty() {
                files.push(ConflictFile::new(path, regions));
            }
        }
        Ok(files)
    }
}

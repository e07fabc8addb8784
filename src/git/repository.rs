use crate::git::error::GitError;
use crate::git::runner::{CommandRunner, RetryPolicy};
use crate::log_debug;
use git2::Repository;
use std::path::{Path, PathBuf};

/// A located working tree and its control directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRepo {
    repo_path: PathBuf,
    git_dir: PathBuf,
    hooks_dir: PathBuf,
}

/// `core.hooksPath` when configured (relative paths start at the work tree),
/// else `hooks/` under the common dir shared by linked worktrees
fn hooks_dir(repo: &Repository, workdir: &Path) -> PathBuf {
    match repo.config().and_then(|config| config.get_path("core.hooksPath")) {
        Ok(path) if path.is_absolute() => path,
        Ok(path) => workdir.join(path),
        Err(_) => repo.commondir().join("hooks"),
    }
}

impl GitRepo {
    /// Find the repository containing `start`, walking up parent directories.
    ///
    /// Bare repositories are rejected since every feature needs a working tree.
    pub fn discover(start: &Path) -> Result<Self, GitError> {
        let repo = Repository::discover(start)
            .map_err(|_| GitError::NotARepository(start.to_path_buf()))?;

        let workdir = repo
            .workdir()
            .ok_or_else(|| GitError::NotARepository(start.to_path_buf()))?;

        let found = Self {
            repo_path: workdir.to_path_buf(),
            git_dir: repo.path().to_path_buf(),
            hooks_dir: hooks_dir(&repo, workdir),
        };
        log_debug!(
            "Discovered repository at {} (git dir {})",
            found.repo_path.display(),
            found.git_dir.display()
        );
        Ok(found)
    }

    /// Returns the working tree root
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// Returns the control directory (`.git`, or the gitdir of a linked worktree)
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Path of the commit-msg hook script
    pub fn hook_path(&self) -> PathBuf {
        self.hooks_dir.join("commit-msg")
    }

    /// Build a command runner bound to this repository
    pub fn runner(&self, policy: RetryPolicy) -> CommandRunner {
        CommandRunner::new(&self.repo_path, &self.git_dir, policy)
    }
}

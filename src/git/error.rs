use std::path::PathBuf;

/// Errors produced by the git command layer
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("Failed to launch git {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {command} failed{}: {stderr}", .code.map(|c| format!(" (exit {c})")).unwrap_or_default())]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Another process holds the index lock; only seen between retries
    #[error("Repository index is locked by another process")]
    IndexLocked,

    #[error("Repository is busy: index.lock still held after {attempts} attempts")]
    LockContention { attempts: usize },

    #[error("Not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("A commit-msg hook not managed by git-scribe already exists at {}", .0.display())]
    ForeignHook(PathBuf),

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GitError {
    /// Whether the failure came from index lock contention
    pub fn is_lock_related(&self) -> bool {
        matches!(self, Self::IndexLocked | Self::LockContention { .. })
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_contention_is_distinct_from_failure() {
        let contention = GitError::LockContention { attempts: 3 };
        let failure = GitError::Failed {
            command: "commit -m x".to_string(),
            code: Some(1),
            stderr: "nothing to commit".to_string(),
        };

        assert!(contention.is_lock_related());
        assert!(!failure.is_lock_related());
        assert_eq!(failure.to_string(), "git commit -m x failed (exit 1): nothing to commit");
        assert!(contention.to_string().contains("3 attempts"));
    }
}

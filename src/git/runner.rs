//! Git command execution with index-lock retry
//!
//! Every git invocation in the application goes through [`CommandRunner`].
//! The only contention the runner guards against is another process holding
//! `index.lock`; everything else fails fast.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio_retry::RetryIf;

use super::error::GitError;
use crate::config::RetryConfig;
use crate::{log_debug, log_warn};

/// Name of the lock marker git creates inside its control directory
pub const INDEX_LOCK_FILE: &str = "index.lock";

/// Raw result of one git process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Output of a successful git command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Stdout followed by stderr, the way a terminal would show it
    pub fn combined(&self) -> String {
        let mut text = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&self.stderr);
        }
        text
    }
}

/// Launches git processes.
///
/// Production code uses [`SystemGit`]; tests substitute a scripted invoker.
#[async_trait]
pub trait Invoker: Send + Sync {
    async fn invoke(
        &self,
        repo_path: &Path,
        args: &[String],
        envs: &[(String, String)],
    ) -> std::io::Result<RawOutput>;
}

/// Invokes the `git` binary found on `PATH`
#[derive(Debug, Default)]
pub struct SystemGit;

#[async_trait]
impl Invoker for SystemGit {
    async fn invoke(
        &self,
        repo_path: &Path,
        args: &[String],
        envs: &[(String, String)],
    ) -> std::io::Result<RawOutput> {
        let mut command = Command::new("git");
        command
            .args(args)
            .current_dir(repo_path)
            .env("GIT_TERMINAL_PROMPT", "0")
            .envs(envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Keep terminal signals (ctrl+c in raw mode) away from the child
        #[cfg(unix)]
        command.process_group(0);

        let output = command.output().await?;
        Ok(RawOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// How often and how long to retry while the index is locked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: config.base_delay(),
        }
    }
}

impl RetryPolicy {
    /// Delays between attempts: base, 2*base, 4*base, ...
    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        let base = self.base_delay;
        (0..self.max_attempts.saturating_sub(1)).map(move |n| {
            let factor = 1u32.checked_shl(u32::try_from(n).unwrap_or(u32::MAX)).unwrap_or(u32::MAX);
            base.saturating_mul(factor)
        })
    }
}

/// Runs git commands against one repository
#[derive(Clone)]
pub struct CommandRunner {
    repo_path: PathBuf,
    git_dir: PathBuf,
    policy: RetryPolicy,
    invoker: Arc<dyn Invoker>,
}

impl std::fmt::Debug for CommandRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRunner")
            .field("repo_path", &self.repo_path)
            .field("git_dir", &self.git_dir)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl CommandRunner {
    pub fn new(
        repo_path: impl Into<PathBuf>,
        git_dir: impl Into<PathBuf>,
        policy: RetryPolicy,
    ) -> Self {
        Self::with_invoker(repo_path, git_dir, policy, Arc::new(SystemGit))
    }

    pub fn with_invoker(
        repo_path: impl Into<PathBuf>,
        git_dir: impl Into<PathBuf>,
        policy: RetryPolicy,
        invoker: Arc<dyn Invoker>,
    ) -> Self {
        Self {
            repo_path: repo_path.into(),
            git_dir: git_dir.into(),
            policy,
            invoker,
        }
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Path of the lock marker whose presence means another process owns the index
    pub fn lock_marker(&self) -> PathBuf {
        self.git_dir.join(INDEX_LOCK_FILE)
    }

    /// Run `git <args>` in the repository
    pub async fn run(&self, args: &[&str]) -> Result<CommandOutput, GitError> {
        self.run_with_env(args, &[]).await
    }

    /// Run `git <args>` with extra environment variables
    pub async fn run_with_env(
        &self,
        args: &[&str],
        envs: &[(&str, &str)],
    ) -> Result<CommandOutput, GitError> {
        let args: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
        let envs: Vec<(String, String)> = envs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();

        let mut attempts = 0usize;
        let result = RetryIf::spawn(
            self.policy.delays(),
            || {
                attempts += 1;
                self.attempt(&args, &envs, attempts)
            },
            |err: &GitError| {
                let retry = err.is_lock_related();
                if retry {
                    log_warn!("git {} hit index.lock, retrying", args.join(" "));
                }
                retry
            },
        )
        .await;

        result.map_err(|err| {
            if err.is_lock_related() {
                GitError::LockContention { attempts }
            } else {
                err
            }
        })
    }

    async fn attempt(
        &self,
        args: &[String],
        envs: &[(String, String)],
        attempt: usize,
    ) -> Result<CommandOutput, GitError> {
        let command = args.join(" ");

        if self.lock_marker().exists() {
            log_debug!("git {} deferred: lock marker present (attempt {})", command, attempt);
            return Err(GitError::IndexLocked);
        }

        log_debug!("git {} (attempt {})", command, attempt);
        let output = self
            .invoker
            .invoke(&self.repo_path, args, envs)
            .await
            .map_err(|source| GitError::Spawn {
                command: command.clone(),
                source,
            })?;

        if output.success {
            return Ok(CommandOutput {
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        if mentions_index_lock(&output) {
            return Err(GitError::IndexLocked);
        }

        Err(GitError::Failed {
            command,
            code: output.code,
            stderr: output.stderr.trim().to_string(),
        })
    }
}

fn mentions_index_lock(output: &RawOutput) -> bool {
    output.stderr.contains(INDEX_LOCK_FILE) || output.stdout.contains(INDEX_LOCK_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Replays canned outputs and counts how often git was actually launched
    #[derive(Default)]
    struct ScriptedInvoker {
        responses: Mutex<VecDeque<RawOutput>>,
        fallback: RawOutput,
        calls: AtomicUsize,
    }

    impl ScriptedInvoker {
        fn always(output: RawOutput) -> Self {
            Self {
                fallback: output,
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Invoker for ScriptedInvoker {
        async fn invoke(
            &self,
            _repo_path: &Path,
            _args: &[String],
            _envs: &[(String, String)],
        ) -> std::io::Result<RawOutput> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .responses
                .lock()
                .pop_front()
                .unwrap_or_else(|| self.fallback.clone()))
        }
    }

    fn ok(stdout: &str) -> RawOutput {
        RawOutput {
            success: true,
            code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    fn locked() -> RawOutput {
        RawOutput {
            success: false,
            code: Some(128),
            stdout: String::new(),
            stderr: "fatal: Unable to create '/repo/.git/index.lock': File exists.".to_string(),
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(20),
        }
    }

    fn runner(dir: &TempDir, invoker: Arc<ScriptedInvoker>) -> CommandRunner {
        let git_dir = dir.path().join(".git");
        std::fs::create_dir_all(&git_dir).expect("Failed to create git dir");
        CommandRunner::with_invoker(dir.path(), git_dir, fast_policy(), invoker)
    }

    #[test]
    fn test_delays_double_from_base() {
        let policy = RetryPolicy::default();
        let delays: Vec<_> = policy.delays().collect();
        assert_eq!(
            delays,
            vec![Duration::from_millis(100), Duration::from_millis(200)]
        );
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let invoker = Arc::new(ScriptedInvoker::always(ok("main\n")));
        let runner = runner(&dir, invoker.clone());

        let output = runner.run(&["rev-parse", "--abbrev-ref", "HEAD"]).await;
        assert_eq!(output.expect("Command should succeed").stdout, "main\n");
        assert_eq!(invoker.calls(), 1);
    }

    #[tokio::test]
    async fn test_persistent_lock_error_stops_after_three_attempts() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let invoker = Arc::new(ScriptedInvoker::always(locked()));
        let runner = runner(&dir, invoker.clone());

        let err = runner
            .run(&["add", "."])
            .await
            .expect_err("Lock contention should surface");
        assert!(matches!(err, GitError::LockContention { attempts: 3 }));
        assert_eq!(invoker.calls(), 3);
    }

    #[tokio::test]
    async fn test_lock_marker_never_launches_git() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let invoker = Arc::new(ScriptedInvoker::always(ok("")));
        let runner = runner(&dir, invoker.clone());
        std::fs::write(runner.lock_marker(), "").expect("Failed to create lock marker");

        let err = runner.run(&["status"]).await.expect_err("Should be locked");
        assert!(matches!(err, GitError::LockContention { attempts: 3 }));
        assert_eq!(invoker.calls(), 0);
    }

    #[tokio::test]
    async fn test_succeeds_once_lock_marker_disappears() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let invoker = Arc::new(ScriptedInvoker::always(ok("done")));
        let runner = runner(&dir, invoker.clone());
        let marker = runner.lock_marker();
        std::fs::write(&marker, "").expect("Failed to create lock marker");

        let remover = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            std::fs::remove_file(marker).expect("Failed to remove lock marker");
        });

        let output = runner.run(&["commit", "-m", "feat: x"]).await;
        remover.await.expect("Remover task panicked");

        assert_eq!(output.expect("Should succeed after unlock").stdout, "done");
        assert_eq!(invoker.calls(), 1);
    }

    #[tokio::test]
    async fn test_transient_lock_error_then_success() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let invoker = Arc::new(ScriptedInvoker::always(ok("ok")));
        invoker.responses.lock().push_back(locked());
        let runner = runner(&dir, invoker.clone());

        let output = runner.run(&["add", "a.go"]).await;
        assert!(output.is_ok());
        assert_eq!(invoker.calls(), 2);
    }

    #[tokio::test]
    async fn test_ordinary_failure_is_not_retried() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let invoker = Arc::new(ScriptedInvoker::always(RawOutput {
            success: false,
            code: Some(1),
            stdout: String::new(),
            stderr: "error: pathspec 'nope' did not match".to_string(),
        }));
        let runner = runner(&dir, invoker.clone());

        let err = runner.run(&["checkout", "nope"]).await.expect_err("Should fail");
        assert!(matches!(err, GitError::Failed { code: Some(1), .. }));
        assert!(!err.is_lock_related());
        assert_eq!(invoker.calls(), 1);
    }

    #[test]
    fn test_combined_output_joins_streams() {
        let output = CommandOutput {
            stdout: "Everything up-to-date".to_string(),
            stderr: "To origin".to_string(),
        };
        assert_eq!(output.combined(), "Everything up-to-date\nTo origin");
    }
}

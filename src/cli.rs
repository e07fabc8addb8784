use crate::commit::{self, is_conventional};
use crate::config::Config;
use crate::git::hooks::{self, HookChange};
use crate::git::{GitRepo, RetryPolicy, SnapshotLoader};
use crate::studio::run_studio;
use crate::{log_debug, log_warn};
use anyhow::{Context, Result};
use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand, crate_version};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const LOG_FILE: &str = "git-scribe-debug.log";

/// CLI structure defining the available commands and global arguments
#[derive(Parser)]
#[command(
    author,
    version = crate_version!(),
    about = "git-scribe: a terminal Git workspace with conventional-commit suggestions",
    long_about = "git-scribe opens a keyboard-driven workspace for staging, committing, branching and \
                  history rewriting, and suggests conventional commit messages inferred from your changes.",
    styles = get_styles(),
)]
pub struct Cli {
    /// Subcommands; without one the studio opens
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log debug messages to a file
    #[arg(
        short = 'l',
        long = "log",
        global = true,
        help = "Log debug messages to a file"
    )]
    pub log: bool,

    /// Specify a custom log file path
    #[arg(
        long = "log-file",
        global = true,
        help = "Specify a custom log file path"
    )]
    pub log_file: Option<String>,

    /// Run as if started in this directory
    #[arg(
        short = 'C',
        long = "repo",
        global = true,
        help = "Run as if git-scribe was started in this directory"
    )]
    pub repo: Option<PathBuf>,

    /// Override the number of per-file suggestions
    #[arg(
        long = "max-suggestions",
        global = true,
        help = "List individual per-file suggestions only when at most this many files changed"
    )]
    pub max_suggestions: Option<usize>,
}

/// Enumeration of available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Print commit suggestions for the current changes
    #[command(about = "Print conventional commit suggestions for the current changes")]
    Suggest,

    /// Manage the commit-msg hook
    #[command(about = "Install or remove the conventional-commit commit-msg hook")]
    Hook {
        #[command(subcommand)]
        action: HookAction,
    },

    /// Validate a commit message
    #[command(about = "Check a message against the conventional commit format")]
    Check {
        /// The commit message to validate; only the first line is checked
        message: String,
    },
}

#[derive(Subcommand, Clone, Copy)]
pub enum HookAction {
    /// Write the hook into the repository
    Install,
    /// Remove the hook if git-scribe installed it
    Uninstall,
}

/// Define custom styles for Clap
fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Magenta.on_default().bold())
        .usage(AnsiColor::Cyan.on_default().bold())
        .literal(AnsiColor::Green.on_default().bold())
        .placeholder(AnsiColor::Yellow.on_default())
        .valid(AnsiColor::Blue.on_default().bold())
        .invalid(AnsiColor::Red.on_default().bold())
        .error(AnsiColor::Red.on_default().bold())
}

/// Parse the command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Main function to parse arguments and handle the command
pub async fn main() -> Result<ExitCode> {
    let cli = parse_args();

    if let Err(e) = crate::logger::init() {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }
    if cli.log {
        crate::logger::enable_logging();
        let log_file = cli.log_file.as_deref().unwrap_or(LOG_FILE);
        crate::logger::set_log_file(Path::new(log_file))
            .with_context(|| format!("Failed to open log file {log_file}"))?;
    } else {
        crate::logger::disable_logging();
    }

    if let Some(Commands::Check { message }) = &cli.command {
        return Ok(handle_check(message));
    }

    let start = match &cli.repo {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("Failed to determine the working directory")?,
    };
    let repo = GitRepo::discover(&start)?;
    let config = load_config(&repo, cli.max_suggestions);

    match cli.command {
        None => {
            run_studio(&repo, &config)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Suggest) => handle_suggest(&repo, &config).await,
        Some(Commands::Hook { action }) => handle_hook(&repo, action),
        Some(Commands::Check { .. }) => Ok(ExitCode::SUCCESS),
    }
}

/// Load configuration, falling back to defaults rather than refusing to start
fn load_config(repo: &GitRepo, max_suggestions: Option<usize>) -> Config {
    let mut config = Config::load(repo.repo_path()).unwrap_or_else(|e| {
        log_warn!("Using default configuration: {:#}", e);
        eprintln!(
            "{} {:#}; using defaults",
            "Warning:".yellow().bold(),
            e
        );
        Config::default()
    });

    if let Some(max) = max_suggestions {
        log_debug!("Overriding max_individual with {}", max);
        config.suggestions.max_individual = max;
    }
    config
}

fn handle_check(message: &str) -> ExitCode {
    let subject = message.lines().next().unwrap_or_default();
    if is_conventional(subject) {
        println!("{} {}", "✓".green().bold(), subject);
        ExitCode::SUCCESS
    } else {
        eprintln!(
            "{} {}",
            "✗".red().bold(),
            "Not a conventional commit subject".red()
        );
        eprintln!("  expected: {}", "type(scope): description".cyan());
        eprintln!(
            "  types:    {}",
            "feat fix docs style refactor test chore".cyan()
        );
        ExitCode::FAILURE
    }
}

async fn handle_suggest(repo: &GitRepo, config: &Config) -> Result<ExitCode> {
    let loader = SnapshotLoader::new(repo.runner(RetryPolicy::from(&config.retry)));
    let changes = loader.changes().await?;
    if changes.is_empty() {
        println!("{}", "Nothing to commit, working tree clean".yellow());
        return Ok(ExitCode::SUCCESS);
    }

    let set = commit::suggest(&loader, &changes, config.suggestions.max_individual).await?;
    for (index, suggestion) in set.suggestions.iter().enumerate() {
        println!(
            "{} {}",
            format!("{}.", index + 1).dimmed(),
            suggestion.message.bold()
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_hook(repo: &GitRepo, action: HookAction) -> Result<ExitCode> {
    let hook_path = repo.hook_path();
    let change = match action {
        HookAction::Install => hooks::install(&hook_path)?,
        HookAction::Uninstall => hooks::uninstall(&hook_path)?,
    };

    let location = hook_path.display().to_string();
    match change {
        HookChange::Installed => {
            println!("{} {}", "Installed commit-msg hook at".green(), location.cyan());
        }
        HookChange::Replaced => {
            println!("{} {}", "Updated commit-msg hook at".green(), location.cyan());
        }
        HookChange::Removed => {
            println!("{} {}", "Removed commit-msg hook from".green(), location.cyan());
        }
        HookChange::Unchanged => {
            println!("{}", "No commit-msg hook installed".yellow());
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["git-scribe", "suggest", "-C", "/tmp", "--max-suggestions", "3"]);
        assert!(matches!(cli.command, Some(Commands::Suggest)));
        assert_eq!(cli.repo, Some(PathBuf::from("/tmp")));
        assert_eq!(cli.max_suggestions, Some(3));
    }

    #[test]
    fn test_check_exit_codes() {
        assert_eq!(handle_check("feat(auth): add login"), ExitCode::SUCCESS);
        assert_eq!(handle_check("added stuff"), ExitCode::FAILURE);
    }
}

use crate::log_debug;

use anyhow::{Context, Result, anyhow};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration structure for git-scribe
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Lock-contention retry behaviour for git invocations
    #[serde(default)]
    pub retry: RetryConfig,
    /// Commit suggestion settings
    #[serde(default)]
    pub suggestions: SuggestionConfig,
    /// Commit history settings
    #[serde(default)]
    pub history: HistoryConfig,
    /// Interface timing
    #[serde(default)]
    pub ui: UiConfig,
    /// Flag indicating if this config is from a project file
    #[serde(skip)]
    pub is_project_config: bool,
}

/// Retry policy applied when the repository index is locked by another process
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub max_attempts: usize,
    /// Delay before the first retry; doubles on every further retry
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 100,
        }
    }
}

impl RetryConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Individual per-file suggestions are only listed when at most this many files changed
    pub max_individual: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self { max_individual: 5 }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Entries shown in the history and reflog views
    pub limit: usize,
    /// Entries shown under the commit tab
    pub recent: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: 20,
            recent: 3,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct UiConfig {
    /// Lifetime of ordinary status messages
    pub status_ttl_secs: u64,
    /// Lifetime of confirmation prompts
    pub confirm_ttl_secs: u64,
    /// Interval between housekeeping ticks
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            status_ttl_secs: 3,
            confirm_ttl_secs: 10,
            tick_ms: 250,
        }
    }
}

/// Project configuration filename
pub const PROJECT_CONFIG_FILENAME: &str = ".scribeconfig";

impl Config {
    /// Load the personal configuration, then merge the project file found at `repo_root`
    pub fn load(repo_root: &Path) -> Result<Self> {
        let mut config = match Self::get_config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        match Self::load_project_config(repo_root) {
            Ok(Some(project_config)) => config.merge_with_project_config(project_config),
            Ok(None) => {}
            Err(e) => log_debug!("Ignoring project configuration: {:#}", e),
        }

        log_debug!("Configuration loaded: {:?}", config);
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Load project-specific configuration, if the repository carries one
    pub fn load_project_config(repo_root: &Path) -> Result<Option<Self>> {
        let config_path = repo_root.join(PROJECT_CONFIG_FILENAME);
        if !config_path.exists() {
            return Ok(None);
        }

        let mut config = Self::from_file(&config_path).map_err(|e| {
            anyhow!(
                "Invalid project configuration: {:#}. Please check your {} file for syntax errors.",
                e,
                PROJECT_CONFIG_FILENAME
            )
        })?;
        config.is_project_config = true;
        Ok(Some(config))
    }

    /// Merge with a project config; project values win wherever they differ from the defaults
    pub fn merge_with_project_config(&mut self, project_config: Self) {
        log_debug!("Merging with project configuration");
        let defaults = Self::default();

        if project_config.retry != defaults.retry {
            self.retry = project_config.retry;
        }
        if project_config.suggestions != defaults.suggestions {
            self.suggestions = project_config.suggestions;
        }
        if project_config.history != defaults.history {
            self.history = project_config.history;
        }
        if project_config.ui != defaults.ui {
            self.ui = project_config.ui;
        }
    }

    /// Get the path to the personal configuration file
    fn get_config_path() -> Option<PathBuf> {
        let mut path = config_dir()?;
        path.push("git-scribe");
        path.push("config.toml");
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.base_delay(), Duration::from_millis(100));
        assert_eq!(config.suggestions.max_individual, 5);
        assert_eq!(config.history.limit, 20);
        assert_eq!(config.ui.status_ttl_secs, 3);
    }

    #[test]
    fn test_partial_project_file_overrides_only_its_sections() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(
            dir.path().join(PROJECT_CONFIG_FILENAME),
            "[suggestions]\nmax_individual = 3\n",
        )
        .expect("Failed to write project config");

        let project = Config::load_project_config(dir.path())
            .expect("Project config should parse")
            .expect("Project config should exist");
        assert!(project.is_project_config);

        let mut config = Config::default();
        config.merge_with_project_config(project);
        assert_eq!(config.suggestions.max_individual, 3);
        assert_eq!(config.retry, RetryConfig::default());
    }

    #[test]
    fn test_missing_project_file_is_not_an_error() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let project = Config::load_project_config(dir.path()).expect("Should not fail");
        assert!(project.is_none());
    }

    #[test]
    fn test_malformed_project_file_is_reported() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join(PROJECT_CONFIG_FILENAME), "[retry\nmax = ")
            .expect("Failed to write project config");
        assert!(Config::load_project_config(dir.path()).is_err());
    }
}

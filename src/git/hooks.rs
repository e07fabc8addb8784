//! commit-msg hook that enforces the conventional-commit subject format

use super::error::GitError;
use crate::commit::CONVENTIONAL_PATTERN;
use crate::log_info;
use std::fs;
use std::path::Path;

/// Marker line identifying hooks this tool wrote
pub const HOOK_MARKER: &str = "# managed-by: git-scribe";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookChange {
    Installed,
    Replaced,
    Removed,
    Unchanged,
}

/// Shell script body; the pattern is embedded single-quoted for `grep -E`
pub fn hook_script() -> String {
    format!(
        r#"#!/bin/sh
{HOOK_MARKER}
# Rejects commit subjects that are not conventional commits.

subject=$(head -n 1 "$1")
if ! printf '%s\n' "$subject" | grep -qE '{CONVENTIONAL_PATTERN}'; then
    echo "commit-msg: subject does not follow the conventional commit format" >&2
    echo "  expected: type(scope): description" >&2
    echo "  types:    feat fix docs style refactor test chore" >&2
    exit 1
fi
"#
    )
}

fn is_managed(path: &Path) -> bool {
    fs::read_to_string(path).is_ok_and(|content| content.contains(HOOK_MARKER))
}

/// Write the hook, refusing to overwrite a hook someone else installed
pub fn install(hook_path: &Path) -> Result<HookChange, GitError> {
    let existed = hook_path.exists();
    if existed && !is_managed(hook_path) {
        return Err(GitError::ForeignHook(hook_path.to_path_buf()));
    }

    if let Some(dir) = hook_path.parent() {
        fs::create_dir_all(dir).map_err(|e| GitError::io(dir, e))?;
    }
    fs::write(hook_path, hook_script()).map_err(|e| GitError::io(hook_path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(hook_path, fs::Permissions::from_mode(0o755))
            .map_err(|e| GitError::io(hook_path, e))?;
    }

    log_info!("Installed commit-msg hook at {}", hook_path.display());
    Ok(if existed {
        HookChange::Replaced
    } else {
        HookChange::Installed
    })
}

/// Remove the hook if this tool installed it; foreign hooks are left untouched
pub fn uninstall(hook_path: &Path) -> Result<HookChange, GitError> {
    if !hook_path.exists() {
        return Ok(HookChange::Unchanged);
    }
    if !is_managed(hook_path) {
        return Err(GitError::ForeignHook(hook_path.to_path_buf()));
    }
    fs::remove_file(hook_path).map_err(|e| GitError::io(hook_path, e))?;
    log_info!("Removed commit-msg hook at {}", hook_path.display());
    Ok(HookChange::Removed)
}

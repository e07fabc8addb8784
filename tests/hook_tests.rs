// only run this test on Linux
#![cfg(target_os = "linux")]
use anyhow::Result;
use git_scribe::git::GitError;
use git_scribe::git::hooks::{self, HOOK_MARKER, HookChange};
use std::fs;

use test_utils::{GitTestHelper, setup_git_repo};

#[test]
fn test_install_then_uninstall() -> Result<()> {
    let (_temp_dir, git_repo) = setup_git_repo();
    let hook_path = git_repo.hook_path();

    assert_eq!(hooks::install(&hook_path)?, HookChange::Installed);
    assert!(fs::read_to_string(&hook_path)?.contains(HOOK_MARKER));
    assert_eq!(hooks::install(&hook_path)?, HookChange::Replaced);

    assert_eq!(hooks::uninstall(&hook_path)?, HookChange::Removed);
    assert!(!hook_path.exists());
    assert_eq!(hooks::uninstall(&hook_path)?, HookChange::Unchanged);
    Ok(())
}

#[test]
fn test_foreign_hook_is_never_touched() -> Result<()> {
    let (_temp_dir, git_repo) = setup_git_repo();
    let hook_path = git_repo.hook_path();
    fs::create_dir_all(hook_path.parent().expect("Hook path has a parent"))?;
    fs::write(&hook_path, "#!/bin/sh\nexit 0\n")?;

    let err = hooks::install(&hook_path).expect_err("Foreign hook must not be replaced");
    assert!(matches!(err, GitError::ForeignHook(_)));
    let err = hooks::uninstall(&hook_path).expect_err("Foreign hook must not be removed");
    assert!(matches!(err, GitError::ForeignHook(_)));

    assert_eq!(fs::read_to_string(&hook_path)?, "#!/bin/sh\nexit 0\n");
    Ok(())
}

#[test]
fn test_installed_hook_gates_commits() -> Result<()> {
    let (temp_dir, git_repo) = setup_git_repo();
    let helper = GitTestHelper::new(&temp_dir);
    hooks::install(&git_repo.hook_path())?;

    helper.create_and_stage_file("feature.rs", "pub fn feature() {}\n")?;
    assert!(helper.git(&["commit", "-m", "added a feature"]).is_err());

    helper.git(&["commit", "-m", "feat(core): add feature module"])?;
    assert_eq!(
        helper.subjects(1)?,
        vec!["feat(core): add feature module".to_string()]
    );
    Ok(())
}

use anyhow::Result;
use git_scribe::commit::{self, CommitType, is_conventional};

use test_utils::{GitTestHelper, loader_for, setup_git_repo};

#[tokio::test]
async fn test_new_markdown_file_suggests_docs() -> Result<()> {
    let (temp_dir, git_repo) = setup_git_repo();
    let helper = GitTestHelper::new(&temp_dir);
    helper.create_and_stage_file("docs/notes.md", "# Notes\n\nMeeting notes live here.\n")?;

    let loader = loader_for(&git_repo);
    let changes = loader.changes().await?;
    let set = commit::suggest(&loader, &changes, 5).await?;

    let messages: Vec<_> = set.suggestions.iter().map(|s| s.message.as_str()).collect();
    assert_eq!(
        messages,
        vec!["docs(docs): update documentation", "docs(docs): add notes documentation"]
    );
    assert_eq!(set.annotated[0].derived_type, Some(CommitType::Docs));
    assert_eq!(set.annotated[0].derived_scope.as_deref(), Some("docs"));
    Ok(())
}

#[tokio::test]
async fn test_security_function_change_in_go_file() -> Result<()> {
    let (temp_dir, git_repo) = setup_git_repo();
    let helper = GitTestHelper::new(&temp_dir);
    helper.commit_file(
        "src/auth/login.go",
        "package auth\n\nfunc check(raw string) bool {\n\treturn raw != \"\"\n}\n",
        "feat(auth): add login",
    )?;
    helper.write_file(
        "src/auth/login.go",
        "package auth\n\nfunc ValidateToken(raw string) bool {\n\treturn tokenValid(raw)\n}\n",
    )?;

    let loader = loader_for(&git_repo);
    let changes = loader.changes().await?;
    let set = commit::suggest(&loader, &changes, 5).await?;

    assert!(
        set.suggestions
            .iter()
            .any(|s| s.message == "feat(auth): improve security in ValidateToken"),
        "got {:?}",
        set.suggestions
    );
    Ok(())
}

#[tokio::test]
async fn test_many_files_only_get_the_combined_suggestion() -> Result<()> {
    let (temp_dir, git_repo) = setup_git_repo();
    let helper = GitTestHelper::new(&temp_dir);
    for name in ["a", "b", "c"] {
        helper.create_and_stage_file(
            &format!("src/ui/{name}.ts"),
            &format!("export const {name} = 1;\n"),
        )?;
    }

    let loader = loader_for(&git_repo);
    let changes = loader.changes().await?;
    assert_eq!(changes.len(), 3);

    let set = commit::suggest(&loader, &changes, 2).await?;
    assert_eq!(set.suggestions.len(), 1);
    assert_eq!(set.suggestions[0].message, "feat(ui): add new features across 3 files");
    assert_eq!(set.annotated.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_every_suggestion_is_conventional() -> Result<()> {
    let (temp_dir, git_repo) = setup_git_repo();
    let helper = GitTestHelper::new(&temp_dir);
    helper.create_and_stage_file("tests/login_test.go", "package auth\n")?;
    helper.create_and_stage_file("config/app.yaml", "port: 8080\n")?;
    helper.git(&["rm", "-q", "initial.txt"])?;
    helper.create_and_stage_file("README.md", "# Project\n")?;

    let loader = loader_for(&git_repo);
    let changes = loader.changes().await?;
    let set = commit::suggest(&loader, &changes, 5).await?;

    assert_eq!(set.suggestions.len(), 5);
    for suggestion in &set.suggestions {
        assert!(
            is_conventional(&suggestion.message),
            "{} is not conventional",
            suggestion.message
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_no_changes_no_suggestions() -> Result<()> {
    let (_temp_dir, git_repo) = setup_git_repo();
    let loader = loader_for(&git_repo);
    let set = commit::suggest(&loader, &[], 5).await?;
    assert!(set.suggestions.is_empty());
    assert!(set.annotated.is_empty());
    Ok(())
}

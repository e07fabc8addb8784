//! Commit type and scope inference for a single changed file

use super::types::CommitType;
use crate::analysis::DiffInfo;
use std::path::Path;

const CONFIG_EXTENSIONS: &[&str] = &[".json", ".yaml", ".yml", ".toml", ".env"];
const CONFIG_FILENAMES: &[&str] = &["Dockerfile", "Makefile"];
const MANIFEST_FILENAMES: &[&str] = &[
    "package.json",
    "go.mod",
    "requirements.txt",
    "Cargo.toml",
    "pom.xml",
];

/// Final path component
pub(crate) fn file_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}

pub(crate) fn is_test_path(path: &str) -> bool {
    path.contains("test")
}

fn is_markdown_or_readme(path: &str) -> bool {
    path.ends_with(".md") || path.contains("README")
}

fn is_doc_path(path: &str) -> bool {
    is_markdown_or_readme(path) || path.contains("doc")
}

fn is_config_path(path: &str) -> bool {
    let name = file_name(path);
    path.contains("config")
        || CONFIG_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
        || CONFIG_FILENAMES.contains(&name)
}

fn is_manifest(path: &str) -> bool {
    MANIFEST_FILENAMES.contains(&file_name(path))
}

/// Pick a commit type for one file, first matching rule wins.
///
/// `status` is the two-character porcelain code. Only an `A` counts as an
/// addition; untracked (`??`) files match no status rule and fall to chore.
pub fn classify(path: &str, status: &str, diff: &DiffInfo) -> CommitType {
    if status.contains('A') {
        if is_test_path(path) {
            return CommitType::Test;
        }
        if is_markdown_or_readme(path) {
            return CommitType::Docs;
        }
        return CommitType::Feat;
    }

    if status.contains('D') {
        return CommitType::Chore;
    }

    if status.contains('M') {
        return classify_modification(path, diff);
    }

    CommitType::Chore
}

fn classify_modification(path: &str, diff: &DiffInfo) -> CommitType {
    if is_doc_path(path) {
        return CommitType::Docs;
    }
    if is_test_path(path) {
        return CommitType::Test;
    }
    if is_config_path(path) {
        return CommitType::Chore;
    }
    if is_manifest(path) {
        return if diff.imports.is_empty() {
            CommitType::Chore
        } else {
            CommitType::Feat
        };
    }

    let added = diff.lines_added;
    let removed = diff.lines_removed;

    if removed > 0 && added < removed {
        return CommitType::Fix;
    }
    if !diff.functions.is_empty() || added > removed * 2 {
        return CommitType::Feat;
    }
    if added > 0 && removed > 0 && added.abs_diff(removed) < 10 {
        return CommitType::Refactor;
    }
    if diff.total_changed() < 10 {
        return CommitType::Fix;
    }
    CommitType::Feat
}

/// Derive a scope from the path's leading directory, or from the file name for top-level files
pub fn scope_for(path: &str) -> String {
    let parts: Vec<&str> = path.split('/').collect();

    if let [first, rest @ ..] = parts.as_slice()
        && !rest.is_empty()
    {
        let scope = match *first {
            "src" | "lib" => match rest {
                [nested, _, ..] => *nested,
                _ => "core",
            },
            "tests" | "test" => "test",
            "docs" | "documentation" => "docs",
            "config" | "configs" => "config",
            "api" | "backend" | "server" => "api",
            "ui" | "frontend" | "client" => "ui",
            "scripts" | "tools" => "tools",
            other => other,
        };
        return scope.to_string();
    }

    let name = file_name(path);
    if name.contains("test") {
        "test".to_string()
    } else if name.ends_with(".md") {
        "docs".to_string()
    } else if name.contains("config") {
        "config".to_string()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diff(added: usize, removed: usize) -> DiffInfo {
        DiffInfo {
            lines_added: added,
            lines_removed: removed,
            ..DiffInfo::default()
        }
    }

    #[test]
    fn test_new_files() {
        assert_eq!(classify("src/parser_test.go", "A ", &diff(10, 0)), CommitType::Test);
        assert_eq!(classify("docs/notes.md", "A ", &diff(3, 0)), CommitType::Docs);
        assert_eq!(classify("src/parser.go", "A ", &diff(3, 0)), CommitType::Feat);
    }

    #[test]
    fn test_untracked_file_is_chore() {
        assert_eq!(classify("src/handler.go", "??", &diff(0, 0)), CommitType::Chore);
        assert_eq!(classify("docs/guide.md", "??", &diff(0, 0)), CommitType::Chore);
    }

    #[test]
    fn test_deleted_file_is_chore() {
        assert_eq!(classify("src/old.rs", " D", &diff(0, 40)), CommitType::Chore);
    }

    #[test]
    fn test_modified_path_rules() {
        assert_eq!(classify("README.md", " M", &diff(1, 1)), CommitType::Docs);
        assert_eq!(classify("src/lib_test.rs", "M ", &diff(1, 1)), CommitType::Test);
        assert_eq!(classify("app/settings.yaml", "M ", &diff(1, 1)), CommitType::Chore);
        assert_eq!(classify("Dockerfile", "M ", &diff(1, 1)), CommitType::Chore);
    }

    #[test]
    fn test_manifest_with_new_imports_is_feature() {
        let mut info = diff(2, 0);
        assert_eq!(classify("go.mod", "M ", &info), CommitType::Chore);
        info.imports.push("testify".to_string());
        assert_eq!(classify("go.mod", "M ", &info), CommitType::Feat);
        // toml manifests are caught by the config rule first
        assert_eq!(classify("Cargo.toml", "M ", &info), CommitType::Chore);
    }

    #[test]
    fn test_modified_size_rules() {
        assert_eq!(classify("src/a.rs", "M ", &diff(1, 5)), CommitType::Fix);
        assert_eq!(classify("src/a.rs", "M ", &diff(30, 10)), CommitType::Feat);
        assert_eq!(classify("src/a.rs", "M ", &diff(12, 10)), CommitType::Refactor);
        assert_eq!(classify("src/a.rs", "M ", &diff(4, 0)), CommitType::Feat);
        assert_eq!(classify("src/a.rs", "M ", &diff(0, 0)), CommitType::Fix);
        assert_eq!(classify("src/a.rs", "M ", &diff(40, 25)), CommitType::Feat);

        let mut with_fn = diff(3, 3);
        with_fn.functions.push("run".to_string());
        assert_eq!(classify("src/a.rs", "M ", &with_fn), CommitType::Feat);
    }

    #[test]
    fn test_unknown_status_is_chore() {
        assert_eq!(classify("src/a.rs", "R ", &diff(1, 1)), CommitType::Chore);
    }

    #[test]
    fn test_scope_table() {
        assert_eq!(scope_for("src/auth/login.go"), "auth");
        assert_eq!(scope_for("src/main.rs"), "core");
        assert_eq!(scope_for("lib/util/x.rb"), "util");
        assert_eq!(scope_for("tests/it.rs"), "test");
        assert_eq!(scope_for("docs/notes.md"), "docs");
        assert_eq!(scope_for("server/http.go"), "api");
        assert_eq!(scope_for("frontend/app.tsx"), "ui");
        assert_eq!(scope_for("scripts/release.sh"), "tools");
        assert_eq!(scope_for("crates/core/lib.rs"), "crates");
    }

    #[test]
    fn test_scope_for_top_level_files() {
        assert_eq!(scope_for("test_helpers.py"), "test");
        assert_eq!(scope_for("CHANGELOG.md"), "docs");
        assert_eq!(scope_for("config.yaml"), "config");
        assert_eq!(scope_for("main.go"), "");
    }
}

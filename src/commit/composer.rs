//! Commit description wording

use super::classifier::{classify, file_name, is_test_path, scope_for};
use super::types::{CommitSuggestion, CommitType};
use crate::analysis::DiffInfo;
use crate::git::ChangeRecord;

/// Filename without its final extension
fn base_name(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    }
}

/// A short added comment that already reads like a commit subject
fn descriptive_comment(diff: &DiffInfo) -> Option<&str> {
    let comment = diff.comments.first()?;
    if comment.len() <= 10 || comment.len() >= 60 {
        return None;
    }
    let lower = comment.to_lowercase();
    ["fix", "add", "update", "remove"]
        .iter()
        .any(|verb| lower.contains(verb))
        .then_some(comment.as_str())
}

/// Word the description part of a commit subject.
///
/// The dominant keyword topic takes precedence over generic wording, then
/// extracted function names, then wording based on the file name.
pub fn describe(path: &str, status: &str, diff: &DiffInfo, kind: CommitType) -> String {
    if let Some(comment) = descriptive_comment(diff) {
        return comment.to_string();
    }

    let name = file_name(path);
    let base = base_name(name);

    if status.contains('A') {
        return describe_addition(name, base, diff, kind);
    }
    if status.contains('D') {
        return format!("remove {name}");
    }
    if status.contains('M') {
        return describe_modification(name, base, diff, kind);
    }
    format!("modify {name}")
}

fn describe_addition(name: &str, base: &str, diff: &DiffInfo, kind: CommitType) -> String {
    if let (Some(topic), Some(function)) = (diff.dominant_context, diff.functions.first()) {
        return format!("{} {function}", topic.message_prefix());
    }

    match diff.functions.as_slice() {
        [function] if !diff.variables.is_empty() && diff.has_keyword("error") => {
            return format!("add {function} with error handling");
        }
        [function] => return format!("add {function}"),
        [] => {}
        several => return format!("add {base} with {} functions", several.len()),
    }

    if !diff.imports.is_empty() {
        return format!("add {base} with dependencies");
    }
    if is_test_path(name) {
        return format!("add tests for {}", base.trim_end_matches("_test"));
    }
    if name.ends_with(".md") {
        if name == "README.md" {
            return "add README documentation".to_string();
        }
        return format!("add {base} documentation");
    }
    if kind == CommitType::Chore {
        return format!("add {base} config");
    }
    format!("add {name}")
}

fn describe_modification(name: &str, base: &str, diff: &DiffInfo, kind: CommitType) -> String {
    let first_function = diff.functions.first().map(String::as_str);
    let subject = first_function.unwrap_or(base);

    if let Some(topic) = diff.dominant_context {
        return format!("{} {subject}", topic.message_prefix());
    }

    if diff.has_keyword("error") || diff.has_keyword("bug") {
        return format!("fix error handling in {subject}");
    }

    if diff.has_keyword("validate") || diff.has_keyword("check") {
        return match first_function {
            Some(function) => format!("add validation to {function}"),
            None => format!("add input validation to {base}"),
        };
    }

    match kind {
        CommitType::Docs if name == "README.md" => return "update README".to_string(),
        CommitType::Docs => return format!("update {base} docs"),
        CommitType::Test => return format!("update {} tests", base.trim_end_matches("_test")),
        CommitType::Chore if matches!(name, "package.json" | "go.mod") => {
            return if diff.imports.is_empty() {
                "update package config".to_string()
            } else {
                "update dependencies".to_string()
            };
        }
        CommitType::Chore => return format!("update {base} config"),
        _ => {}
    }

    match diff.functions.as_slice() {
        [function] => return describe_single_function(function, diff, kind),
        [_, _] | [_, _, _] => {
            let count = diff.functions.len();
            return if kind == CommitType::Refactor {
                format!("refactor {count} functions in {base}")
            } else {
                format!("update {count} functions in {base}")
            };
        }
        _ => {}
    }

    if !diff.imports.is_empty() {
        return if kind == CommitType::Feat {
            format!("add dependencies to {base}")
        } else {
            format!("update imports in {base}")
        };
    }

    let (added, removed) = (diff.lines_added, diff.lines_removed);
    if added > removed * 3 {
        if kind == CommitType::Feat {
            return format!("extend {base} functionality");
        }
    } else if removed > added * 2 {
        return if kind == CommitType::Refactor {
            format!("simplify {base}")
        } else {
            format!("clean up {base}")
        };
    }

    match kind {
        CommitType::Fix => format!("fix issues in {base}"),
        CommitType::Refactor => format!("refactor {base}"),
        CommitType::Feat => format!("enhance {base}"),
        _ => format!("update {base}"),
    }
}

fn describe_single_function(function: &str, diff: &DiffInfo, kind: CommitType) -> String {
    if diff.has_keyword("auth") || diff.has_keyword("security") {
        return format!("improve security in {function}");
    }
    if diff.has_keyword("optimize") || diff.has_keyword("performance") {
        return format!("optimize {function}");
    }
    match kind {
        CommitType::Fix => format!("fix {function}"),
        CommitType::Refactor => format!("refactor {function}"),
        _ => format!("update {function}"),
    }
}

/// Classify one change and word its commit subject
pub fn suggest_for_change(change: &ChangeRecord, diff: &DiffInfo) -> CommitSuggestion {
    let status = change.status();
    let kind = classify(&change.path, &status, diff);
    let description = describe(&change.path, &status, diff, kind);
    CommitSuggestion::new(kind, scope_for(&change.path), &description)
}

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Pattern every suggested (and hook-validated) commit subject must match
pub const CONVENTIONAL_PATTERN: &str = r"^(feat|fix|docs|style|refactor|test|chore)(\(.+\))?: .{1,50}";

static CONVENTIONAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(CONVENTIONAL_PATTERN).expect("Should compile: CONVENTIONAL_RE"));

/// Conventional commit type vocabulary
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Test,
    Chore,
}

/// A ready-to-use commit message with the classification behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSuggestion {
    pub kind: CommitType,
    /// Empty when no scope applies
    pub scope: String,
    /// Full `type(scope): description` subject line
    pub message: String,
}

impl CommitSuggestion {
    pub fn new(kind: CommitType, scope: impl Into<String>, description: &str) -> Self {
        let scope = scope.into();
        let message = format_conventional(kind, &scope, description);
        Self {
            kind,
            scope,
            message,
        }
    }
}

/// Render `type(scope): description`, or `type: description` without a scope
pub fn format_conventional(kind: CommitType, scope: &str, description: &str) -> String {
    if scope.is_empty() {
        format!("{kind}: {description}")
    } else {
        format!("{kind}({scope}): {description}")
    }
}

/// Whether `message` follows the conventional-commit subject format
pub fn is_conventional(message: &str) -> bool {
    CONVENTIONAL_RE.is_match(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_with_and_without_scope() {
        assert_eq!(
            format_conventional(CommitType::Feat, "auth", "add login"),
            "feat(auth): add login"
        );
        assert_eq!(format_conventional(CommitType::Chore, "", "bump"), "chore: bump");
    }

    #[test]
    fn test_type_round_trips_through_text() {
        assert_eq!(CommitType::from_str("refactor"), Ok(CommitType::Refactor));
        assert_eq!(CommitType::Docs.to_string(), "docs");
        assert!(CommitType::from_str("feature").is_err());
    }

    #[test]
    fn test_is_conventional() {
        assert!(is_conventional("fix(parser): handle empty input"));
        assert!(is_conventional("style: format"));
        assert!(!is_conventional("Fixed the parser"));
        assert!(!is_conventional("feat(): "));
        assert!(!is_conventional("feat:missing space"));
    }
}

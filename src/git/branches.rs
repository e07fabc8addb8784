//! Branch listing parsing

use once_cell::sync::Lazy;
use regex::Regex;

static AHEAD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ahead (\d+)").expect("Should compile: AHEAD_RE"));
static BEHIND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"behind (\d+)").expect("Should compile: BEHIND_RE"));

/// One local branch from `git branch -vv`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchRecord {
    pub name: String,
    pub is_current: bool,
    /// Third column of the verbose listing: the upstream in brackets, or the subject
    pub upstream: Option<String>,
    pub ahead: usize,
    pub behind: usize,
}

/// Parse `git branch -vv` output.
///
/// A leading `*` marks the checked-out branch; ahead/behind counts are read
/// from the tracking annotation when present.
pub fn parse_branch_listing(output: &str) -> Vec<BranchRecord> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let (is_current, rest) = match line.strip_prefix('*') {
                Some(rest) => (true, rest.trim_start()),
                None => (false, line),
            };

            let fields: Vec<&str> = rest.split_whitespace().collect();
            let name = (*fields.first()?).to_string();

            Some(BranchRecord {
                name,
                is_current,
                upstream: fields.get(2).map(|s| (*s).to_string()),
                ahead: capture_count(&AHEAD_RE, rest),
                behind: capture_count(&BEHIND_RE, rest),
            })
        })
        .collect()
}

fn capture_count(re: &Regex, text: &str) -> usize {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or_default()
}

/// The branch to compare against: `main` when it exists, else `master`
pub fn comparison_target(branches: &[BranchRecord]) -> &'static str {
    let has = |name: &str| branches.iter().any(|b| b.name == name);
    if !has("main") && has("master") {
        "master"
    } else {
        "main"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
* feature/login 1a2b3c4 [origin/feature/login: ahead 2, behind 1] add login
  main          9f8e7d6 [origin/main] initial commit
  scratch       0000aaa wip
";

    #[test]
    fn test_parse_current_and_tracking() {
        let branches = parse_branch_listing(LISTING);
        assert_eq!(branches.len(), 3);

        let current = &branches[0];
        assert!(current.is_current);
        assert_eq!(current.name, "feature/login");
        assert_eq!(current.ahead, 2);
        assert_eq!(current.behind, 1);

        assert!(!branches[1].is_current);
        assert_eq!(branches[1].ahead, 0);
        assert_eq!(branches[2].name, "scratch");
    }

    #[test]
    fn test_comparison_target_prefers_main() {
        let branches = parse_branch_listing(LISTING);
        assert_eq!(comparison_target(&branches), "main");

        let legacy = parse_branch_listing("* master abc123 init\n");
        assert_eq!(comparison_target(&legacy), "master");
    }
}

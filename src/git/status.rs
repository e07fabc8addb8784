//! Porcelain status parsing

use crate::commit::CommitType;

/// One line of `git status --porcelain`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub path: String,
    pub index_status: char,
    pub worktree_status: char,
    /// Commit type inferred by the suggestion engine, once it has run
    pub derived_type: Option<CommitType>,
    pub derived_scope: Option<String>,
}

impl ChangeRecord {
    pub fn new(path: impl Into<String>, index_status: char, worktree_status: char) -> Self {
        Self {
            path: path.into(),
            index_status,
            worktree_status,
            derived_type: None,
            derived_scope: None,
        }
    }

    /// The two-character `XY` status code
    pub fn status(&self) -> String {
        let mut code = String::with_capacity(2);
        code.push(self.index_status);
        code.push(self.worktree_status);
        code
    }

    pub fn is_staged(&self) -> bool {
        is_staged_code(self.index_status)
    }

    pub fn is_unstaged(&self) -> bool {
        self.worktree_status != ' '
    }

    pub fn is_untracked(&self) -> bool {
        self.index_status == '?' && self.worktree_status == '?'
    }

    /// Unmerged entries: either side `U`, or both sides added/deleted
    pub fn is_conflicted(&self) -> bool {
        self.index_status == 'U'
            || self.worktree_status == 'U'
            || matches!(
                (self.index_status, self.worktree_status),
                ('A', 'A') | ('D', 'D')
            )
    }
}

fn is_staged_code(code: char) -> bool {
    code != ' ' && code != '?'
}

/// Counts derived from a porcelain status listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub staged: usize,
    pub unstaged: usize,
    pub clean: bool,
}

/// Parse porcelain output into change records.
///
/// Lines shorter than three characters cannot carry a path and are skipped.
pub fn parse_porcelain(output: &str) -> Vec<ChangeRecord> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let mut chars = line.chars();
            let index_status = chars.next()?;
            let worktree_status = chars.next()?;
            let path = line.get(3..)?.trim();
            if path.is_empty() {
                return None;
            }
            // Renames report `old -> new`
            let path = path.rsplit(" -> ").next().unwrap_or(path);
            Some(ChangeRecord::new(unquote(path), index_status, worktree_status))
        })
        .collect()
}

/// Count staged and unstaged entries.
///
/// A line is staged when its first column is neither space nor `?`, and
/// unstaged when its second column is not a space. Untracked files are
/// therefore unstaged only. Lines too short to carry a path are skipped.
pub fn summarize(output: &str) -> StatusSummary {
    if output.trim().is_empty() {
        return StatusSummary {
            clean: true,
            ..StatusSummary::default()
        };
    }

    let mut summary = StatusSummary::default();
    for line in output.lines().filter(|l| !l.trim().is_empty()) {
        let mut chars = line.chars();
        let (Some(x), Some(y), Some(_)) = (chars.next(), chars.next(), chars.next()) else {
            continue;
        };
        if is_staged_code(x) {
            summary.staged += 1;
        }
        if y != ' ' {
            summary.unstaged += 1;
        }
    }
    summary
}

/// Whether `status --porcelain --branch` reports local commits not yet pushed
pub fn branch_header_is_ahead(output: &str) -> bool {
    output
        .lines()
        .find(|line| line.starts_with("## "))
        .is_some_and(|header| header.contains("ahead"))
}

/// Parse `rev-list --left-right --count` output into (ahead, behind)
pub fn parse_ahead_behind(output: &str) -> (usize, usize) {
    let mut parts = output.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(ahead), Some(behind), None) => (
            ahead.parse().unwrap_or_default(),
            behind.parse().unwrap_or_default(),
        ),
        _ => (0, 0),
    }
}

/// Git quotes paths with unusual characters; strip the surrounding quotes
fn unquote(path: &str) -> String {
    path.strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .unwrap_or(path)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_counts_columns_independently() {
        let summary = summarize("M  a.go\n?? b.go\n D c.go\n");
        assert_eq!(summary.staged, 1);
        assert_eq!(summary.unstaged, 2);
        assert!(!summary.clean);
    }

    #[test]
    fn test_summarize_both_columns() {
        let summary = summarize("MM both.rs\nA  new.rs\n");
        assert_eq!(summary.staged, 2);
        assert_eq!(summary.unstaged, 1);
    }

    #[test]
    fn test_summarize_skips_short_lines() {
        let summary = summarize("M \nMM\n M a.go\n");
        assert_eq!(summary.staged, 0);
        assert_eq!(summary.unstaged, 1);
    }

    #[test]
    fn test_empty_status_is_clean() {
        assert!(summarize("").clean);
        assert!(parse_porcelain("").is_empty());
    }

    #[test]
    fn test_parse_keeps_leading_space_column() {
        let changes = parse_porcelain(" M src/lib.rs\nR  \"odd name.txt\"\nx\n");
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].status(), " M");
        assert_eq!(changes[0].path, "src/lib.rs");
        assert!(!changes[0].is_staged());
        assert!(changes[0].is_unstaged());
        assert_eq!(changes[1].path, "odd name.txt");
    }

    #[test]
    fn test_conflict_detection() {
        let changes = parse_porcelain("UU a.txt\nAA b.txt\nM  c.txt\n");
        let conflicted: Vec<bool> = changes.iter().map(ChangeRecord::is_conflicted).collect();
        assert_eq!(conflicted, vec![true, true, false]);
    }

    #[test]
    fn test_ahead_behind() {
        assert_eq!(parse_ahead_behind("2\t5\n"), (2, 5));
        assert_eq!(parse_ahead_behind("garbage"), (0, 0));
    }

    #[test]
    fn test_branch_header_ahead() {
        assert!(branch_header_is_ahead("## main...origin/main [ahead 1]\n M a\n"));
        assert!(!branch_header_is_ahead("## main...origin/main\n"));
    }
}

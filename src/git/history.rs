//! Commit log, reflog and rebase plan parsing

use strum_macros::{Display, EnumString};

/// Field separator used in every `--pretty=format:` string
pub const FIELD_DELIMITER: char = '|';
/// `hash|subject|author|relative date`
pub const LOG_FORMAT: &str = "--pretty=format:%h|%s|%an|%ar";
/// `hash|subject|relative date`
pub const REFLOG_FORMAT: &str = "--pretty=format:%h|%s|%ar";
/// `hash|subject`
pub const REBASE_FORMAT: &str = "--pretty=format:%h|%s";

/// Largest number of commits the rebase planner accepts
pub const MAX_REBASE_COUNT: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: String,
    pub subject: String,
    pub author: String,
    pub date: String,
}

/// Parse `git log` output produced with [`LOG_FORMAT`].
///
/// Lines with fewer than four fields are dropped.
pub fn parse_log(output: &str) -> Vec<CommitRecord> {
    output
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
            match fields.as_slice() {
                [hash, subject, author, date, ..] => Some(CommitRecord {
                    hash: (*hash).to_string(),
                    subject: (*subject).to_string(),
                    author: (*author).to_string(),
                    date: (*date).to_string(),
                }),
                _ => None,
            }
        })
        .collect()
}

/// Parse `git reflog` output produced with [`REFLOG_FORMAT`]; reflog entries carry no author
pub fn parse_reflog(output: &str) -> Vec<CommitRecord> {
    output
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
            match fields.as_slice() {
                [hash, subject, date, ..] => Some(CommitRecord {
                    hash: (*hash).to_string(),
                    subject: (*subject).to_string(),
                    author: String::new(),
                    date: (*date).to_string(),
                }),
                _ => None,
            }
        })
        .collect()
}

/// What to do with a commit during an interactive rebase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RebaseAction {
    #[default]
    Pick,
    Reword,
    Squash,
    Fixup,
    Drop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebaseCommit {
    pub hash: String,
    pub subject: String,
    pub action: RebaseAction,
}

/// Parse `git log -N` output into a rebase plan, oldest commit first
pub fn parse_rebase_plan(output: &str) -> Vec<RebaseCommit> {
    let mut plan: Vec<RebaseCommit> = output
        .lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let (hash, subject) = line.split_once(FIELD_DELIMITER)?;
            Some(RebaseCommit {
                hash: hash.to_string(),
                subject: subject.to_string(),
                action: RebaseAction::Pick,
            })
        })
        .collect();
    plan.reverse();
    plan
}

/// Render a plan in the todo-list format `git rebase -i` reads
pub fn render_todo(plan: &[RebaseCommit]) -> String {
    plan.iter()
        .map(|commit| format!("{} {} {}\n", commit.action, commit.hash, commit.subject))
        .collect()
}

/// Validate the commit count typed into the rebase prompt
pub fn parse_rebase_count(input: &str) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=MAX_REBASE_COUNT).contains(n))
}

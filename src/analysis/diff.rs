use super::matchers::{
    FUNCTION_MATCHERS, IMPORT_MATCHERS, VARIABLE_MATCHERS, extract_comment, first_match,
    is_import_line,
};
use strum_macros::Display;

/// Subject area suggested by keywords in the added lines.
///
/// Declaration order is the tie-break order when two topics score equally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Topic {
    Fix,
    Validation,
    Api,
    Security,
    Performance,
}

impl Topic {
    pub const ALL: [Self; 5] = [
        Self::Fix,
        Self::Validation,
        Self::Api,
        Self::Security,
        Self::Performance,
    ];

    /// Lower-case keywords that count towards this topic
    pub fn vocabulary(self) -> &'static [&'static str] {
        match self {
            Self::Fix => &["bug", "fix", "error", "crash", "issue", "problem"],
            Self::Validation => &["validate", "validation", "check", "verify", "sanitize"],
            Self::Api => &["endpoint", "route", "handler", "api", "request", "response"],
            Self::Security => &["auth", "security", "permission", "token", "encrypt"],
            Self::Performance => &["optimize", "performance", "cache", "speed", "efficient"],
        }
    }

    /// Lead-in used when composing a commit description
    pub fn message_prefix(self) -> &'static str {
        match self {
            Self::Fix => "fix",
            Self::Validation => "add validation for",
            Self::Api => "add API endpoint for",
            Self::Security => "improve security in",
            Self::Performance => "optimize",
        }
    }
}

/// Structural signals extracted from one file's unified diff
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffInfo {
    pub lines_added: usize,
    pub lines_removed: usize,
    /// Declared names in first-seen order, without duplicates
    pub functions: Vec<String>,
    pub variables: Vec<String>,
    pub imports: Vec<String>,
    pub comments: Vec<String>,
    pub keywords: Vec<String>,
    pub has_tests: bool,
    pub has_docs: bool,
    pub dominant_context: Option<Topic>,
}

impl DiffInfo {
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    pub fn total_changed(&self) -> usize {
        self.lines_added + self.lines_removed
    }
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

/// Extract signals from unified diff text.
///
/// Only added lines are inspected; removed lines are counted. File headers
/// (`+++`/`---`) are ignored.
pub fn analyze(diff: &str) -> DiffInfo {
    let mut info = DiffInfo::default();
    let mut topic_counts = [0usize; Topic::ALL.len()];

    for line in diff.lines() {
        if let Some(added) = line.strip_prefix('+') {
            if added.starts_with("++") {
                continue;
            }
            info.lines_added += 1;
            inspect_added_line(&mut info, &mut topic_counts, added);
        } else if line.starts_with('-') && !line.starts_with("---") {
            info.lines_removed += 1;
        }
    }

    info.dominant_context = dominant_topic(&topic_counts);
    info
}

fn inspect_added_line(info: &mut DiffInfo, topic_counts: &mut [usize], raw: &str) {
    let code = raw.trim();

    if let Some(name) = first_match(&FUNCTION_MATCHERS, code) {
        push_unique(&mut info.functions, name);
    }
    if let Some(name) = first_match(&VARIABLE_MATCHERS, code) {
        push_unique(&mut info.variables, name);
    }
    if is_import_line(code)
        && let Some(name) = first_match(&IMPORT_MATCHERS, code)
    {
        push_unique(&mut info.imports, name);
    }
    if let Some(comment) = extract_comment(code) {
        info.comments.push(comment);
    }

    let lower = raw.to_lowercase();
    for (index, topic) in Topic::ALL.iter().enumerate() {
        for keyword in topic.vocabulary() {
            if lower.contains(keyword) {
                push_unique(&mut info.keywords, (*keyword).to_string());
                if let Some(count) = topic_counts.get_mut(index) {
                    *count += 1;
                }
            }
        }
    }

    if lower.contains("test") {
        info.has_tests = true;
    }
    if raw.contains("//") || raw.contains("/*") || raw.contains('#') {
        info.has_docs = true;
    }
}

/// Highest-scoring topic; the earliest declared wins a tie, and no hits means no topic
fn dominant_topic(counts: &[usize]) -> Option<Topic> {
    let mut best: Option<(Topic, usize)> = None;
    for (topic, &count) in Topic::ALL.iter().zip(counts) {
        if count > best.map_or(0, |(_, c)| c) {
            best = Some((*topic, count));
        }
    }
    best.map(|(topic, _)| topic)
}

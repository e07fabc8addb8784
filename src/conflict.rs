//! Merge-conflict marker parsing and resolution

use strum_macros::{Display, EnumString};

const OURS_MARKER: &str = "<<<<<<< ";
const BASE_MARKER: &str = "||||||| ";
const SEPARATOR: &str = "=======";
const THEIRS_MARKER: &str = ">>>>>>> ";

/// One `<<<<<<< ... >>>>>>>` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictRegion {
    /// Zero-based line index of the opening marker
    pub start_line: usize,
    pub ours: Vec<String>,
    pub theirs: Vec<String>,
}

/// A file with unresolved merge conflicts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictFile {
    pub path: String,
    pub regions: Vec<ConflictRegion>,
    pub resolved: bool,
}

impl ConflictFile {
    pub fn new(path: impl Into<String>, regions: Vec<ConflictRegion>) -> Self {
        Self {
            path: path.into(),
            regions,
            resolved: false,
        }
    }
}

/// Which side of each region survives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ResolutionStrategy {
    Ours,
    Theirs,
    Both,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Outside,
    Ours,
    Base,
    Theirs,
}

/// Find all conflict regions in `content`.
///
/// An opening marker without a matching closing marker is ignored.
pub fn parse_markers(content: &str) -> Vec<ConflictRegion> {
    let mut regions = Vec::new();
    let mut section = Section::Outside;
    let mut start_line = 0;
    let mut ours = Vec::new();
    let mut theirs = Vec::new();

    for (index, line) in content.lines().enumerate() {
        match section {
            _ if line.starts_with(OURS_MARKER) => {
                section = Section::Ours;
                start_line = index;
                ours.clear();
                theirs.clear();
            }
            Section::Outside => {}
            Section::Ours | Section::Base if line.starts_with(SEPARATOR) => {
                section = Section::Theirs;
            }
            Section::Ours if line.starts_with(BASE_MARKER) => section = Section::Base,
            Section::Ours => ours.push(line.to_string()),
            Section::Base => {}
            Section::Theirs if line.starts_with(THEIRS_MARKER) => {
                regions.push(ConflictRegion {
                    start_line,
                    ours: std::mem::take(&mut ours),
                    theirs: std::mem::take(&mut theirs),
                });
                section = Section::Outside;
            }
            Section::Theirs => theirs.push(line.to_string()),
        }
    }

    regions
}

/// Rewrite `content` with every conflict region replaced according to `strategy`.
///
/// Text outside the regions is preserved byte for byte, and every kept line
/// keeps its own terminator, so CRLF files stay CRLF.
pub fn resolve(content: &str, strategy: ResolutionStrategy) -> String {
    let mut output = String::with_capacity(content.len());
    let mut pending: Vec<&str> = Vec::new();
    let mut section = Section::Outside;
    let mut ours: Vec<&str> = Vec::new();
    let mut theirs: Vec<&str> = Vec::new();

    for line in content.split_inclusive('\n') {
        match section {
            Section::Outside if line.starts_with(OURS_MARKER) => {
                section = Section::Ours;
                pending.clear();
                pending.push(line);
                ours.clear();
                theirs.clear();
            }
            Section::Outside => output.push_str(line),
            _ if line.starts_with(OURS_MARKER) => {
                // Nested opener: flush the unterminated block as-is
                output.extend(pending.drain(..));
                pending.push(line);
                section = Section::Ours;
                ours.clear();
                theirs.clear();
            }
            Section::Ours | Section::Base if line.starts_with(SEPARATOR) => {
                pending.push(line);
                section = Section::Theirs;
            }
            Section::Ours if line.starts_with(BASE_MARKER) => {
                pending.push(line);
                section = Section::Base;
            }
            Section::Ours => {
                pending.push(line);
                ours.push(line);
            }
            Section::Base => pending.push(line),
            Section::Theirs if line.starts_with(THEIRS_MARKER) => {
                match strategy {
                    ResolutionStrategy::Ours => output.extend(ours.drain(..)),
                    ResolutionStrategy::Theirs => output.extend(theirs.drain(..)),
                    ResolutionStrategy::Both => {
                        output.extend(ours.drain(..));
                        output.extend(theirs.drain(..));
                    }
                }
                pending.clear();
                section = Section::Outside;
                if !line.ends_with('\n') {
                    trim_line_ending(&mut output);
                }
            }
            Section::Theirs => {
                pending.push(line);
                theirs.push(line);
            }
        }
    }
    output.extend(pending.drain(..));
    output
}

/// Drop one trailing `\n` or `\r\n`
fn trim_line_ending(text: &mut String) {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
}

/// True iff there is at least one conflicted file and every one is resolved
pub fn all_resolved(files: &[ConflictFile]) -> bool {
    !files.is_empty() && files.iter().all(|file| file.resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFLICTED: &str = "\
fn main() {
<<<<<<< HEAD
    println!(\"ours\");
=======
    println!(\"theirs\");
    println!(\"more theirs\");
>>>>>>> feature
}
";

    #[test]
    fn test_parse_single_region() {
        let regions = parse_markers(CONFLICTED);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].start_line, 1);
        assert_eq!(regions[0].ours, vec!["    println!(\"ours\");"]);
        assert_eq!(regions[0].theirs.len(), 2);
    }

    #[test]
    fn test_resolve_each_strategy() {
        assert_eq!(
            resolve(CONFLICTED, ResolutionStrategy::Ours),
            "fn main() {\n    println!(\"ours\");\n}\n"
        );
        assert_eq!(
            resolve(CONFLICTED, ResolutionStrategy::Theirs),
            "fn main() {\n    println!(\"theirs\");\n    println!(\"more theirs\");\n}\n"
        );
        let both = resolve(CONFLICTED, ResolutionStrategy::Both);
        assert!(both.contains("ours") && both.contains("more theirs"));
        assert!(parse_markers(&both).is_empty());
    }

    #[test]
    fn test_diff3_base_section_is_dropped() {
        let content = "<<<<<<< HEAD\na\n||||||| base\nold\n=======\nb\n>>>>>>> other\n";
        let regions = parse_markers(content);
        assert_eq!(regions[0].ours, vec!["a"]);
        assert_eq!(regions[0].theirs, vec!["b"]);
        assert_eq!(resolve(content, ResolutionStrategy::Both), "a\nb\n");
    }

    #[test]
    fn test_resolve_keeps_crlf_line_endings() {
        let content = "a\r\n<<<<<<< HEAD\r\nx\r\n=======\r\ny\r\n>>>>>>> b\r\nz\r\n";
        assert_eq!(resolve(content, ResolutionStrategy::Ours), "a\r\nx\r\nz\r\n");
        assert_eq!(resolve(content, ResolutionStrategy::Both), "a\r\nx\r\ny\r\nz\r\n");
        assert_eq!(parse_markers(content)[0].theirs, vec!["y"]);
    }

    #[test]
    fn test_region_at_end_without_newline() {
        let content = "a\n<<<<<<< HEAD\nx\n=======\ny\n>>>>>>> b";
        assert_eq!(resolve(content, ResolutionStrategy::Theirs), "a\ny");
    }

    #[test]
    fn test_unterminated_region_is_left_alone() {
        let content = "x\n<<<<<<< HEAD\ny\n";
        assert!(parse_markers(content).is_empty());
        assert_eq!(resolve(content, ResolutionStrategy::Ours), content);
    }

    #[test]
    fn test_all_resolved_requires_non_empty_list() {
        assert!(!all_resolved(&[]));

        let mut file = ConflictFile::new("a.rs", parse_markers(CONFLICTED));
        assert!(!all_resolved(std::slice::from_ref(&file)));

        file.resolved = true;
        assert!(all_resolved(&[file]));
    }
}

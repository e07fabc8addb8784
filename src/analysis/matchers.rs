//! Line-level name extractors
//!
//! Each extractor is an independent strategy; callers try a list of them in
//! priority order and keep the first hit. None of them parse source code, so
//! false positives and misses are expected.

use once_cell::sync::Lazy;
use regex::Regex;

/// Pulls one name out of a single added line (without its `+` prefix)
pub trait LineMatcher: Send + Sync {
    /// Short label used in debug logs
    fn label(&self) -> &'static str;

    fn extract(&self, line: &str) -> Option<String>;
}

/// Matcher driven by a regex whose first capture group is the name
pub struct CaptureMatcher {
    label: &'static str,
    pattern: &'static Lazy<Regex>,
    accept: fn(&str) -> bool,
}

impl LineMatcher for CaptureMatcher {
    fn label(&self) -> &'static str {
        self.label
    }

    fn extract(&self, line: &str) -> Option<String> {
        let name = self.pattern.captures(line)?.get(1)?.as_str();
        (self.accept)(name).then(|| name.to_string())
    }
}

fn any_name(name: &str) -> bool {
    !name.is_empty()
}

/// Skip throwaway identifiers and literals that look like assignments
fn meaningful_variable(name: &str) -> bool {
    name.len() > 2 && !matches!(name, "err" | "nil" | "true" | "false")
}

// Go functions and methods, with or without a receiver
static GO_FUNC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bfunc\s+(?:\([^)]*\)\s*)?(\w+)").expect("Should compile: GO_FUNC_RE")
});
// JavaScript/TypeScript named functions
static JS_FUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bfunction\s*\*?\s+(\w+)").expect("Should compile: JS_FUNCTION_RE")
});
// Arrow functions bound to a const
static ARROW_FUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bconst\s+(\w+)\s*(?::[^=]+)?=\s*(?:async\s*)?(?:\([^)]*\)|\w+)\s*=>")
        .expect("Should compile: ARROW_FUNCTION_RE")
});
// Python functions
static PYTHON_DEF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bdef\s+(\w+)").expect("Should compile: PYTHON_DEF_RE"));
// Rust functions
static RUST_FN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bfn\s+(\w+)").expect("Should compile: RUST_FN_RE"));
// Classes in most C-family and scripting languages
static CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bclass\s+(\w+)").expect("Should compile: CLASS_RE"));

static VAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bvar\s+(\w+)").expect("Should compile: VAR_RE"));
static CONST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bconst\s+(\w+)").expect("Should compile: CONST_RE"));
static LET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\blet\s+(?:mut\s+)?(\w+)").expect("Should compile: LET_RE"));
static SHORT_DECL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+)\s*:=").expect("Should compile: SHORT_DECL_RE"));
static ASSIGN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+)\s*=").expect("Should compile: ASSIGN_RE"));

/// Function and class declaration strategies, highest priority first
pub static FUNCTION_MATCHERS: Lazy<Vec<Box<dyn LineMatcher>>> = Lazy::new(|| {
    vec![
        Box::new(CaptureMatcher {
            label: "go-func",
            pattern: &GO_FUNC_RE,
            accept: any_name,
        }),
        Box::new(CaptureMatcher {
            label: "js-function",
            pattern: &JS_FUNCTION_RE,
            accept: any_name,
        }),
        Box::new(CaptureMatcher {
            label: "arrow-function",
            pattern: &ARROW_FUNCTION_RE,
            accept: any_name,
        }),
        Box::new(CaptureMatcher {
            label: "python-def",
            pattern: &PYTHON_DEF_RE,
            accept: any_name,
        }),
        Box::new(CaptureMatcher {
            label: "rust-fn",
            pattern: &RUST_FN_RE,
            accept: any_name,
        }),
        Box::new(CaptureMatcher {
            label: "class",
            pattern: &CLASS_RE,
            accept: any_name,
        }),
    ]
});

/// Variable declaration and assignment strategies, highest priority first
pub static VARIABLE_MATCHERS: Lazy<Vec<Box<dyn LineMatcher>>> = Lazy::new(|| {
    [&VAR_RE, &CONST_RE, &LET_RE, &SHORT_DECL_RE, &ASSIGN_RE]
        .into_iter()
        .map(|pattern| {
            Box::new(CaptureMatcher {
                label: "variable",
                pattern,
                accept: meaningful_variable,
            }) as Box<dyn LineMatcher>
        })
        .collect()
});

/// `import x`, `import x from "pkg"` and Go's `import "a/b"`
struct ImportStatement;

impl LineMatcher for ImportStatement {
    fn label(&self) -> &'static str {
        "import"
    }

    fn extract(&self, line: &str) -> Option<String> {
        let rest = line.strip_prefix("import ")?;
        let target = rest.split_whitespace().last()?;
        last_path_segment(target.trim_matches(|c| matches!(c, '"' | '\'' | ';' | '`')), '/')
    }
}

/// Python's `from pkg import name`
struct FromImport;

impl LineMatcher for FromImport {
    fn label(&self) -> &'static str {
        "from-import"
    }

    fn extract(&self, line: &str) -> Option<String> {
        let module = line.strip_prefix("from ")?.split_whitespace().next()?;
        word_like(module).then(|| module.to_string())
    }
}

/// CommonJS `require("pkg")`, bare or bound to a const
struct Require;

impl LineMatcher for Require {
    fn label(&self) -> &'static str {
        "require"
    }

    fn extract(&self, line: &str) -> Option<String> {
        let applies = line.starts_with("require(")
            || (line.starts_with("const ") && line.contains("require("));
        if !applies {
            return None;
        }
        let start = line.find("require(")? + "require(".len();
        let end = line.get(start..)?.find(')')?;
        let package = line.get(start..start + end)?.trim_matches(|c| c == '"' || c == '\'');
        last_path_segment(package, '/')
    }
}

/// Rust `use a::b::c;`
struct UseDeclaration;

impl LineMatcher for UseDeclaration {
    fn label(&self) -> &'static str {
        "use"
    }

    fn extract(&self, line: &str) -> Option<String> {
        let path = line.strip_prefix("use ")?.trim_end_matches(';').trim();
        let path = path.split('{').next()?.trim_end_matches("::");
        last_path_segment(path, ':')
    }
}

/// C/C++ `#include <header.h>`
struct Include;

impl LineMatcher for Include {
    fn label(&self) -> &'static str {
        "include"
    }

    fn extract(&self, line: &str) -> Option<String> {
        let header = line.strip_prefix("#include")?.trim();
        let header = header.trim_matches(|c| matches!(c, '<' | '>' | '"'));
        last_path_segment(header, '/')
    }
}

/// Import strategies, highest priority first
pub static IMPORT_MATCHERS: Lazy<Vec<Box<dyn LineMatcher>>> = Lazy::new(|| {
    vec![
        Box::new(ImportStatement),
        Box::new(FromImport),
        Box::new(Require),
        Box::new(UseDeclaration),
        Box::new(Include),
    ]
});

fn word_like(text: &str) -> bool {
    text.chars().any(char::is_alphanumeric)
}

fn last_path_segment(path: &str, separator: char) -> Option<String> {
    let segment = path.rsplit(separator).find(|s| !s.is_empty())?;
    word_like(segment).then(|| segment.to_string())
}

/// Try `matchers` in order and return the first extracted name
pub fn first_match(matchers: &[Box<dyn LineMatcher>], line: &str) -> Option<String> {
    matchers.iter().find_map(|matcher| matcher.extract(line))
}

/// Whether any import strategy recognises the line
pub fn is_import_line(line: &str) -> bool {
    line.starts_with("import ")
        || line.starts_with("from ")
        || line.starts_with("#include")
        || line.starts_with("require(")
        || (line.starts_with("const ") && line.contains("require("))
        || line.starts_with("use ")
}

/// Text of an inline `//` comment or a `#` line comment, when long enough to say something
pub fn extract_comment(line: &str) -> Option<String> {
    if let Some(index) = line.find("//") {
        let comment = line[index + 2..].trim();
        if comment.len() > 5 {
            return Some(comment.to_string());
        }
    }

    if line.starts_with('#') && !line.starts_with("#include") {
        let comment = line[1..].trim();
        if comment.len() > 5 {
            return Some(comment.to_string());
        }
    }

    None
}

//! Merge per-file suggestions into a ranked list

use super::types::{CommitSuggestion, CommitType};

/// Suggestions are picked with the number keys, so never offer more than nine
pub const MAX_SUGGESTIONS: usize = 9;

/// Most frequent value; on a tie the one seen first wins
fn majority<'a, T: PartialEq + ?Sized>(
    items: impl Iterator<Item = &'a T>,
) -> Option<(&'a T, usize)> {
    let mut counts: Vec<(&T, usize)> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|(seen, _)| *seen == item) {
            Some((_, count)) => *count += 1,
            None => counts.push((item, 1)),
        }
    }

    let mut best: Option<(&T, usize)> = None;
    for (item, count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((item, count));
        }
    }
    best
}

/// One suggestion summarising every changed file
pub fn combine(individual: &[CommitSuggestion]) -> Option<CommitSuggestion> {
    let total = individual.len();
    let (kind, _) = majority(individual.iter().map(|s| &s.kind))?;
    let uniform = individual.iter().all(|s| s.kind == *kind);

    let description = if uniform {
        match kind {
            CommitType::Feat if total == 1 => "add new feature".to_string(),
            CommitType::Feat => format!("add new features across {total} files"),
            CommitType::Fix if total == 1 => "fix bug".to_string(),
            CommitType::Fix => format!("fix multiple bugs ({total} files)"),
            CommitType::Docs => "update documentation".to_string(),
            CommitType::Test => "update tests".to_string(),
            CommitType::Chore => "update configuration".to_string(),
            CommitType::Refactor => "refactor code".to_string(),
            CommitType::Style => "update files".to_string(),
        }
    } else {
        format!("update {total} files with mixed changes")
    };

    let scope = majority(
        individual
            .iter()
            .map(|s| s.scope.as_str())
            .filter(|scope| !scope.is_empty()),
    )
    .filter(|(_, count)| *count > total / 2)
    .map(|(scope, _)| scope)
    .unwrap_or_default();

    Some(CommitSuggestion::new(*kind, scope, &description))
}

/// Combined suggestion first, then the per-file ones when there are few enough files.
///
/// `max_individual` is the file count above which per-file suggestions are
/// left out. The result never exceeds [`MAX_SUGGESTIONS`] entries and is
/// empty only for empty input.
pub fn aggregate(
    individual: Vec<CommitSuggestion>,
    max_individual: usize,
) -> Vec<CommitSuggestion> {
    let Some(combined) = combine(&individual) else {
        return Vec::new();
    };

    let mut suggestions = vec![combined];
    if individual.len() <= max_individual {
        suggestions.extend(individual);
    }
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

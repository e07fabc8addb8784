//! Conventional-commit suggestions derived from pending changes

mod aggregator;
mod classifier;
mod composer;
mod types;

pub use aggregator::{MAX_SUGGESTIONS, aggregate, combine};
pub use classifier::{classify, scope_for};
pub use composer::{describe, suggest_for_change};
pub use types::{
    CONVENTIONAL_PATTERN, CommitSuggestion, CommitType, format_conventional, is_conventional,
};

use crate::analysis::{DiffInfo, analyze};
use crate::git::{ChangeRecord, GitError, SnapshotLoader};
use crate::log_debug;

/// Ranked suggestions plus the changes annotated with what was inferred for each
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionSet {
    pub suggestions: Vec<CommitSuggestion>,
    pub annotated: Vec<ChangeRecord>,
}

/// Build suggestions from already-analyzed changes
pub fn build_suggestions(
    analyzed: &[(ChangeRecord, DiffInfo)],
    max_individual: usize,
) -> SuggestionSet {
    let mut individual = Vec::with_capacity(analyzed.len());
    let mut annotated = Vec::with_capacity(analyzed.len());

    for (change, diff) in analyzed {
        let suggestion = suggest_for_change(change, diff);
        annotated.push(ChangeRecord {
            derived_type: Some(suggestion.kind),
            derived_scope: Some(suggestion.scope.clone()),
            ..change.clone()
        });
        individual.push(suggestion);
    }

    SuggestionSet {
        suggestions: aggregate(individual, max_individual),
        annotated,
    }
}

/// Load each change's diff and build suggestions.
///
/// A diff that cannot be loaded is analyzed as empty; the file still gets a
/// path-based suggestion.
pub async fn suggest(
    loader: &SnapshotLoader,
    changes: &[ChangeRecord],
    max_individual: usize,
) -> Result<SuggestionSet, GitError> {
    let mut analyzed = Vec::with_capacity(changes.len());
    for change in changes {
        let diff = match loader.file_diff(&change.path).await {
            Ok(text) => analyze(&text),
            Err(e) if e.is_lock_related() => return Err(e),
            Err(e) => {
                log_debug!("No diff for {}: {}", change.path, e);
                DiffInfo::default()
            }
        };
        analyzed.push((change.clone(), diff));
    }
    Ok(build_suggestions(&analyzed, max_individual))
}

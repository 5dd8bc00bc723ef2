//! Candidate filtering
//!
//! Items whose text starts with the match string (case-insensitive) keep their
//! configured order; the raw match string is always appended as a last,
//! literal candidate so the list is never empty and free text can be committed.

use serde::{Deserialize, Serialize};

use super::scanner::MatchProcess;
use super::spec::{CompletionItem, CompletionSpec};

/// Filtered candidates for the active match, literal fallback last
pub fn candidates(spec: &CompletionSpec, active: &MatchProcess) -> Vec<CompletionItem> {
    let needle = active.match_string.to_lowercase();
    spec.items
        .iter()
        .filter(|item| item.text.to_lowercase().starts_with(&needle))
        .cloned()
        .chain(std::iter::once(CompletionItem::new(active.match_string.clone())))
        .collect()
}

/// One row of the completion panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateView {
    pub text: String,
    pub index: usize,
    pub selected: bool,
}

/// Render-ready rows with the highlighted one marked
pub fn candidate_views(items: &[CompletionItem], selected_index: usize) -> Vec<CandidateView> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| CandidateView {
            text: item.text.clone(),
            index,
            selected: index == selected_index,
        })
        .collect()
}

//! CompletionCommitter: replace a match with a tagged entity
//!
//! Steps, atomic from the caller's view (the input document is never touched):
//! 1. Resolve the candidate at the selected index
//! 2. Build the replacement text (trigger re-prefixed if `keep_trigger`)
//! 3. Create an entity of the spec's type and mutability
//! 4. Replace `[trigger_offset, caret_offset)` with the text, tagged with the entity
//! 5. Put the caret right after the inserted text

use std::ops::Range;

use tracing::debug;

use super::document::{DocumentModel, EntityKey};
use super::filter::candidates;
use super::registry::SpecRegistry;
use super::scanner::MatchProcess;
use super::spec::CompletionSpec;

/// Outcome of a successful commit
#[derive(Debug, Clone)]
pub struct Committed<D> {
    /// New document with the caret after the inserted text
    pub document: D,
    pub entity: EntityKey,
    /// Char range the inserted text occupies in the block
    pub inserted: Range<usize>,
    pub text: String,
}

/// Commit candidate `selected_index` of `active` under `spec`.
///
/// # Panics
/// If `selected_index` is outside the candidate list. The selection cursor
/// keeps the index clamped, so reaching this is a caller bug.
pub fn commit<D: DocumentModel>(
    spec: &CompletionSpec,
    active: &MatchProcess,
    selected_index: usize,
    document: &D,
) -> Committed<D> {
    let items = candidates(spec, active);
    let Some(candidate) = items.get(selected_index) else {
        panic!(
            "selected index {} out of range for {} candidates of trigger '{}'",
            selected_index,
            items.len(),
            active.trigger
        );
    };

    let text = spec.replacement_text(&candidate.text);
    let (with_entity, entity) = document.create_entity(&spec.entity_type, spec.entity_mutability);
    let replaced = with_entity.replace_text(
        &active.block_key,
        active.trigger_offset..active.caret_offset,
        &text,
        Some(entity),
    );
    let caret = replaced.selection_after().clone();
    let document = replaced.with_selection(caret);

    let inserted = active.trigger_offset..active.trigger_offset + text.chars().count();
    debug!(
        trigger = %active.trigger,
        entity_type = %spec.entity_type,
        start = inserted.start,
        end = inserted.end,
        "committed completion"
    );

    Committed {
        document,
        entity,
        inserted,
        text,
    }
}

/// Commit the active match if there is one and its spec is registered.
///
/// `None` means there was nothing to commit, not an error.
pub fn commit_active<D: DocumentModel>(
    registry: &SpecRegistry,
    active: Option<&MatchProcess>,
    selected_index: usize,
    document: &D,
) -> Option<Committed<D>> {
    let active = active?;
    let spec = registry.by_trigger(&active.trigger)?;
    Some(commit(spec, active, selected_index, document))
}

/// Insert `text` at a collapsed caret and move the caret past it.
/// `None` for a range selection.
pub fn insert_at_caret<D: DocumentModel>(document: &D, text: &str) -> Option<D> {
    let (block, offset) = document.selection().caret_position()?;
    let block = block.clone();
    let inserted = document.replace_text(&block, offset..offset, text, None);
    let caret = inserted.selection_after().clone();
    Some(inserted.with_selection(caret))
}

// =============================================================================
// Tests
// =============================================================================

//! MatchScanner: in-progress trigger matches in one block
//!
//! For one TriggerSpec, walks every occurrence of the trigger left to right and
//! keeps those that could be completed at the caret:
//! - the occurrence ends at or before the caret
//! - no char in `[trigger_start, caret)` already belongs to an entity
//! - the text before the trigger passes `before_trigger_allowed`
//! - the text between trigger end and caret passes `match_string_allowed`
//!
//! Occurrences of the same trigger never overlap: scanning resumes at the end
//! of the previous occurrence. The scan is a full re-scan of the block on every
//! call; nothing is cached between document changes.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::document::{char_to_byte, BlockKey, DocumentModel};
use super::registry::SpecRegistry;
use super::spec::TriggerSpec;

// =============================================================================
// Types
// =============================================================================

/// A detected, uncommitted completion context. Superseded on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchProcess {
    /// Trigger string of the spec that produced this match (unique per registry)
    pub trigger: String,
    pub block_key: BlockKey,
    /// Char offset where the trigger starts
    pub trigger_offset: usize,
    /// Char offset of the caret (match end)
    pub caret_offset: usize,
    /// Text between trigger end and caret
    pub match_string: String,
}

impl MatchProcess {
    /// Identity used to decide whether the highlighted index survives a change
    pub fn identity(&self) -> (&BlockKey, usize) {
        (&self.block_key, self.trigger_offset)
    }

    pub fn same_identity(&self, other: &MatchProcess) -> bool {
        self.identity() == other.identity()
    }
}

// =============================================================================
// Scanning
// =============================================================================

/// Find every valid match of `spec` in `block` for a caret at `caret_offset`.
pub fn scan_block<D: DocumentModel>(
    spec: &TriggerSpec,
    document: &D,
    block: &BlockKey,
    caret_offset: usize,
) -> Vec<MatchProcess> {
    let Some(text) = document.block_text(block) else {
        return Vec::new();
    };

    let trigger = spec.trigger();
    let trigger_len = spec.trigger_len();
    let caret_byte = char_to_byte(text, caret_offset);
    // Occurrences starting at or before this offset have an entity in `[trigger, caret)`
    let last_entity = (0..caret_offset)
        .rev()
        .find(|&offset| document.entity_at(block, offset).is_some());
    let mut matches = Vec::new();
    // Byte cursor for `find`, running char offset for everything reported
    let mut cursor = 0;
    let mut char_cursor = 0;

    while let Some(found) = text[cursor..].find(trigger) {
        let byte_start = cursor + found;
        let byte_end = byte_start + trigger.len();
        let trigger_start = char_cursor + text[cursor..byte_start].chars().count();
        let trigger_end = trigger_start + trigger_len;

        if trigger_end <= caret_offset {
            let intervening_entity = last_entity.is_some_and(|offset| offset >= trigger_start);
            let before_trigger = &text[..byte_start];
            let match_string = &text[byte_end..caret_byte];

            if !intervening_entity
                && spec.allows_before(before_trigger)
                && spec.allows_match_string(match_string)
            {
                matches.push(MatchProcess {
                    trigger: trigger.to_string(),
                    block_key: block.clone(),
                    trigger_offset: trigger_start,
                    caret_offset,
                    match_string: match_string.to_string(),
                });
            }
        }

        cursor = byte_end;
        char_cursor = trigger_end;
    }

    matches
}

/// Matches of `spec` in the block holding the caret.
///
/// Empty when the selection is not collapsed: a range selection never
/// opens a completion.
pub fn scan_current_block<D: DocumentModel>(spec: &TriggerSpec, document: &D) -> Vec<MatchProcess> {
    match document.selection().caret_position() {
        Some((block, caret_offset)) => scan_block(spec, document, block, caret_offset),
        None => Vec::new(),
    }
}

/// Matches for every registered trigger, grouped per trigger in registration order
pub fn scan_all<D: DocumentModel>(registry: &SpecRegistry, document: &D) -> Vec<Vec<MatchProcess>> {
    registry
        .trigger_specs()
        .map(|spec| {
            let matches = scan_current_block(spec, document);
            trace!(trigger = spec.trigger(), count = matches.len(), "scanned trigger");
            matches
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

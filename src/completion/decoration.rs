//! Decorations: which ranges of a block the renderer should mark
//!
//! Two kinds of highlight:
//! - committed entities whose type belongs to a registered spec
//! - the active match span `[trigger_offset, caret_offset)` (completion anchor)

use serde::{Deserialize, Serialize};

use super::document::{BlockKey, DocumentModel, EntityKey};
use super::registry::SpecRegistry;
use super::scanner::MatchProcess;

/// What a highlighted range is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entity_type", rename_all = "snake_case")]
pub enum HighlightTag {
    Entity(String),
    ActiveMatch,
}

/// A highlighted char range in one block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub start: usize,
    pub end: usize,
    pub tag: HighlightTag,
}

/// Highlight ranges for `block`, sorted by start offset
pub fn ranges_to_highlight<D: DocumentModel>(
    registry: &SpecRegistry,
    document: &D,
    block: &BlockKey,
    active: Option<&MatchProcess>,
) -> Vec<Highlight> {
    let mut highlights = entity_highlights(registry, document, block);

    if let Some(active) = active.filter(|m| &m.block_key == block) {
        highlights.push(Highlight {
            start: active.trigger_offset,
            end: active.caret_offset,
            tag: HighlightTag::ActiveMatch,
        });
    }

    highlights.sort_by_key(|h| h.start);
    highlights
}

fn entity_highlights<D: DocumentModel>(
    registry: &SpecRegistry,
    document: &D,
    block: &BlockKey,
) -> Vec<Highlight> {
    let len = document.block_len(block).unwrap_or(0);
    let mut runs: Vec<(usize, usize, EntityKey)> = Vec::new();

    for offset in 0..len {
        let Some(key) = document.entity_at(block, offset) else { continue };
        match runs.last_mut() {
            Some((_, end, last)) if *last == key && *end == offset => *end += 1,
            _ => runs.push((offset, offset + 1, key)),
        }
    }

    runs.into_iter()
        .filter_map(|(start, end, key)| {
            let entity_type = document.entity_type(key)?;
            registry.is_registered_entity_type(entity_type).then(|| Highlight {
                start,
                end,
                tag: HighlightTag::Entity(entity_type.to_string()),
            })
        })
        .collect()
}

//! ContentSnapshot: reference immutable document model
//!
//! Blocks of plain text with per-char entity annotations, an entity table and
//! a selection. Every mutation clones into a new snapshot; nothing is edited in
//! place. The serde form mirrors a raw editor state so the JS host can hand
//! snapshots across the WASM boundary:
//!
//! ```json
//! {
//!   "blocks": [{ "key": "b0", "text": "hi @Jacob Cole", "entity_ranges": [{ "offset": 3, "length": 11, "key": 0 }] }],
//!   "entities": [{ "key": 0, "entity_type": "mention", "mutability": "SEGMENTED" }],
//!   "selection": { "anchor_key": "b0", "anchor_offset": 14, "focus_key": "b0", "focus_offset": 14 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::ops::Range;

use super::document::{char_to_byte, BlockKey, DocumentModel, EntityKey, EntityMutability, Selection};
use super::error::SnapshotError;

// =============================================================================
// Types
// =============================================================================

/// A single paragraph: text plus one optional entity per char
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    key: BlockKey,
    text: String,
    entities: Vec<Option<EntityKey>>,
}

impl ContentBlock {
    pub fn new(key: BlockKey, text: &str) -> Self {
        Self {
            key,
            text: text.to_string(),
            entities: vec![None; text.chars().count()],
        }
    }

    pub fn key(&self) -> &BlockKey {
        &self.key
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entity_at(&self, offset: usize) -> Option<EntityKey> {
        self.entities.get(offset).copied().flatten()
    }

    /// Maximal runs of one entity key
    pub fn entity_ranges(&self) -> Vec<EntityRange> {
        let mut ranges: Vec<EntityRange> = Vec::new();
        for (offset, entity) in self.entities.iter().enumerate() {
            let Some(key) = *entity else { continue };
            match ranges.last_mut() {
                Some(last) if last.key == key && last.offset + last.length == offset => {
                    last.length += 1;
                }
                _ => ranges.push(EntityRange { offset, length: 1, key }),
            }
        }
        ranges
    }

    fn splice(&mut self, range: Range<usize>, text: &str, entity: Option<EntityKey>) -> usize {
        let start = range.start.min(self.len());
        let end = range.end.clamp(start, self.len());
        let (byte_start, byte_end) = (char_to_byte(&self.text, start), char_to_byte(&self.text, end));
        self.text.replace_range(byte_start..byte_end, text);

        let inserted = text.chars().count();
        self.entities
            .splice(start..end, std::iter::repeat(entity).take(inserted));
        start + inserted
    }
}

/// Entity annotation over `[offset, offset + length)` in chars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRange {
    pub offset: usize,
    pub length: usize,
    pub key: EntityKey,
}

/// An entity owned by the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityInstance {
    pub entity_type: String,
    #[serde(default)]
    pub mutability: EntityMutability,
}

/// Immutable document snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshot", into = "RawSnapshot")]
pub struct ContentSnapshot {
    blocks: Vec<ContentBlock>,
    entities: BTreeMap<EntityKey, EntityInstance>,
    selection: Selection,
    selection_after: Selection,
}

impl Default for ContentSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl ContentSnapshot {
    /// One empty block with the caret at its start
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// Blocks split on `\n` (keys `b0`, `b1`, ...), caret at the end of the last block
    pub fn from_text(text: &str) -> Self {
        let blocks: Vec<ContentBlock> = text
            .split('\n')
            .enumerate()
            .map(|(i, line)| ContentBlock::new(BlockKey(format!("b{i}")), line))
            .collect();
        let last = blocks.last().map(|b| (b.key.clone(), b.len()));
        let selection = match last {
            Some((key, len)) => Selection::caret(key, len),
            None => Selection::caret(BlockKey::new("b0"), 0),
        };
        Self {
            blocks,
            entities: BTreeMap::new(),
            selection_after: selection.clone(),
            selection,
        }
    }

    /// Same snapshot with the caret moved
    pub fn with_caret(&self, block: &BlockKey, offset: usize) -> Self {
        self.with_selection(Selection::caret(block.clone(), offset))
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn block(&self, key: &BlockKey) -> Option<&ContentBlock> {
        self.blocks.iter().find(|b| &b.key == key)
    }

    pub fn first_block_key(&self) -> Option<&BlockKey> {
        self.blocks.first().map(|b| &b.key)
    }

    pub fn entity(&self, key: EntityKey) -> Option<&EntityInstance> {
        self.entities.get(&key)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// All block texts joined with `\n`
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Create an entity and tag an existing range with it (text unchanged)
    pub fn tag_range(
        &self,
        block: &BlockKey,
        range: Range<usize>,
        entity_type: &str,
        mutability: EntityMutability,
    ) -> (Self, EntityKey) {
        let (mut next, key) = self.create_entity(entity_type, mutability);
        if let Some(b) = next.blocks.iter_mut().find(|b| &b.key == block) {
            let end = range.end.min(b.len());
            for slot in b.entities.iter_mut().take(end).skip(range.start) {
                *slot = Some(key);
            }
        }
        (next, key)
    }

    /// One past the greatest key; when `u32::MAX` is taken, the lowest free key.
    ///
    /// # Panics
    /// If every `u32` key is in use.
    fn next_entity_key(&self) -> EntityKey {
        let Some(last) = self.entities.keys().next_back() else {
            return EntityKey(0);
        };
        if let Some(next) = last.0.checked_add(1) {
            return EntityKey(next);
        }
        self.entities
            .keys()
            .zip(0..=u32::MAX)
            .find(|(key, expected)| key.0 != *expected)
            .map(|(_, free)| EntityKey(free))
            .unwrap_or_else(|| panic!("entity key space exhausted"))
    }
}

impl DocumentModel for ContentSnapshot {
    fn selection(&self) -> &Selection {
        &self.selection
    }

    fn block_text(&self, block: &BlockKey) -> Option<&str> {
        self.block(block).map(|b| b.text.as_str())
    }

    fn entity_at(&self, block: &BlockKey, offset: usize) -> Option<EntityKey> {
        self.block(block).and_then(|b| b.entity_at(offset))
    }

    fn entity_type(&self, entity: EntityKey) -> Option<&str> {
        self.entities.get(&entity).map(|e| e.entity_type.as_str())
    }

    fn create_entity(&self, entity_type: &str, mutability: EntityMutability) -> (Self, EntityKey) {
        let key = self.next_entity_key();
        let mut next = self.clone();
        next.entities.insert(
            key,
            EntityInstance {
                entity_type: entity_type.to_string(),
                mutability,
            },
        );
        (next, key)
    }

    fn replace_text(
        &self,
        block: &BlockKey,
        range: Range<usize>,
        text: &str,
        entity: Option<EntityKey>,
    ) -> Self {
        let mut next = self.clone();
        if let Some(b) = next.blocks.iter_mut().find(|b| &b.key == block) {
            let caret = b.splice(range, text, entity);
            next.selection_after = Selection::caret(block.clone(), caret);
        }
        next
    }

    fn selection_after(&self) -> &Selection {
        &self.selection_after
    }

    fn with_selection(&self, selection: Selection) -> Self {
        Self {
            selection,
            ..self.clone()
        }
    }

    fn block_len(&self, block: &BlockKey) -> Option<usize> {
        self.block(block).map(ContentBlock::len)
    }
}

// =============================================================================
// Serde form
// =============================================================================

#[derive(Serialize, Deserialize)]
struct RawBlock {
    key: BlockKey,
    text: String,
    #[serde(default)]
    entity_ranges: Vec<EntityRange>,
}

#[derive(Serialize, Deserialize)]
struct RawEntity {
    key: EntityKey,
    #[serde(flatten)]
    instance: EntityInstance,
}

#[derive(Serialize, Deserialize)]
struct RawSnapshot {
    blocks: Vec<RawBlock>,
    #[serde(default)]
    entities: Vec<RawEntity>,
    selection: Selection,
}

impl TryFrom<RawSnapshot> for ContentSnapshot {
    type Error = SnapshotError;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        let entities: BTreeMap<EntityKey, EntityInstance> = raw
            .entities
            .into_iter()
            .map(|e| (e.key, e.instance))
            .collect();

        let mut seen: HashSet<BlockKey> = HashSet::new();
        let mut blocks = Vec::with_capacity(raw.blocks.len());
        for raw_block in raw.blocks {
            if !seen.insert(raw_block.key.clone()) {
                return Err(SnapshotError::DuplicateBlock {
                    block: raw_block.key.0,
                });
            }
            let mut block = ContentBlock::new(raw_block.key, &raw_block.text);
            for range in raw_block.entity_ranges {
                let end = match range.offset.checked_add(range.length) {
                    Some(end) if end <= block.len() => end,
                    _ => {
                        return Err(SnapshotError::RangeOutOfBounds {
                            block: block.key.0.clone(),
                            offset: range.offset,
                            end: range.offset.saturating_add(range.length),
                            len: block.len(),
                        });
                    }
                };
                if !entities.contains_key(&range.key) {
                    return Err(SnapshotError::UnknownEntity {
                        block: block.key.0.clone(),
                        key: range.key.0,
                    });
                }
                for offset in range.offset..end {
                    if block.entities[offset].is_some() {
                        return Err(SnapshotError::OverlappingRanges {
                            block: block.key.0.clone(),
                            offset,
                        });
                    }
                    block.entities[offset] = Some(range.key);
                }
            }
            blocks.push(block);
        }

        let selection = raw.selection;
        for (key, offset) in [
            (&selection.anchor_key, selection.anchor_offset),
            (&selection.focus_key, selection.focus_offset),
        ] {
            let block = blocks
                .iter()
                .find(|b| &b.key == key)
                .ok_or_else(|| SnapshotError::UnknownBlock { block: key.0.clone() })?;
            if offset > block.len() {
                return Err(SnapshotError::SelectionOutOfBounds {
                    block: key.0.clone(),
                    offset,
                    len: block.len(),
                });
            }
        }

        Ok(Self {
            blocks,
            entities,
            selection_after: selection.clone(),
            selection,
        })
    }
}

impl From<ContentSnapshot> for RawSnapshot {
    fn from(snapshot: ContentSnapshot) -> Self {
        let blocks = snapshot
            .blocks
            .iter()
            .map(|b| RawBlock {
                key: b.key.clone(),
                text: b.text.clone(),
                entity_ranges: b.entity_ranges(),
            })
            .collect();
        let entities = snapshot
            .entities
            .into_iter()
            .map(|(key, instance)| RawEntity { key, instance })
            .collect();
        Self {
            blocks,
            entities,
            selection: snapshot.selection,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn b0() -> BlockKey {
        BlockKey::new("b0")
    }

    #[test]
    fn test_from_text_splits_blocks() {
        let doc = ContentSnapshot::from_text("first\nsecond line");
        assert_eq!(doc.blocks().len(), 2);
        assert_eq!(doc.block_text(&BlockKey::new("b1")), Some("second line"));
        assert_eq!(doc.selection(), &Selection::caret(BlockKey::new("b1"), 11));
        assert_eq!(doc.plain_text(), "first\nsecond line");
    }

    #[test]
    fn test_empty_document() {
        let doc = ContentSnapshot::empty();
        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(doc.block_len(&b0()), Some(0));
        assert_eq!(doc.selection(), &Selection::caret(b0(), 0));
    }

    #[test]
    fn test_replace_text_tags_and_moves_selection_after() {
        let doc = ContentSnapshot::from_text("hello @Jac");
        let (doc, key) = doc.create_entity("mention", EntityMutability::Segmented);
        let next = doc.replace_text(&b0(), 6..10, "@Jacob Cole", Some(key));

        assert_eq!(next.block_text(&b0()), Some("hello @Jacob Cole"));
        assert_eq!(next.selection_after(), &Selection::caret(b0(), 17));
        // selection itself untouched until the caller forces it
        assert_eq!(next.selection(), doc.selection());
        assert_eq!(next.entity_at(&b0(), 5), None);
        assert_eq!(next.entity_at(&b0(), 6), Some(key));
        assert_eq!(next.entity_at(&b0(), 16), Some(key));
        assert_eq!(next.entity_at(&b0(), 17), None);
        // original snapshot unchanged
        assert_eq!(doc.block_text(&b0()), Some("hello @Jac"));
    }

    #[test]
    fn test_replace_text_shifts_existing_annotations() {
        let doc = ContentSnapshot::from_text("ab cd");
        let (doc, key) = doc.tag_range(&b0(), 3..5, "hashtag", EntityMutability::Mutable);
        let next = doc.replace_text(&b0(), 0..2, "xyz", None);

        assert_eq!(next.block_text(&b0()), Some("xyz cd"));
        assert_eq!(next.entity_at(&b0(), 3), None);
        assert_eq!(next.entity_at(&b0(), 4), Some(key));
        assert_eq!(next.entity_at(&b0(), 5), Some(key));
    }

    #[test]
    fn test_replace_text_unknown_block_is_noop() {
        let doc = ContentSnapshot::from_text("abc");
        let next = doc.replace_text(&BlockKey::new("nope"), 0..1, "x", None);
        assert_eq!(next, doc);
    }

    #[test]
    fn test_entity_keys_increment() {
        let doc = ContentSnapshot::empty();
        let (doc, k0) = doc.create_entity("mention", EntityMutability::Mutable);
        let (doc, k1) = doc.create_entity("hashtag", EntityMutability::Mutable);
        assert_eq!(k0, EntityKey(0));
        assert_eq!(k1, EntityKey(1));
        assert_eq!(doc.entity_type(k1), Some("hashtag"));
        assert_eq!(doc.entity_count(), 2);
    }

    #[test]
    fn test_entity_ranges_are_maximal_runs() {
        let doc = ContentSnapshot::from_text("#a #b plain");
        let (doc, k0) = doc.tag_range(&b0(), 0..2, "hashtag", EntityMutability::Mutable);
        let (doc, k1) = doc.tag_range(&b0(), 3..5, "hashtag", EntityMutability::Mutable);

        let ranges = doc.block(&b0()).unwrap().entity_ranges();
        assert_eq!(
            ranges,
            vec![
                EntityRange { offset: 0, length: 2, key: k0 },
                EntityRange { offset: 3, length: 2, key: k1 },
            ]
        );
    }

    #[test]
    fn test_serde_round_trip_keeps_annotations() {
        let doc = ContentSnapshot::from_text("hi @Jacob Cole");
        let (doc, key) = doc.tag_range(&b0(), 3..14, "mention", EntityMutability::Segmented);

        let json = serde_json::to_string(&doc).unwrap();
        let parsed: ContentSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.entity_at(&b0(), 3), Some(key));
        assert_eq!(parsed.entity(key).unwrap().mutability, EntityMutability::Segmented);
        assert_eq!(parsed.selection(), doc.selection());
    }

    #[test]
    fn test_deserialize_rejects_out_of_bounds_range() {
        let json = r#"{
            "blocks": [{"key": "b0", "text": "abc", "entity_ranges": [{"offset": 2, "length": 5, "key": 0}]}],
            "entities": [{"key": 0, "entity_type": "mention"}],
            "selection": {"anchor_key": "b0", "anchor_offset": 0, "focus_key": "b0", "focus_offset": 0}
        }"#;
        let err = serde_json::from_str::<ContentSnapshot>(json).unwrap_err();
        assert!(err.to_string().contains("out of bounds"));
    }

    #[test]
    fn test_deserialize_rejects_unknown_entity() {
        let json = r#"{
            "blocks": [{"key": "b0", "text": "abc", "entity_ranges": [{"offset": 0, "length": 1, "key": 7}]}],
            "selection": {"anchor_key": "b0", "anchor_offset": 0, "focus_key": "b0", "focus_offset": 0}
        }"#;
        let err = serde_json::from_str::<ContentSnapshot>(json).unwrap_err();
        assert!(err.to_string().contains("Unknown entity key 7"));
    }

    #[test]
    fn test_deserialize_rejects_unknown_selection_block() {
        let json = r#"{
            "blocks": [{"key": "b0", "text": "abc"}],
            "selection": {"anchor_key": "b9", "anchor_offset": 0, "focus_key": "b9", "focus_offset": 0}
        }"#;
        let err = serde_json::from_str::<ContentSnapshot>(json).unwrap_err();
        assert!(err.to_string().contains("unknown block 'b9'"));
    }

    #[test]
    fn test_deserialize_rejects_overlapping_ranges() {
        let json = r#"{
            "blocks": [{"key": "b0", "text": "abcdef", "entity_ranges": [
                {"offset": 0, "length": 3, "key": 0},
                {"offset": 2, "length": 2, "key": 1}
            ]}],
            "entities": [{"key": 0, "entity_type": "a"}, {"key": 1, "entity_type": "b"}],
            "selection": {"anchor_key": "b0", "anchor_offset": 0, "focus_key": "b0", "focus_offset": 0}
        }"#;
        let err = serde_json::from_str::<ContentSnapshot>(json).unwrap_err();
        assert!(err.to_string().contains("overlap"));
    }

    #[test]
    fn test_deserialize_rejects_overflowing_range() {
        let json = r#"{
            "blocks": [{"key": "b0", "text": "abc", "entity_ranges": [{"offset": 18446744073709551615, "length": 1, "key": 0}]}],
            "entities": [{"key": 0, "entity_type": "mention"}],
            "selection": {"anchor_key": "b0", "anchor_offset": 0, "focus_key": "b0", "focus_offset": 0}
        }"#;
        let err = serde_json::from_str::<ContentSnapshot>(json).unwrap_err();
        assert!(err.to_string().contains("out of bounds"));
    }

    #[test]
    fn test_deserialize_rejects_duplicate_block() {
        let json = r#"{
            "blocks": [{"key": "b0", "text": "abc"}, {"key": "b0", "text": "def"}],
            "selection": {"anchor_key": "b0", "anchor_offset": 0, "focus_key": "b0", "focus_offset": 0}
        }"#;
        let err = serde_json::from_str::<ContentSnapshot>(json).unwrap_err();
        assert!(err.to_string().contains("Duplicate block key 'b0'"));
    }

    #[test]
    fn test_deserialize_rejects_selection_past_block_end() {
        let json = r#"{
            "blocks": [{"key": "b0", "text": "abc"}],
            "selection": {"anchor_key": "b0", "anchor_offset": 2, "focus_key": "b0", "focus_offset": 9}
        }"#;
        let err = serde_json::from_str::<ContentSnapshot>(json).unwrap_err();
        assert!(err.to_string().contains("Selection offset 9 is out of bounds"));
    }

    // -------------------------------------------------------------------------
    // Entity keys stay fresh when the host already uses the top of the key space
    // -------------------------------------------------------------------------
    #[test]
    fn test_create_entity_after_max_key_reuses_gap() {
        let json = r#"{
            "blocks": [{"key": "b0", "text": "@a #b", "entity_ranges": [
                {"offset": 0, "length": 2, "key": 0},
                {"offset": 3, "length": 2, "key": 4294967295}
            ]}],
            "entities": [
                {"key": 0, "entity_type": "mention"},
                {"key": 4294967295, "entity_type": "hashtag"}
            ],
            "selection": {"anchor_key": "b0", "anchor_offset": 5, "focus_key": "b0", "focus_offset": 5}
        }"#;
        let doc: ContentSnapshot = serde_json::from_str(json).unwrap();

        let (next, key) = doc.create_entity("relation", EntityMutability::Immutable);
        assert_eq!(key, EntityKey(1));
        assert_eq!(next.entity_count(), 3);
        assert_eq!(next.entity_type(EntityKey(0)), Some("mention"));
        assert_eq!(next.entity_type(EntityKey(u32::MAX)), Some("hashtag"));
        assert_eq!(next.entity_type(key), Some("relation"));
    }
}

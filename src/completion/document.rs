//! DocumentModel: the editor document as seen by the completion engine
//!
//! The engine never owns text storage. It reads a block's text and entity
//! annotations, asks for new entities, and requests range replacements. Every
//! operation that changes something returns a NEW document value; `&self` is
//! treated as an immutable snapshot for the duration of one event.
//!
//! Offsets are Unicode scalar (char) offsets into the block text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

// =============================================================================
// Keys
// =============================================================================

/// Identifier of a text block (paragraph) in the document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockKey(pub String);

impl BlockKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque handle to an entity owned by the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(pub u32);

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Edit policy of a committed entity span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityMutability {
    /// Text can be edited in place and stays tagged
    #[default]
    Mutable,
    /// Any edit removes the entity as a whole
    Immutable,
    /// Edits split the span into independently removable segments
    Segmented,
}

impl EntityMutability {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityMutability::Mutable => "MUTABLE",
            EntityMutability::Immutable => "IMMUTABLE",
            EntityMutability::Segmented => "SEGMENTED",
        }
    }
}

// =============================================================================
// Selection
// =============================================================================

/// Anchor/focus selection, possibly spanning blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor_key: BlockKey,
    pub anchor_offset: usize,
    pub focus_key: BlockKey,
    pub focus_offset: usize,
}

impl Selection {
    /// Collapsed selection (a caret) inside `block`
    pub fn caret(block: BlockKey, offset: usize) -> Self {
        Self {
            anchor_key: block.clone(),
            anchor_offset: offset,
            focus_key: block,
            focus_offset: offset,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor_key == self.focus_key && self.anchor_offset == self.focus_offset
    }

    /// Block and offset of the caret, if the selection is collapsed
    pub fn caret_position(&self) -> Option<(&BlockKey, usize)> {
        if self.is_collapsed() {
            Some((&self.anchor_key, self.anchor_offset))
        } else {
            None
        }
    }
}

// =============================================================================
// DocumentModel
// =============================================================================

/// Operations the completion engine consumes from the host document.
pub trait DocumentModel: Clone {
    /// Current selection
    fn selection(&self) -> &Selection;

    /// Plain text of a block, `None` if the block does not exist
    fn block_text(&self, block: &BlockKey) -> Option<&str>;

    /// Entity annotating the char at `offset`, if any
    fn entity_at(&self, block: &BlockKey, offset: usize) -> Option<EntityKey>;

    /// Type tag of an existing entity
    fn entity_type(&self, entity: EntityKey) -> Option<&str>;

    /// Create a new entity, returning the document that contains it and its handle
    fn create_entity(&self, entity_type: &str, mutability: EntityMutability) -> (Self, EntityKey);

    /// Replace `range` of `block` with `text`, tagging the inserted chars with
    /// `entity`. The returned document's `selection_after` is a caret right
    /// after the inserted text; its `selection` is unchanged.
    fn replace_text(
        &self,
        block: &BlockKey,
        range: Range<usize>,
        text: &str,
        entity: Option<EntityKey>,
    ) -> Self;

    /// Selection the last mutation left behind
    fn selection_after(&self) -> &Selection;

    /// Same document with a different selection
    fn with_selection(&self, selection: Selection) -> Self;

    /// Number of chars in a block
    fn block_len(&self, block: &BlockKey) -> Option<usize> {
        self.block_text(block).map(|text| text.chars().count())
    }
}

// =============================================================================
// Char offsets
// =============================================================================

/// Byte index of the char at `offset`, clamped to the end of `text`
pub fn char_to_byte(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Slice `text` by char offsets, clamping out-of-range bounds
pub fn char_slice(text: &str, range: Range<usize>) -> &str {
    let start = char_to_byte(text, range.start);
    let end = char_to_byte(text, range.end.max(range.start));
    &text[start..end]
}

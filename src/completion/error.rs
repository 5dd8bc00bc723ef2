//! Error types for completion configuration and document snapshots.
//!
//! Runtime no-ops (nothing to commit, navigation while idle) are not errors and
//! never show up here. Only setup-time problems do.

use thiserror::Error;

/// Rejected completion configuration. Fatal at setup, never raised mid-session.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Trigger must not be empty")]
    EmptyTrigger,

    #[error("Trigger '{trigger}' is registered more than once")]
    DuplicateTrigger { trigger: String },

    /// One trigger is a prefix of another, so both could open a match at the same offset.
    #[error("Trigger '{shorter}' overlaps trigger '{longer}'")]
    OverlappingTriggers { shorter: String, longer: String },

    #[error("Entity type '{entity_type}' is registered more than once")]
    DuplicateEntityType { entity_type: String },

    #[error("Invalid pattern '{pattern}' for trigger '{trigger}': {source}")]
    InvalidPattern {
        trigger: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(String),
}

/// Malformed document snapshot handed in by the host editor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("Entity range {offset}..{end} is out of bounds for block '{block}' (length {len})")]
    RangeOutOfBounds {
        block: String,
        offset: usize,
        end: usize,
        len: usize,
    },

    #[error("Entity ranges overlap in block '{block}' at offset {offset}")]
    OverlappingRanges { block: String, offset: usize },

    #[error("Unknown entity key {key} in block '{block}'")]
    UnknownEntity { block: String, key: u32 },

    #[error("Selection refers to unknown block '{block}'")]
    UnknownBlock { block: String },

    #[error("Duplicate block key '{block}'")]
    DuplicateBlock { block: String },

    #[error("Selection offset {offset} is out of bounds for block '{block}' (length {len})")]
    SelectionOutOfBounds {
        block: String,
        offset: usize,
        len: usize,
    },
}

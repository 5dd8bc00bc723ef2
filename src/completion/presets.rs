//! Demo completion specs: mentions, hashtags, relations
//!
//! - `@` mention: SEGMENTED entities, any match string
//! - `#` hashtag: MUTABLE entities, no whitespace in the tag, a space commits
//!   the literal tag
//! - `<>` relation: IMMUTABLE entities

use super::error::ConfigError;
use super::registry::SpecRegistry;
use super::spec::{parse_specs_json, CompletionSpec};

pub const DEMO_SPECS_JSON: &str = r##"[
    {
        "name": "mention",
        "trigger": "@",
        "items": [
            {"text": "Albert Slawinski"},
            {"text": "Jacob Cole"},
            {"text": "Jacov Kolantarov"}
        ],
        "entity_type": "mention",
        "entity_mutability": "SEGMENTED",
        "keep_trigger": true
    },
    {
        "name": "hashtag",
        "trigger": "#",
        "match_string_allowed": "^[^\\s]*$",
        "items": [
            {"text": "idea"},
            {"text": "ideal"},
            {"text": "DeleteUber"},
            {"text": "BlackLivesMatter"},
            {"text": "JeSuisParis"},
            {"text": "Brexit"},
            {"text": "Calexit"}
        ],
        "entity_type": "hashtag",
        "entity_mutability": "MUTABLE",
        "keep_trigger": true,
        "space_commit": "last_candidate"
    },
    {
        "name": "relation",
        "trigger": "<>",
        "items": [
            {"text": "design is about how things work"},
            {"text": "food is great"},
            {"text": "food/group cooking coordination app for dorms"},
            {"text": "foodslists.tk -- Google doc of foods people eat"}
        ],
        "entity_type": "relation",
        "entity_mutability": "IMMUTABLE",
        "keep_trigger": true
    }
]"##;

pub fn demo_specs() -> Result<Vec<CompletionSpec>, ConfigError> {
    parse_specs_json(DEMO_SPECS_JSON)
}

/// Registry holding the demo specs
pub fn demo_registry() -> Result<SpecRegistry, ConfigError> {
    SpecRegistry::from_json(DEMO_SPECS_JSON)
}

//! Completion configuration: TriggerSpec and CompletionSpec
//!
//! A `TriggerSpec` says WHERE a completion may open: the trigger string, what
//! may precede it, and what the typed match string may look like. A
//! `CompletionSpec` adds WHAT gets committed: the candidate list and the entity
//! the committed text is tagged with.
//!
//! Both are built once at setup (usually from JSON via `CompletionSpecConfig`)
//! and never mutated afterwards.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::document::EntityMutability;
use super::error::ConfigError;

// =============================================================================
// TriggerSpec
// =============================================================================

/// Trigger must start a "word": nothing before it, or whitespace right before it.
pub const DEFAULT_BEFORE_TRIGGER_ALLOWED: &str = r"(^|.*\s)$";

/// Any match string is allowed.
pub const DEFAULT_MATCH_STRING_ALLOWED: &str = r".*";

/// Where a completion may open
#[derive(Debug, Clone)]
pub struct TriggerSpec {
    trigger: String,
    before_trigger_allowed: Regex,
    match_string_allowed: Regex,
}

impl TriggerSpec {
    /// Compile a trigger spec from pattern sources
    pub fn new(
        trigger: &str,
        before_trigger_allowed: &str,
        match_string_allowed: &str,
    ) -> Result<Self, ConfigError> {
        if trigger.is_empty() {
            return Err(ConfigError::EmptyTrigger);
        }
        Ok(Self {
            trigger: trigger.to_string(),
            before_trigger_allowed: compile(trigger, before_trigger_allowed)?,
            match_string_allowed: compile(trigger, match_string_allowed)?,
        })
    }

    /// Trigger spec with the default before/match patterns
    pub fn with_default_patterns(trigger: &str) -> Result<Self, ConfigError> {
        Self::new(trigger, DEFAULT_BEFORE_TRIGGER_ALLOWED, DEFAULT_MATCH_STRING_ALLOWED)
    }

    /// Replace the match-string pattern
    pub fn with_match_string_allowed(self, pattern: &str) -> Result<Self, ConfigError> {
        let match_string_allowed = compile(&self.trigger, pattern)?;
        Ok(Self { match_string_allowed, ..self })
    }

    /// Replace the before-trigger pattern
    pub fn with_before_trigger_allowed(self, pattern: &str) -> Result<Self, ConfigError> {
        let before_trigger_allowed = compile(&self.trigger, pattern)?;
        Ok(Self { before_trigger_allowed, ..self })
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// Length of the trigger in chars
    pub fn trigger_len(&self) -> usize {
        self.trigger.chars().count()
    }

    /// Does the text before a trigger occurrence allow a match?
    /// Unanchored search, so a pattern matching anywhere counts.
    pub fn allows_before(&self, before_trigger: &str) -> bool {
        self.before_trigger_allowed.is_match(before_trigger)
    }

    /// Does the typed match string allow a match?
    pub fn allows_match_string(&self, match_string: &str) -> bool {
        self.match_string_allowed.is_match(match_string)
    }

    pub fn before_trigger_pattern(&self) -> &str {
        self.before_trigger_allowed.as_str()
    }

    pub fn match_string_pattern(&self) -> &str {
        self.match_string_allowed.as_str()
    }
}

fn compile(trigger: &str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        trigger: trigger.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}

// =============================================================================
// CompletionSpec
// =============================================================================

/// One entry in a completion list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionItem {
    pub text: String,
}

impl CompletionItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Whether typing a space right after a valid match commits it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceCommit {
    /// Space is plain text
    #[default]
    Off,
    /// Commit the last candidate (the literal match string)
    LastCandidate,
    /// Commit whatever candidate is highlighted
    Highlighted,
}

/// One logical completion kind (mention, hashtag, relation, ...)
#[derive(Debug, Clone)]
pub struct CompletionSpec {
    /// Registry key, e.g. "mention"
    pub name: String,
    pub trigger_spec: TriggerSpec,
    pub items: Vec<CompletionItem>,
    pub entity_type: String,
    pub entity_mutability: EntityMutability,
    /// Re-prefix the committed text with the trigger
    pub keep_trigger: bool,
    pub space_commit: SpaceCommit,
}

impl CompletionSpec {
    /// Spec with no candidates, MUTABLE entities, trigger kept, no space commit
    pub fn new(name: &str, trigger_spec: TriggerSpec, entity_type: &str) -> Self {
        Self {
            name: name.to_string(),
            trigger_spec,
            items: Vec::new(),
            entity_type: entity_type.to_string(),
            entity_mutability: EntityMutability::default(),
            keep_trigger: true,
            space_commit: SpaceCommit::default(),
        }
    }

    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(CompletionItem::new).collect();
        self
    }

    pub fn with_mutability(mut self, mutability: EntityMutability) -> Self {
        self.entity_mutability = mutability;
        self
    }

    pub fn with_keep_trigger(mut self, keep_trigger: bool) -> Self {
        self.keep_trigger = keep_trigger;
        self
    }

    pub fn with_space_commit(mut self, space_commit: SpaceCommit) -> Self {
        self.space_commit = space_commit;
        self
    }

    pub fn trigger(&self) -> &str {
        self.trigger_spec.trigger()
    }

    /// Text that replaces the match when `candidate` is committed
    pub fn replacement_text(&self, candidate: &str) -> String {
        if self.keep_trigger {
            format!("{}{}", self.trigger(), candidate)
        } else {
            candidate.to_string()
        }
    }
}

// =============================================================================
// Serde configuration
// =============================================================================

/// Serialized form of a CompletionSpec, as handed over by the host
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CompletionSpecConfig {
    pub name: String,
    pub trigger: String,
    #[serde(default = "default_before_trigger_allowed")]
    pub before_trigger_allowed: String,
    #[serde(default = "default_match_string_allowed")]
    pub match_string_allowed: String,
    #[serde(default)]
    pub items: Vec<CompletionItem>,
    pub entity_type: String,
    #[serde(default)]
    pub entity_mutability: EntityMutability,
    #[serde(default = "default_true")]
    pub keep_trigger: bool,
    #[serde(default)]
    pub space_commit: SpaceCommit,
}

fn default_before_trigger_allowed() -> String { DEFAULT_BEFORE_TRIGGER_ALLOWED.to_string() }
fn default_match_string_allowed() -> String { DEFAULT_MATCH_STRING_ALLOWED.to_string() }
fn default_true() -> bool { true }

impl TryFrom<CompletionSpecConfig> for CompletionSpec {
    type Error = ConfigError;

    fn try_from(config: CompletionSpecConfig) -> Result<Self, Self::Error> {
        let trigger_spec = TriggerSpec::new(
            &config.trigger,
            &config.before_trigger_allowed,
            &config.match_string_allowed,
        )?;
        Ok(Self {
            name: config.name,
            trigger_spec,
            items: config.items,
            entity_type: config.entity_type,
            entity_mutability: config.entity_mutability,
            keep_trigger: config.keep_trigger,
            space_commit: config.space_commit,
        })
    }
}

impl From<&CompletionSpec> for CompletionSpecConfig {
    fn from(spec: &CompletionSpec) -> Self {
        Self {
            name: spec.name.clone(),
            trigger: spec.trigger().to_string(),
            before_trigger_allowed: spec.trigger_spec.before_trigger_pattern().to_string(),
            match_string_allowed: spec.trigger_spec.match_string_pattern().to_string(),
            items: spec.items.clone(),
            entity_type: spec.entity_type.clone(),
            entity_mutability: spec.entity_mutability,
            keep_trigger: spec.keep_trigger,
            space_commit: spec.space_commit,
        }
    }
}

/// Parse a JSON array of spec configs and compile them
pub fn parse_specs_json(json: &str) -> Result<Vec<CompletionSpec>, ConfigError> {
    let configs: Vec<CompletionSpecConfig> =
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
    configs.into_iter().map(CompletionSpec::try_from).collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Default before-trigger pattern: trigger must start a word
    // -------------------------------------------------------------------------
    #[test]
    fn test_default_before_trigger() {
        let spec = TriggerSpec::with_default_patterns("@").unwrap();
        assert!(spec.allows_before(""));
        assert!(spec.allows_before("hello "));
        assert!(spec.allows_before("tab\t"));
        assert!(!spec.allows_before("hello"));
        assert!(!spec.allows_before("mail"));
    }

    #[test]
    fn test_default_match_string_allows_anything() {
        let spec = TriggerSpec::with_default_patterns("@").unwrap();
        assert!(spec.allows_match_string(""));
        assert!(spec.allows_match_string("Jacob Cole"));
    }

    #[test]
    fn test_custom_match_string_pattern() {
        let spec = TriggerSpec::with_default_patterns("#")
            .unwrap()
            .with_match_string_allowed(r"^[^\s]*$")
            .unwrap();
        assert!(spec.allows_match_string("idea"));
        assert!(spec.allows_match_string(""));
        assert!(!spec.allows_match_string("two words"));
        assert_eq!(spec.match_string_pattern(), r"^[^\s]*$");
    }

    #[test]
    fn test_empty_trigger_rejected() {
        let err = TriggerSpec::with_default_patterns("").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyTrigger));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = TriggerSpec::new("@", "(", ".*").unwrap_err();
        match err {
            ConfigError::InvalidPattern { trigger, pattern, .. } => {
                assert_eq!(trigger, "@");
                assert_eq!(pattern, "(");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_trigger_len_counts_chars() {
        assert_eq!(TriggerSpec::with_default_patterns("<>").unwrap().trigger_len(), 2);
        assert_eq!(TriggerSpec::with_default_patterns("§").unwrap().trigger_len(), 1);
    }

    #[test]
    fn test_replacement_text_keep_trigger() {
        let spec = CompletionSpec::new(
            "mention",
            TriggerSpec::with_default_patterns("@").unwrap(),
            "mention",
        );
        assert_eq!(spec.replacement_text("Jacob Cole"), "@Jacob Cole");

        let spec = spec.with_keep_trigger(false);
        assert_eq!(spec.replacement_text("Jacob Cole"), "Jacob Cole");
    }

    #[test]
    fn test_config_defaults() {
        let json = r#"{"name": "mention", "trigger": "@", "entity_type": "mention"}"#;
        let config: CompletionSpecConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.before_trigger_allowed, DEFAULT_BEFORE_TRIGGER_ALLOWED);
        assert_eq!(config.match_string_allowed, DEFAULT_MATCH_STRING_ALLOWED);
        assert!(config.items.is_empty());
        assert!(config.keep_trigger);
        assert_eq!(config.entity_mutability, EntityMutability::Mutable);
        assert_eq!(config.space_commit, SpaceCommit::Off);
    }

    #[test]
    fn test_parse_specs_json() {
        let json = r##"[
            {
                "name": "hashtag",
                "trigger": "#",
                "match_string_allowed": "^[^\\s]*$",
                "items": [{"text": "idea"}, {"text": "ideal"}],
                "entity_type": "hashtag",
                "entity_mutability": "MUTABLE",
                "space_commit": "last_candidate"
            }
        ]"##;
        let specs = parse_specs_json(json).unwrap();

        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].trigger(), "#");
        assert_eq!(specs[0].items.len(), 2);
        assert_eq!(specs[0].space_commit, SpaceCommit::LastCandidate);
        assert!(!specs[0].trigger_spec.allows_match_string("a b"));
    }

    #[test]
    fn test_parse_specs_json_malformed() {
        let err = parse_specs_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_config_from_spec_preserves_patterns() {
        let spec = CompletionSpec::new(
            "relation",
            TriggerSpec::with_default_patterns("<>").unwrap(),
            "relation",
        )
        .with_mutability(EntityMutability::Immutable);
        let config = CompletionSpecConfig::from(&spec);

        assert_eq!(config.trigger, "<>");
        assert_eq!(config.before_trigger_allowed, DEFAULT_BEFORE_TRIGGER_ALLOWED);
        assert_eq!(config.entity_mutability, EntityMutability::Immutable);
    }
}

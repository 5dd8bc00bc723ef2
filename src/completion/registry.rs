//! SpecRegistry: the validated set of completion specs for a session
//!
//! Validation happens once, up front:
//! 1. Triggers are unique
//! 2. No trigger is a prefix of another (two triggers can never open a match at
//!    the same offset, so the innermost-match rule is always well defined)
//! 3. Entity types are unique (decorations can tell committed kinds apart)

use std::collections::HashSet;

use tracing::warn;

use super::error::ConfigError;
use super::spec::{parse_specs_json, CompletionSpec, TriggerSpec};

/// Frozen, validated collection of completion specs in registration order
#[derive(Debug, Clone, Default)]
pub struct SpecRegistry {
    specs: Vec<CompletionSpec>,
}

impl SpecRegistry {
    /// Validate and freeze a set of specs
    pub fn new(specs: Vec<CompletionSpec>) -> Result<Self, ConfigError> {
        if let Err(err) = validate(&specs) {
            warn!(error = %err, "rejected completion specs");
            return Err(err);
        }
        Ok(Self { specs })
    }

    /// Parse, compile and validate a JSON array of spec configs
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::new(parse_specs_json(json)?)
    }

    /// Spec registered for a trigger string
    pub fn by_trigger(&self, trigger: &str) -> Option<&CompletionSpec> {
        self.specs.iter().find(|spec| spec.trigger() == trigger)
    }

    /// Spec registered under a name
    pub fn by_name(&self, name: &str) -> Option<&CompletionSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    /// Spec whose committed entities carry `entity_type`
    pub fn by_entity_type(&self, entity_type: &str) -> Option<&CompletionSpec> {
        self.specs.iter().find(|spec| spec.entity_type == entity_type)
    }

    pub fn trigger_specs(&self) -> impl Iterator<Item = &TriggerSpec> {
        self.specs.iter().map(|spec| &spec.trigger_spec)
    }

    pub fn entity_types(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|spec| spec.entity_type.as_str())
    }

    pub fn is_registered_entity_type(&self, entity_type: &str) -> bool {
        self.by_entity_type(entity_type).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompletionSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

fn validate(specs: &[CompletionSpec]) -> Result<(), ConfigError> {
    let mut triggers: HashSet<&str> = HashSet::new();
    let mut entity_types: HashSet<&str> = HashSet::new();

    for spec in specs {
        if !triggers.insert(spec.trigger()) {
            return Err(ConfigError::DuplicateTrigger {
                trigger: spec.trigger().to_string(),
            });
        }
        if !entity_types.insert(spec.entity_type.as_str()) {
            return Err(ConfigError::DuplicateEntityType {
                entity_type: spec.entity_type.clone(),
            });
        }
    }

    for a in specs {
        for b in specs {
            let (shorter, longer) = (a.trigger(), b.trigger());
            if shorter.len() < longer.len() && longer.starts_with(shorter) {
                return Err(ConfigError::OverlappingTriggers {
                    shorter: shorter.to_string(),
                    longer: longer.to_string(),
                });
            }
        }
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

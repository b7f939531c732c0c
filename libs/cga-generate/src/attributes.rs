//! # Attribute Resolution
//!
//! Converts host attribute mappings into engine attributes and routes the
//! reserved keys (`ruleFile`, `startRule`, `seed`, `shapeName`) to shape
//! construction.

use cga_engine::{AttributeMap, AttributeValue};
use config::constants::{
    GenerationDefaults, ATTR_RULE_FILE, ATTR_SEED, ATTR_SHAPE_NAME, ATTR_START_RULE,
};
use serde_json::Value;
use tracing::warn;

use crate::error::{GenerationError, GenerationResult};

/// Per-shape attribute overrides as supplied by the host.
pub type AttributeOverrides = serde_json::Map<String, Value>;

/// Rule setup of one shape after applying its overrides to the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAttributes {
    pub rule_file: String,
    pub start_rule: String,
    pub seed: i32,
    pub shape_name: String,
    /// Everything that is not a reserved key of the expected kind.
    pub attributes: AttributeMap,
}

/// Applies attribute overrides on top of a set of defaults.
///
/// ## Example
///
/// ```rust
/// use cga_generate::AttributeResolver;
/// use config::constants::GenerationDefaults;
/// use serde_json::json;
///
/// let defaults = GenerationDefaults::default();
/// let overrides = json!({ "seed": 42, "height": 12.5 });
/// let resolved = AttributeResolver::new(&defaults).resolve(overrides.as_object().unwrap());
///
/// assert_eq!(resolved.seed, 42);
/// assert_eq!(resolved.start_rule, "default$init");
/// assert!(resolved.attributes.contains_key("height"));
/// assert!(!resolved.attributes.contains_key("seed"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AttributeResolver<'a> {
    defaults: &'a GenerationDefaults,
}

impl<'a> AttributeResolver<'a> {
    pub fn new(defaults: &'a GenerationDefaults) -> Self {
        Self { defaults }
    }

    /// Resolves `overrides` in a single scan. Values of unsupported kinds are
    /// dropped.
    pub fn resolve(&self, overrides: &AttributeOverrides) -> ResolvedAttributes {
        let mut resolved = ResolvedAttributes {
            rule_file: self.defaults.rule_file.clone(),
            start_rule: self.defaults.start_rule.clone(),
            seed: self.defaults.seed,
            shape_name: self.defaults.shape_name.clone(),
            attributes: AttributeMap::new(),
        };

        for (key, raw) in overrides {
            let Some(value) = to_attribute_value(raw) else {
                continue;
            };
            match (key.as_str(), value) {
                (ATTR_RULE_FILE, AttributeValue::String(s)) => resolved.rule_file = s,
                (ATTR_START_RULE, AttributeValue::String(s)) => resolved.start_rule = s,
                (ATTR_SEED, AttributeValue::Int(i)) => resolved.seed = i,
                (ATTR_SHAPE_NAME, AttributeValue::String(s)) => resolved.shape_name = s,
                (_, value) => {
                    resolved.attributes.insert(key.clone(), value);
                }
            }
        }
        resolved
    }
}

/// Converts one host value into an engine attribute.
///
/// Integers outside the engine's 32-bit range become floats. Null, arrays
/// and objects are unsupported and yield `None`.
pub fn to_attribute_value(value: &Value) -> Option<AttributeValue> {
    match value {
        Value::Bool(b) => Some(AttributeValue::Bool(*b)),
        Value::String(s) => Some(AttributeValue::String(s.clone())),
        Value::Number(n) => match n.as_i64().map(i32::try_from) {
            Some(Ok(i)) => Some(AttributeValue::Int(i)),
            _ => n.as_f64().map(AttributeValue::Float),
        },
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Converts a whole host mapping, dropping unsupported values.
pub fn to_attribute_map(values: &serde_json::Map<String, Value>) -> AttributeMap {
    values
        .iter()
        .filter_map(|(key, value)| to_attribute_value(value).map(|v| (key.clone(), v)))
        .collect()
}

/// Checks the number of attribute sets against the number of shapes.
///
/// Exactly one set applies to every shape; otherwise there must be at least
/// one set per shape. Extra sets are ignored with a warning.
pub fn check_override_count(supplied: usize, shapes: usize) -> GenerationResult<()> {
    if supplied != 1 && supplied < shapes {
        return Err(GenerationError::InsufficientOverrides { supplied, shapes });
    }
    if supplied > shapes {
        warn!(
            supplied,
            shapes, "more shape attribute sets than initial shapes, extra sets are ignored"
        );
    }
    Ok(())
}

/// Attribute set that applies to shape `index`: its own when present,
/// otherwise the first (shared) one.
pub fn overrides_for(sets: &[AttributeOverrides], index: usize) -> Option<&AttributeOverrides> {
    sets.get(index).or_else(|| sets.first())
}

// =============================================================================
// TESTS
// =============================================================================

//! Rule table model
//!
//! A rule table maps class names to opaque CSS property lists. It is produced
//! by [`compile`] from a `styles.toml`, serialized by [`binary`], reloaded at
//! the start of every generation cycle and never mutated afterwards.
//!
//! - **binary**: checksummed on-disk format
//! - **compile**: TOML rule source to [`RuleTable`]
//! - **matcher**: class token to emittable rule

pub mod binary;
pub mod compile;
pub mod matcher;

pub use matcher::{match_class, RuleMatch};

use serde::{Deserialize, Serialize};

/// One `key: value;` declaration, copied verbatim into the stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: String,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Exact class name to property list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticRule {
    pub name: String,
    pub properties: Vec<Property>,
}

/// One variant of a [`DynamicRule`]. An empty `name` matches the bare prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicProperty {
    pub name: String,
    pub properties: Vec<Property>,
}

/// Matches `prefix` or `prefix-variant` tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicRule {
    pub prefix: String,
    pub variants: Vec<DynamicProperty>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTable {
    pub static_rules: Vec<StaticRule>,
    pub dynamic_rules: Vec<DynamicRule>,
}

impl RuleTable {
    pub fn is_empty(&self) -> bool {
        self.static_rules.is_empty() && self.dynamic_rules.is_empty()
    }

    pub fn rule_count(&self) -> usize {
        self.static_rules.len() + self.dynamic_rules.len()
    }
}

//! `styles.toml` → [`RuleTable`]
//!
//! ```toml
//! [static_rules.flex]
//! display = "flex"
//!
//! [dynamic_rules.padding]
//! prefix = "p"
//! properties.4 = { padding = "1rem" }
//! properties.8 = { padding = "2rem" }
//! ```
//!
//! Declarations keep their authored order. Static rules are sorted by name
//! and dynamic rules by prefix so the emitted table is stable regardless of
//! how the source file is arranged.

use super::{DynamicProperty, DynamicRule, Property, RuleTable, StaticRule};
use crate::error::{Result, StyleError};
use std::fs;
use std::path::Path;
use toml::{Table, Value};

/// Compile a rule source file.
pub fn compile_file(path: &Path) -> Result<RuleTable> {
    let content = fs::read_to_string(path).map_err(|e| StyleError::io(path, e))?;
    compile_str(&content).map_err(|message| StyleError::RuleSource {
        path: path.to_path_buf(),
        message,
    })
}

/// Compile rule source text. Errors are human-readable descriptions.
pub fn compile_str(content: &str) -> std::result::Result<RuleTable, String> {
    let root: Table = content.parse().map_err(|e: toml::de::Error| e.to_string())?;

    let mut static_rules = Vec::new();
    if let Some(section) = root.get("static_rules") {
        for (name, body) in as_table(section, "static_rules")? {
            static_rules.push(StaticRule {
                name: name.clone(),
                properties: properties(body, &format!("static_rules.{name}"))?,
            });
        }
    }

    let mut dynamic_rules = Vec::new();
    if let Some(section) = root.get("dynamic_rules") {
        for (key, body) in as_table(section, "dynamic_rules")? {
            let context = format!("dynamic_rules.{key}");
            let body = as_table(body, &context)?;

            let prefix = match body.get("prefix") {
                Some(Value::String(prefix)) => prefix.clone(),
                Some(_) => return Err(format!("{context}.prefix must be a string")),
                None => return Err(format!("{context} is missing `prefix`")),
            };

            let mut variants = Vec::new();
            if let Some(props) = body.get("properties") {
                for (variant, decls) in as_table(props, &format!("{context}.properties"))? {
                    variants.push(DynamicProperty {
                        name: variant.clone(),
                        properties: properties(decls, &format!("{context}.properties.{variant}"))?,
                    });
                }
            }

            dynamic_rules.push(DynamicRule { prefix, variants });
        }
    }

    static_rules.sort_by(|a, b| a.name.cmp(&b.name));
    dynamic_rules.sort_by(|a, b| a.prefix.cmp(&b.prefix));

    Ok(RuleTable {
        static_rules,
        dynamic_rules,
    })
}

fn as_table<'v>(value: &'v Value, context: &str) -> std::result::Result<&'v Table, String> {
    value
        .as_table()
        .ok_or_else(|| format!("{context} must be a table"))
}

fn properties(value: &Value, context: &str) -> std::result::Result<Vec<Property>, String> {
    let table = as_table(value, context)?;
    Ok(table
        .iter()
        .map(|(key, value)| match value {
            Value::String(v) => Property::new(key.as_str(), v.as_str()),
            other => Property::new(key.as_str(), other.to_string()),
        })
        .collect())
}

//! Class token to rule matching
//!
//! Two tiers, scanned in table order: exact static names first, then dynamic
//! prefix rules. The first hit wins; a token that matches nothing is simply
//! not emitted.

use super::{DynamicProperty, DynamicRule, Property, RuleTable, StaticRule};

/// A rule that a class token resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMatch<'t> {
    Static(&'t StaticRule),
    Dynamic {
        rule: &'t DynamicRule,
        variant: &'t DynamicProperty,
    },
}

impl<'t> RuleMatch<'t> {
    pub fn properties(&self) -> &'t [Property] {
        match *self {
            RuleMatch::Static(rule) => &rule.properties,
            RuleMatch::Dynamic { variant, .. } => &variant.properties,
        }
    }

    /// Selector text (without the leading dot). Static rules use their own
    /// name, dynamic rules the token that matched them.
    pub fn selector<'a>(&self, token: &'a str) -> &'a str
    where
        't: 'a,
    {
        match *self {
            RuleMatch::Static(rule) => &rule.name,
            RuleMatch::Dynamic { .. } => token,
        }
    }
}

/// Resolve `token` against `table`.
pub fn match_class<'t>(token: &str, table: &'t RuleTable) -> Option<RuleMatch<'t>> {
    if let Some(rule) = table.static_rules.iter().find(|rule| rule.name == token) {
        return Some(RuleMatch::Static(rule));
    }

    table.dynamic_rules.iter().find_map(|rule| {
        let variant_name = variant_of(token, &rule.prefix)?;
        rule.variants
            .iter()
            .find(|variant| variant.name == variant_name)
            .map(|variant| RuleMatch::Dynamic { rule, variant })
    })
}

/// `"p-4"` with prefix `"p"` gives `Some("4")`, `"p"` gives `Some("")`,
/// `"px-4"` gives `None`.
fn variant_of<'a>(token: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = token.strip_prefix(prefix)?;
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix('-')
    }
}

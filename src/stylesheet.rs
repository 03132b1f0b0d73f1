//! Stylesheet assembly
//!
//! Output is a pure function of the sorted class set and the rule table, so
//! two cycles over the same tree produce identical bytes and
//! [`write_if_changed`] leaves the file (and anything watching it) alone.

use crate::diff::SortedSet;
use crate::error::{Result, StyleError};
use crate::rules::{match_class, Property, RuleTable};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Outcome of building a stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    pub css: String,
    /// Class tokens that produced a block
    pub matched: usize,
    /// Class tokens no rule matched
    pub unmatched: usize,
}

/// Emit one `.class { … }` block per matched class, in `classes` order, and
/// optionally an empty `#id {}` block per entry of `ids`. Blocks are
/// separated by a blank line; the output ends with a single newline, or is
/// empty when nothing matched.
pub fn build_stylesheet(
    classes: &SortedSet,
    table: &RuleTable,
    ids: Option<&SortedSet>,
) -> Stylesheet {
    let mut sheet = Stylesheet::default();

    for token in classes {
        match match_class(token, table) {
            Some(rule) => {
                push_block(&mut sheet.css, '.', rule.selector(token), rule.properties());
                sheet.matched += 1;
            }
            None => sheet.unmatched += 1,
        }
    }

    for id in ids.into_iter().flatten() {
        push_block(&mut sheet.css, '#', id, &[]);
    }

    // Every block ends in "}\n\n"; drop the separator after the last one
    let trimmed = sheet.css.trim_end_matches('\n').len();
    sheet.css.truncate(trimmed);
    if !sheet.css.is_empty() {
        sheet.css.push('\n');
    }

    sheet
}

fn push_block(out: &mut String, sigil: char, selector: &str, properties: &[Property]) {
    if properties.is_empty() {
        let _ = write!(out, "{sigil}{selector} {{}}\n\n");
        return;
    }

    let _ = writeln!(out, "{sigil}{selector} {{");
    for property in properties {
        let _ = writeln!(out, "  {}: {};", property.key, property.value);
    }
    out.push_str("}\n\n");
}

/// Write `content` to `path` unless the file already holds exactly those
/// bytes. Returns whether a write happened.
pub fn write_if_changed(path: &Path, content: &str) -> Result<bool> {
    match fs::read(path) {
        Ok(existing) if existing == content.as_bytes() => {
            debug!("{:?} unchanged, skipping write", path);
            return Ok(false);
        }
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(StyleError::io(path, e)),
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StyleError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| StyleError::io(path, e))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{DynamicProperty, DynamicRule, StaticRule};
    use tempfile::TempDir;

    fn table() -> RuleTable {
        RuleTable {
            static_rules: vec![StaticRule {
                name: "flex".to_string(),
                properties: vec![Property::new("display", "flex")],
            }],
            dynamic_rules: vec![DynamicRule {
                prefix: "p".to_string(),
                variants: vec![DynamicProperty {
                    name: "4".to_string(),
                    properties: vec![
                        Property::new("padding", "1rem"),
                        Property::new("box-sizing", "border-box"),
                    ],
                }],
            }],
        }
    }

    fn classes(values: &[&str]) -> SortedSet {
        values.iter().copied().collect()
    }

    #[test]
    fn test_blocks_in_class_order() {
        let sheet = build_stylesheet(&classes(&["p-4", "flex", "unknown"]), &table(), None);

        assert_eq!(
            sheet.css,
            ".flex {\n  display: flex;\n}\n\n.p-4 {\n  padding: 1rem;\n  box-sizing: border-box;\n}\n"
        );
        assert_eq!(sheet.matched, 2);
        assert_eq!(sheet.unmatched, 1);
    }

    #[test]
    fn test_nothing_matched_is_empty() {
        let sheet = build_stylesheet(&classes(&["nope"]), &table(), None);
        assert_eq!(sheet.css, "");

        let sheet = build_stylesheet(&SortedSet::new(), &table(), None);
        assert_eq!(sheet.css, "");
    }

    #[test]
    fn test_id_selector_blocks() {
        let ids = classes(&["fp", "fp1"]);
        let sheet = build_stylesheet(&classes(&["flex"]), &table(), Some(&ids));

        assert_eq!(
            sheet.css,
            ".flex {\n  display: flex;\n}\n\n#fp {}\n\n#fp1 {}\n"
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let set = classes(&["flex", "p-4"]);
        let a = build_stylesheet(&set, &table(), None);
        let b = build_stylesheet(&set, &table(), None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_write_if_changed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("styles.css");

        assert!(write_if_changed(&path, ".a {}\n").unwrap());
        assert!(!write_if_changed(&path, ".a {}\n").unwrap());
        assert!(write_if_changed(&path, "").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}

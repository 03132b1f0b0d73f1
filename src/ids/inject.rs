use super::{derive_prefix, IdRegistry};
use crate::extract::FileAttributes;
use tracing::debug;

/// Result of running the injector over one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injection {
    pub content: String,
    /// Identifiers added to this file, in source order
    pub injected: Vec<String>,
}

impl Injection {
    pub fn changed(&self) -> bool {
        !self.injected.is_empty()
    }
}

/// Insert ` id="…"` after the closing quote of every `className` whose
/// element has no `id` yet. Elements that already carry one are left
/// byte-for-byte alone, which is what makes a second run a no-op.
pub fn inject_ids(
    source: &str,
    attributes: &FileAttributes,
    registry: &mut IdRegistry,
) -> Injection {
    let mut content = String::with_capacity(source.len() + attributes.classes.len() * 16);
    let mut injected = Vec::new();
    let mut cursor = 0;
    let mut last_element = None;

    for attr in &attributes.classes {
        if attr.has_id {
            continue;
        }
        let Some(element) = attr.element else {
            continue;
        };
        // Only the first className of an element gets to name it
        if last_element == Some(element) {
            continue;
        }
        last_element = Some(element);

        let insertion = attr.value.end + 1;
        if insertion > source.len() || !matches!(source.as_bytes()[attr.value.end], b'"' | b'\'') {
            continue;
        }

        let prefix = derive_prefix(attr.value.text(source));
        if prefix.is_empty() {
            debug!("No id prefix derivable from {:?}", attr.value.text(source));
            continue;
        }
        let id = registry.claim(&prefix);

        content.push_str(&source[cursor..insertion]);
        content.push_str(" id=\"");
        content.push_str(&id);
        content.push('"');
        cursor = insertion;
        injected.push(id);
    }

    content.push_str(&source[cursor..]);
    Injection { content, injected }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::RegexScanner;

    fn run(source: &str, registry: &mut IdRegistry) -> Injection {
        let attributes = RegexScanner.scan(source);
        inject_ids(source, &attributes, registry)
    }

    #[test]
    fn test_injects_after_class_attribute() {
        let mut registry = IdRegistry::new();
        let result = run(r#"<div className="flex p-4">hi</div>"#, &mut registry);

        assert!(result.changed());
        assert_eq!(result.content, r#"<div className="flex p-4" id="fp">hi</div>"#);
        assert_eq!(result.injected, vec!["fp"]);
    }

    #[test]
    fn test_existing_id_is_untouched() {
        let mut registry = IdRegistry::new();
        let source = r#"<div className="flex p-4" id="hero">hi</div>"#;
        let result = run(source, &mut registry);

        assert!(!result.changed());
        assert_eq!(result.content, source);
        assert!(!registry.contains("hero"));
    }

    #[test]
    fn test_collisions_within_a_file() {
        let mut registry = IdRegistry::new();
        let source = "<a className=\"flex p-2\" />\n<b className=\"flex p-4\" />\n";
        let result = run(source, &mut registry);

        assert_eq!(result.injected, vec!["fp", "fp1"]);
        assert_eq!(
            result.content,
            "<a className=\"flex p-2\" id=\"fp\" />\n<b className=\"flex p-4\" id=\"fp1\" />\n"
        );
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let mut registry = IdRegistry::new();
        let first = run(r#"<main className="grid"><p className="text-sm" /></main>"#, &mut registry);

        let mut fresh = IdRegistry::new();
        let second = run(&first.content, &mut fresh);

        assert!(!second.changed());
        assert_eq!(second.content, first.content);
    }

    #[test]
    fn test_elements_without_derivable_prefix_are_skipped() {
        let mut registry = IdRegistry::new();
        let source = r#"<div className="-mt-2" /><i className="" />"#;
        let result = run(source, &mut registry);

        assert!(!result.changed());
        assert_eq!(result.content, source);
    }

    #[test]
    fn test_class_outside_a_tag_is_skipped() {
        let mut registry = IdRegistry::new();
        let source = r#"const props = { className="loose" };"#;
        let result = run(source, &mut registry);

        assert!(!result.changed());
    }

    #[test]
    fn test_quoted_angle_bracket_keeps_existing_id() {
        let mut registry = IdRegistry::new();
        let source = r#"<button className="btn" aria-label="Next >" id="next">go</button>"#;
        let result = run(source, &mut registry);

        assert!(!result.changed());
        assert_eq!(result.content, source);
    }

    #[test]
    fn test_nothing_injected_inside_jsx_comment() {
        let mut registry = IdRegistry::new();
        let source = r#"<p>Don't {/* <b className="ghost" /> */} it's</p>"#;
        let result = run(source, &mut registry);

        assert!(!result.changed());
        assert!(result.injected.is_empty());
    }
}

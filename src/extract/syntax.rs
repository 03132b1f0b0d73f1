use super::{ClassAttribute, FileAttributes, Span};
use crate::error::{Result, StyleError};
use std::path::Path;
use tracing::debug;
use tree_sitter::{Node, Parser};

/// tree-sitter backed scanner for TSX sources.
///
/// Holds one parser for its whole lifetime; the pipeline creates one per
/// cycle and feeds it every file in turn.
pub struct SyntaxScanner {
    parser: Parser,
}

impl SyntaxScanner {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_typescript::LANGUAGE_TSX.into())?;
        Ok(Self { parser })
    }

    pub fn scan(&mut self, path: &Path, source: &str) -> Result<FileAttributes> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| StyleError::Parse {
                path: path.to_path_buf(),
                message: "tree-sitter returned no tree".to_string(),
            })?;

        let root = tree.root_node();
        if root.has_error() {
            debug!("Syntax errors in {:?}, scanning recoverable nodes", path);
        }

        let mut attributes = FileAttributes::default();
        let mut cursor = root.walk();
        // Pre-order walk, so attributes come out in source order
        loop {
            let node = cursor.node();
            if node.kind() == "jsx_attribute" {
                visit_attribute(node, source, &mut attributes);
            }

            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return Ok(attributes);
                }
            }
        }
    }
}

fn visit_attribute(node: Node, source: &str, out: &mut FileAttributes) {
    let Some(name) = attribute_name(node, source) else {
        return;
    };
    if name != "className" && name != "id" {
        return;
    }
    let Some(value) = string_value(node) else {
        return;
    };

    if name == "id" {
        out.ids.push(value);
        return;
    }

    let element = node
        .parent()
        .filter(|p| matches!(p.kind(), "jsx_opening_element" | "jsx_self_closing_element"));
    let has_id = element.is_some_and(|element| {
        let mut cursor = element.walk();
        let found = element
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "jsx_attribute")
            .any(|child| attribute_name(child, source) == Some("id"));
        found
    });

    out.classes.push(ClassAttribute {
        value,
        element: element.map(|e| Span::new(e.start_byte(), e.end_byte())),
        has_id,
    });
}

fn attribute_name<'s>(attribute: Node, source: &'s str) -> Option<&'s str> {
    let name = attribute.named_child(0)?;
    if name.kind() != "property_identifier" {
        return None;
    }
    name.utf8_text(source.as_bytes()).ok()
}

/// Span between the quotes of a `"…"` / `'…'` attribute value.
fn string_value(attribute: Node) -> Option<Span> {
    let count = attribute.named_child_count();
    if count < 2 {
        return None;
    }
    let value = attribute.named_child(count - 1)?;
    if value.kind() != "string" {
        return None;
    }
    let (start, end) = (value.start_byte(), value.end_byte());
    (end >= start + 2).then(|| Span::new(start + 1, end - 1))
}

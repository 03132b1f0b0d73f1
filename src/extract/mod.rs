//! Attribute span extraction
//!
//! The pipeline never looks at source text directly; it consumes the byte
//! spans a [`Scanner`] reports for `className="…"` and `id="…"` attributes.
//! Two backends produce them:
//!
//! - **syntax**: tree-sitter TSX grammar (comments are never attributes)
//! - **fallback**: a small context lexer that blanks comments and finds tag
//!   bounds, then regular expressions over the tag interiors
//!
//! Both hand back the same [`FileAttributes`], so the injector and the class
//! collector work unchanged whichever one is configured.

mod fallback;
mod syntax;

pub use fallback::{blank_comments, RegexScanner};
pub use syntax::SyntaxScanner;

use crate::config::ScannerKind;
use crate::error::Result;
use std::ops::Range;
use std::path::Path;

/// Half-open byte range into the scanned source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range()]
    }
}

/// A `className` attribute with a quoted string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassAttribute {
    /// Value between the quotes
    pub value: Span,
    /// Enclosing `<tag …>` (None when the tag boundaries can't be found)
    pub element: Option<Span>,
    /// Whether the enclosing element already carries an `id`
    pub has_id: bool,
}

/// Everything the pipeline needs from one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileAttributes {
    /// In source order
    pub classes: Vec<ClassAttribute>,
    /// Values of every quoted `id` attribute, in source order
    pub ids: Vec<Span>,
}

impl FileAttributes {
    /// Class tokens in first-seen order (duplicates kept).
    pub fn class_tokens<'a>(&self, source: &'a str) -> Vec<&'a str> {
        self.classes
            .iter()
            .flat_map(|attr| tokenize(attr.value.text(source)))
            .collect()
    }

    pub fn id_values<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.ids.iter().map(move |span| span.text(source))
    }
}

/// Split a class attribute value on ASCII spaces, dropping empty tokens.
pub fn tokenize(value: &str) -> impl Iterator<Item = &str> {
    value.split(' ').filter(|token| !token.is_empty())
}

/// Configured attribute scanner.
pub enum Scanner {
    Syntax(SyntaxScanner),
    Regex(RegexScanner),
}

impl Scanner {
    pub fn new(kind: ScannerKind) -> Result<Self> {
        Ok(match kind {
            ScannerKind::Syntax => Scanner::Syntax(SyntaxScanner::new()?),
            ScannerKind::Regex => Scanner::Regex(RegexScanner),
        })
    }

    /// Scan one file's contents. `path` is only used for error messages.
    pub fn scan(&mut self, path: &Path, source: &str) -> Result<FileAttributes> {
        match self {
            Scanner::Syntax(scanner) => scanner.scan(path, source),
            Scanner::Regex(scanner) => Ok(scanner.scan(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_empty_tokens() {
        let tokens: Vec<_> = tokenize("  flex  p-4 flex ").collect();
        assert_eq!(tokens, vec!["flex", "p-4", "flex"]);
    }

    #[test]
    fn test_tokenize_only_splits_on_spaces() {
        let tokens: Vec<_> = tokenize("a\tb c").collect();
        assert_eq!(tokens, vec!["a\tb", "c"]);
    }

    #[test]
    fn test_id_values_in_source_order() {
        let source = r#"<a className="x" id="one" /><b id='two' /><c id={dynamic} />"#;
        let attributes = RegexScanner.scan(source);

        let ids: Vec<&str> = attributes.id_values(source).collect();
        assert_eq!(ids, vec!["one", "two"]);
    }

    #[test]
    fn test_both_backends_agree() {
        let source = r#"
export function Card() {
  // <div className="commented-out">
  return (
    <section className="card shadow" id="hero">
      <h1 className="title text-lg">Hi</h1>
      {/* <span className="also-commented" /> */}
      <img className="avatar" src="a.png" />
    </section>
  );
}
"#;
        let path = Path::new("Card.tsx");
        let mut syntax = Scanner::new(ScannerKind::Syntax).unwrap();
        let mut regex = Scanner::new(ScannerKind::Regex).unwrap();

        let a = syntax.scan(path, source).unwrap();
        let b = regex.scan(path, source).unwrap();

        assert_eq!(
            a.class_tokens(source),
            vec!["card", "shadow", "title", "text-lg", "avatar"]
        );
        assert_eq!(a.class_tokens(source), b.class_tokens(source));
        assert_eq!(
            a.id_values(source).collect::<Vec<_>>(),
            b.id_values(source).collect::<Vec<_>>()
        );

        let has_id: Vec<_> = a.classes.iter().map(|c| c.has_id).collect();
        assert_eq!(has_id, vec![true, false, false]);
        let has_id: Vec<_> = b.classes.iter().map(|c| c.has_id).collect();
        assert_eq!(has_id, vec![true, false, false]);
    }
}

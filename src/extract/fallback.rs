use super::{ClassAttribute, FileAttributes, Span};
use once_cell::sync::Lazy;
use regex::Regex;

static CLASS_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bclassName\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("className pattern is valid")
});

static ID_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^|[\s<])id\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("id pattern is valid")
});

/// Replace every `//` and `/* */` comment in code position with spaces,
/// keeping newlines and byte offsets intact so spans found in the result
/// index the input too. Comment-like text inside strings and JSX text is
/// left alone.
pub fn blank_comments(source: &str) -> String {
    into_string(Markup::lex(source).plain)
}

/// Regex scanner used when no grammar is available (or configured).
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexScanner;

impl RegexScanner {
    pub fn scan(&self, source: &str) -> FileAttributes {
        let markup = Markup::lex(source);
        let tags = into_string(markup.tags_only);
        let mut attributes = FileAttributes::default();

        for caps in CLASS_ATTR.captures_iter(&tags) {
            let Some(value) = caps.get(1).or_else(|| caps.get(2)) else {
                continue;
            };
            let tag = enclosing_tag(&markup.tags, value.start(), value.end());
            attributes.classes.push(ClassAttribute {
                value: Span::new(value.start(), value.end()),
                element: tag.map(|t| t.span),
                has_id: tag.is_some_and(|t| t.has_id),
            });
        }

        for caps in ID_ATTR.captures_iter(&tags) {
            if let Some(value) = caps.get(1).or_else(|| caps.get(2)) {
                attributes.ids.push(Span::new(value.start(), value.end()));
            }
        }

        attributes
    }
}

/// An opening or self-closing `<tag …>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tag {
    span: Span,
    /// Carries an `id` attribute (any value form)
    has_id: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    /// TypeScript expressions: strings, comments and `{}` nesting apply
    Code,
    /// Between `<` and `>`; `tag` indexes [`Markup::tags`] (None for `</x>`)
    Tag { tag: Option<usize>, closing: bool },
    /// JSX children; quotes and slashes are plain text here
    Text,
}

/// Lexical view of a TSX file, built in one pass.
struct Markup {
    /// Input with code comments blanked
    plain: Vec<u8>,
    /// Input with everything outside tag interiors blanked
    tags_only: Vec<u8>,
    tags: Vec<Tag>,
}

impl Markup {
    fn lex(source: &str) -> Self {
        let bytes = source.as_bytes();
        let n = bytes.len();
        let mut plain = bytes.to_vec();
        let mut tags_only = vec![b' '; n];
        let mut tags: Vec<Tag> = Vec::new();
        let mut stack = vec![Context::Code];
        let mut i = 0;

        while i < n {
            let b = bytes[i];
            let context = *stack.last().unwrap_or(&Context::Code);
            match context {
                Context::Code => {
                    if bytes[i..].starts_with(b"//") {
                        let end = find_from(bytes, i, b"\n").unwrap_or(n);
                        blank(&mut plain, i, end);
                        i = end;
                        continue;
                    }
                    if bytes[i..].starts_with(b"/*") {
                        let end = find_from(bytes, i + 2, b"*/").map_or(n, |p| p + 2);
                        blank(&mut plain, i, end);
                        i = end;
                        continue;
                    }
                    match b {
                        b'"' | b'\'' | b'`' => {
                            i = skip_string(bytes, i);
                            continue;
                        }
                        b'{' => stack.push(Context::Code),
                        b'}' if stack.len() > 1 => {
                            stack.pop();
                        }
                        b'<' if starts_element(&plain, i) => {
                            tags.push(Tag {
                                span: Span::new(i, i),
                                has_id: false,
                            });
                            stack.push(Context::Tag {
                                tag: Some(tags.len() - 1),
                                closing: false,
                            });
                            tags_only[i] = b;
                        }
                        _ => {}
                    }
                    i += 1;
                }
                Context::Tag { tag, closing } => {
                    tags_only[i] = b;
                    match b {
                        b'"' | b'\'' => {
                            let end = skip_attribute_value(bytes, i);
                            tags_only[i..end].copy_from_slice(&bytes[i..end]);
                            i = end;
                        }
                        b'{' => {
                            stack.push(Context::Code);
                            i += 1;
                        }
                        b'/' if bytes.get(i + 1) == Some(&b'>') => {
                            tags_only[i + 1] = b'>';
                            close_tag(&mut tags, tag, i + 2);
                            stack.pop();
                            i += 2;
                        }
                        b'>' => {
                            close_tag(&mut tags, tag, i + 1);
                            stack.pop();
                            if !closing {
                                stack.push(Context::Text);
                            }
                            i += 1;
                        }
                        // `<T,>` is a generic parameter list, not an element
                        b',' if !closing => {
                            if let Some(index) = tag {
                                tags.truncate(index);
                            }
                            stack.pop();
                            i += 1;
                        }
                        _ if is_name_start(b) && i > 0 && bytes[i - 1].is_ascii_whitespace() => {
                            let end = i + bytes[i..].iter().take_while(|&&c| is_name_byte(c)).count();
                            tags_only[i..end].copy_from_slice(&bytes[i..end]);
                            if &bytes[i..end] == b"id" && next_non_space(bytes, end) == Some(b'=') {
                                if let Some(index) = tag {
                                    tags[index].has_id = true;
                                }
                            }
                            i = end;
                        }
                        _ => i += 1,
                    }
                }
                Context::Text => {
                    match b {
                        b'{' => stack.push(Context::Code),
                        b'<' if bytes.get(i + 1) == Some(&b'/') => {
                            stack.pop();
                            stack.push(Context::Tag {
                                tag: None,
                                closing: true,
                            });
                            tags_only[i] = b;
                        }
                        b'<' if bytes
                            .get(i + 1)
                            .is_some_and(|c| c.is_ascii_alphabetic() || *c == b'>') =>
                        {
                            tags.push(Tag {
                                span: Span::new(i, i),
                                has_id: false,
                            });
                            stack.push(Context::Tag {
                                tag: Some(tags.len() - 1),
                                closing: false,
                            });
                            tags_only[i] = b;
                        }
                        _ => {}
                    }
                    i += 1;
                }
            }
        }

        // Unterminated tags have an empty span and never enclose anything
        Markup {
            plain,
            tags_only,
            tags,
        }
    }
}

fn close_tag(tags: &mut [Tag], tag: Option<usize>, end: usize) {
    if let Some(t) = tag.and_then(|index| tags.get_mut(index)) {
        t.span.end = end;
    }
}

/// Innermost complete tag around an attribute value.
fn enclosing_tag(tags: &[Tag], start: usize, end: usize) -> Option<Tag> {
    tags.iter()
        .filter(|t| t.span.start < start && end < t.span.end)
        .min_by_key(|t| t.span.end - t.span.start)
        .copied()
}

/// Whether the `<` at `i` opens a JSX element rather than a comparison or a
/// type argument list. Looks at what precedes it in the comment-free text.
fn starts_element(plain: &[u8], i: usize) -> bool {
    let next_ok = plain
        .get(i + 1)
        .is_some_and(|c| c.is_ascii_alphabetic() || *c == b'>');
    if !next_ok {
        return false;
    }

    let before = &plain[..i];
    let Some(p) = before.iter().rposition(|c| !c.is_ascii_whitespace()) else {
        return true;
    };
    let prev = before[p];
    if is_identifier_byte(prev) {
        let word_start = before[..=p]
            .iter()
            .rposition(|c| !is_identifier_byte(*c))
            .map_or(0, |s| s + 1);
        return matches!(&before[word_start..=p], b"return" | b"yield" | b"default");
    }
    matches!(
        prev,
        b'(' | b',' | b'=' | b':' | b'?' | b'[' | b'{' | b';' | b'!' | b'&' | b'|' | b'>'
    )
}

/// Index just past a JS string or template literal starting at `i`. Plain
/// strings stop at an unescaped newline.
fn skip_string(bytes: &[u8], i: usize) -> usize {
    let quote = bytes[i];
    let mut j = i + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            c if c == quote => return j + 1,
            b'\n' if quote != b'`' => return j,
            _ => j += 1,
        }
    }
    bytes.len()
}

/// Index just past a JSX attribute string (no escapes) starting at `i`.
fn skip_attribute_value(bytes: &[u8], i: usize) -> usize {
    let quote = bytes[i];
    bytes[i + 1..]
        .iter()
        .position(|&c| c == quote)
        .map_or(bytes.len(), |p| i + 1 + p + 1)
}

fn find_from(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| from + p)
}

fn next_non_space(bytes: &[u8], from: usize) -> Option<u8> {
    bytes[from..].iter().copied().find(|c| !c.is_ascii_whitespace())
}

fn blank(buf: &mut [u8], start: usize, end: usize) {
    let len = buf.len();
    for c in &mut buf[start..end.min(len)] {
        if *c != b'\n' {
            *c = b' ';
        }
    }
}

fn is_identifier_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'$'
}

fn is_name_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_name_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'_' | b'-' | b':' | b'.')
}

// Only whole ASCII-delimited runs are blanked, so the bytes stay valid UTF-8
fn into_string(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

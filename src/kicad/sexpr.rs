//! Minimal s-expression reader for the `.kicad_pcb` file format.
//!
//! KiCad board files are a single parenthesized tree of atoms and quoted
//! strings. The reader keeps everything as strings; typed accessors live on
//! [`Sexpr`] so callers can pull out positional values and tagged children.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SexprError {
    #[error("unexpected end of input at byte {0}")]
    UnexpectedEof(usize),
    #[error("unexpected ')' at byte {0}")]
    UnexpectedClose(usize),
    #[error("unterminated string starting at byte {0}")]
    UnterminatedString(usize),
    #[error("trailing content at byte {0}")]
    TrailingContent(usize),
    #[error("empty input")]
    Empty,
}

/// A node in the parsed tree: either a bare/quoted atom or a list.
#[derive(Debug, Clone, PartialEq)]
pub enum Sexpr {
    Atom(String),
    List(Vec<Sexpr>),
}

impl Sexpr {
    /// The leading atom of a list, which names the node (`segment`, `pad`, ...).
    pub fn tag(&self) -> Option<&str> {
        match self {
            Sexpr::List(items) => items.first().and_then(Sexpr::as_atom),
            Sexpr::Atom(_) => None,
        }
    }

    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Sexpr::Atom(s) => Some(s),
            Sexpr::List(_) => None,
        }
    }

    /// All items of a list, including the tag atom. Empty for atoms.
    pub fn items(&self) -> &[Sexpr] {
        match self {
            Sexpr::List(items) => items,
            Sexpr::Atom(_) => &[],
        }
    }

    /// Positional atom, counting the tag as index 0.
    pub fn atom_at(&self, idx: usize) -> Option<&str> {
        self.items().get(idx).and_then(Sexpr::as_atom)
    }

    pub fn f64_at(&self, idx: usize) -> Option<f64> {
        self.atom_at(idx).and_then(|s| s.parse().ok())
    }

    pub fn i32_at(&self, idx: usize) -> Option<i32> {
        self.atom_at(idx).and_then(|s| s.parse().ok())
    }

    /// First child list with the given tag.
    pub fn find(&self, tag: &str) -> Option<&Sexpr> {
        self.items().iter().find(|c| c.tag() == Some(tag))
    }

    /// All child lists with the given tag, in file order.
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Sexpr> + 'a {
        self.items().iter().filter(move |c| c.tag() == Some(tag))
    }

    /// Value of a `(tag value)` child, e.g. `(width 0.25)`.
    pub fn value_of(&self, tag: &str) -> Option<&str> {
        self.find(tag).and_then(|c| c.atom_at(1))
    }

    pub fn f64_of(&self, tag: &str) -> Option<f64> {
        self.value_of(tag).and_then(|s| s.parse().ok())
    }

    pub fn i32_of(&self, tag: &str) -> Option<i32> {
        self.value_of(tag).and_then(|s| s.parse().ok())
    }
}

/// Parse a complete document into its single root node.
pub fn parse(input: &str) -> Result<Sexpr, SexprError> {
    let bytes = input.as_bytes();
    let mut pos = 0usize;
    skip_whitespace(bytes, &mut pos);
    if pos >= bytes.len() {
        return Err(SexprError::Empty);
    }
    let root = parse_node(input, bytes, &mut pos)?;
    skip_whitespace(bytes, &mut pos);
    if pos < bytes.len() {
        return Err(SexprError::TrailingContent(pos));
    }
    Ok(root)
}

fn skip_whitespace(bytes: &[u8], pos: &mut usize) {
    while *pos < bytes.len() && bytes[*pos].is_ascii_whitespace() {
        *pos += 1;
    }
}

fn parse_node(input: &str, bytes: &[u8], pos: &mut usize) -> Result<Sexpr, SexprError> {
    match bytes[*pos] {
        b'(' => parse_list(input, bytes, pos),
        b')' => Err(SexprError::UnexpectedClose(*pos)),
        b'"' => parse_quoted(input, bytes, pos),
        _ => Ok(parse_bare_atom(input, bytes, pos)),
    }
}

fn parse_list(input: &str, bytes: &[u8], pos: &mut usize) -> Result<Sexpr, SexprError> {
    debug_assert_eq!(bytes[*pos], b'(');
    *pos += 1;
    let mut items = Vec::new();
    loop {
        skip_whitespace(bytes, pos);
        if *pos >= bytes.len() {
            return Err(SexprError::UnexpectedEof(*pos));
        }
        if bytes[*pos] == b')' {
            *pos += 1;
            return Ok(Sexpr::List(items));
        }
        items.push(parse_node(input, bytes, pos)?);
    }
}

fn parse_quoted(input: &str, bytes: &[u8], pos: &mut usize) -> Result<Sexpr, SexprError> {
    let start = *pos;
    *pos += 1;
    let mut value = String::new();
    while *pos < bytes.len() {
        match bytes[*pos] {
            b'"' => {
                *pos += 1;
                return Ok(Sexpr::Atom(value));
            }
            b'\\' if *pos + 1 < bytes.len() => {
                // KiCad escapes quotes and backslashes inside strings
                let escaped = bytes[*pos + 1];
                value.push(match escaped {
                    b'n' => '\n',
                    b't' => '\t',
                    other => other as char,
                });
                *pos += 2;
            }
            _ => {
                let ch_start = *pos;
                let mut end = ch_start + 1;
                while end < bytes.len() && !input.is_char_boundary(end) {
                    end += 1;
                }
                value.push_str(&input[ch_start..end]);
                *pos = end;
            }
        }
    }
    Err(SexprError::UnterminatedString(start))
}

fn parse_bare_atom(input: &str, bytes: &[u8], pos: &mut usize) -> Sexpr {
    let start = *pos;
    while *pos < bytes.len() {
        let b = bytes[*pos];
        if b.is_ascii_whitespace() || b == b'(' || b == b')' || b == b'"' {
            break;
        }
        *pos += 1;
    }
    Sexpr::Atom(input[start..*pos].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atoms_and_lists() {
        let root = parse("(kicad_pcb (version 20221018) (generator pcbnew))").unwrap();
        assert_eq!(root.tag(), Some("kicad_pcb"));
        assert_eq!(root.i32_of("version"), Some(20221018));
        assert_eq!(root.value_of("generator"), Some("pcbnew"));
    }

    #[test]
    fn test_quoted_strings() {
        let root = parse(r#"(net 1 "GND/\"shield\"")"#).unwrap();
        assert_eq!(root.atom_at(1), Some("1"));
        assert_eq!(root.atom_at(2), Some("GND/\"shield\""));
    }

    #[test]
    fn test_positional_floats() {
        let root = parse("(at 104.5 -50.25 90)").unwrap();
        assert_eq!(root.f64_at(1), Some(104.5));
        assert_eq!(root.f64_at(2), Some(-50.25));
        assert_eq!(root.f64_at(3), Some(90.0));
    }

    #[test]
    fn test_find_all_preserves_order() {
        let root = parse("(a (xy 1 1) (other) (xy 2 2))").unwrap();
        let xs: Vec<f64> = root.find_all("xy").filter_map(|n| n.f64_at(1)).collect();
        assert_eq!(xs, vec![1.0, 2.0]);
    }

    #[test]
    fn test_unterminated_string() {
        assert!(matches!(
            parse("(name \"oops"),
            Err(SexprError::UnterminatedString(_))
        ));
    }

    #[test]
    fn test_unbalanced_parens() {
        assert!(matches!(
            parse("(segment (start 0 0)"),
            Err(SexprError::UnexpectedEof(_))
        ));
        assert!(matches!(parse(")"), Err(SexprError::UnexpectedClose(0))));
    }

    #[test]
    fn test_trailing_content() {
        assert!(matches!(
            parse("(a) (b)"),
            Err(SexprError::TrailingContent(_))
        ));
    }
}

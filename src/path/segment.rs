//! Tokenizing helpers shared by the resolver, the glob expander and the shell.
//!
//! A backslash makes the next character literal: `\/` keeps a delimiter inside
//! a segment and `\*` is a plain star.

use std::borrow::Cow;

use regex::Regex;

use super::PathError;

/// Characters that make a segment a pattern.
pub const GLOB_CHARS: [char; 4] = ['*', '?', '[', ']'];

/// Splits a path on every delimiter that is not escaped. Segments are yielded
/// raw (escapes intact); empty segments are yielded too.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    rest: Option<&'a str>,
    delimiter: char,
}

impl<'a> Segments<'a> {
    pub fn new(path: &'a str, delimiter: char) -> Self {
        Segments {
            rest: Some(path),
            delimiter,
        }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest?;
        let mut escaped = false;
        for (i, c) in rest.char_indices() {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == self.delimiter {
                self.rest = Some(&rest[i + c.len_utf8()..]);
                return Some(&rest[..i]);
            }
        }
        self.rest = None;
        Some(rest)
    }
}

/// What a single path segment asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Produced by repeated delimiters; skipped.
    Empty,
    /// `.`
    Current,
    /// `..`
    Parent,
    /// Matched by exact name. Escapes are already removed.
    Literal(Cow<'a, str>),
    /// Contains an unescaped `*`, `?`, `[` or `]`.
    Pattern(&'a str),
}

impl<'a> Segment<'a> {
    pub fn classify(raw: &'a str) -> Self {
        match raw {
            "" => Segment::Empty,
            "." => Segment::Current,
            ".." => Segment::Parent,
            _ if is_pattern(raw) => Segment::Pattern(raw),
            _ => Segment::Literal(unescape(raw)),
        }
    }
}

/// Walks `s` yielding each character with whether it was escaped.
fn scan(s: &str) -> impl Iterator<Item = (char, bool)> + '_ {
    let mut chars = s.chars();
    std::iter::from_fn(move || {
        let c = chars.next()?;
        if c == '\\' {
            // a trailing backslash stands for itself
            Some(chars.next().map_or(('\\', false), |n| (n, true)))
        } else {
            Some((c, false))
        }
    })
}

/// Whether `s` holds an unescaped glob character.
pub fn is_pattern(s: &str) -> bool {
    scan(s).any(|(c, escaped)| !escaped && GLOB_CHARS.contains(&c))
}

pub fn unescape(raw: &str) -> Cow<'_, str> {
    if raw.contains('\\') {
        Cow::Owned(scan(raw).map(|(c, _)| c).collect())
    } else {
        Cow::Borrowed(raw)
    }
}

/// Escapes a node name so that [`Segments`] and [`unescape`] give it back unchanged.
pub fn escape_name(name: &str, delimiter: char) -> Cow<'_, str> {
    if name.contains(['\\', delimiter]) {
        let mut out = String::with_capacity(name.len() + 2);
        for c in name.chars() {
            if c == '\\' || c == delimiter {
                out.push('\\');
            }
            out.push(c);
        }
        Cow::Owned(out)
    } else {
        Cow::Borrowed(name)
    }
}

/// Rejects nested `[`, a `]` with no opening `[`, and an unclosed `[`.
pub fn check_brackets(word: &str) -> Result<(), PathError> {
    let mut open = false;
    for (c, escaped) in scan(word) {
        match (c, escaped, open) {
            (_, true, _) => {}
            ('[', false, true) => return Err(PathError::malformed(word, "nested '['")),
            ('[', false, false) => open = true,
            (']', false, false) => return Err(PathError::malformed(word, "unmatched ']'")),
            (']', false, true) => open = false,
            _ => {}
        }
    }
    if open {
        return Err(PathError::malformed(word, "unmatched '['"));
    }
    Ok(())
}

fn push_escaped(re: &mut String, c: char) {
    let mut buf = [0; 4];
    re.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}

/// Translates one glob segment into an anchored regular expression.
///
/// `*` becomes `.*`, `?` becomes `.`, `[...]` stays a class (`[!...]` is
/// negated), and everything else is escaped, so a `.` in a name only ever
/// matches a dot.
pub fn glob_to_regex(glob: &str) -> String {
    let mut re = String::with_capacity(glob.len() * 2 + 2);
    re.push('^');

    let mut in_class = false;
    let mut class_start = false;
    for (c, escaped) in scan(glob) {
        if in_class {
            match c {
                ']' if !escaped => {
                    in_class = false;
                    re.push(']');
                }
                '!' | '^' if class_start && !escaped => re.push('^'),
                '-' if !escaped => re.push('-'),
                c if c.is_alphanumeric() => re.push(c),
                c => push_escaped(&mut re, c),
            }
            class_start = false;
            continue;
        }
        match c {
            _ if escaped => push_escaped(&mut re, c),
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            '[' => {
                in_class = true;
                class_start = true;
                re.push('[');
            }
            c => push_escaped(&mut re, c),
        }
    }

    re.push('$');
    re
}

/// Compiles a glob segment into a full-match [`Regex`].
pub fn compile_glob(glob: &str) -> Result<Regex, PathError> {
    check_brackets(glob)?;
    Regex::new(&glob_to_regex(glob)).map_err(|e| PathError::malformed(glob, e))
}

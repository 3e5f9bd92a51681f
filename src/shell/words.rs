//! Splitting a command line into words and expanding the wildcard ones.

use log::debug;

use crate::{
    path::{
        expand, to_absolute,
        segment::{check_brackets, is_pattern},
        PathError,
    },
    tree::{NodeId, Tree},
};

/// How a word is treated during expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordKind {
    /// Wrapped in `"`; passed on without the quotes, never expanded.
    Quoted,
    Plain,
    /// Holds an unescaped wildcard.
    Pattern,
    /// Holds unbalanced or nested brackets.
    Invalid,
}

impl WordKind {
    pub fn classify(word: &str) -> Self {
        if word.len() >= 2 && word.starts_with('"') && word.ends_with('"') {
            WordKind::Quoted
        } else if check_brackets(word).is_err() {
            WordKind::Invalid
        } else if is_pattern(word) {
            WordKind::Pattern
        } else {
            WordKind::Plain
        }
    }
}

/// A word as typed, quotes included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    pub kind: WordKind,
}

impl Word {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let kind = WordKind::classify(&text);
        Word { text, kind }
    }

    /// The text without surrounding quotes.
    pub fn unquoted(&self) -> &str {
        strip_quotes(&self.text)
    }
}

pub fn strip_quotes(word: &str) -> &str {
    word.strip_prefix('"')
        .and_then(|w| w.strip_suffix('"'))
        .unwrap_or(word)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Between,
    Plain,
    Quoted,
    Closed,
}

/// Splits `line` on whitespace. A word that starts with `"` runs to the next
/// `"` and may hold spaces; the quotes are kept so that expansion can tell it
/// apart.
pub fn split_words(line: &str) -> Result<Vec<Word>, PathError> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut state = State::Between;

    for c in line.chars() {
        state = match (state, c) {
            (State::Between, c) if c.is_whitespace() => State::Between,
            (State::Between, '"') => {
                word.push('"');
                State::Quoted
            }
            (State::Between, c) => {
                word.push(c);
                State::Plain
            }
            (State::Plain, c) if c.is_whitespace() => {
                words.push(Word::new(std::mem::take(&mut word)));
                State::Between
            }
            (State::Plain, '"') => {
                return Err(PathError::malformed(line, "'\"' inside a word"));
            }
            (State::Plain, c) => {
                word.push(c);
                State::Plain
            }
            (State::Quoted, '"') => {
                word.push('"');
                words.push(Word::new(std::mem::take(&mut word)));
                State::Closed
            }
            (State::Quoted, c) => {
                word.push(c);
                State::Quoted
            }
            (State::Closed, c) if c.is_whitespace() => State::Between,
            (State::Closed, _) => {
                return Err(PathError::malformed(line, "text after closing '\"'"));
            }
        };
    }

    match state {
        State::Quoted => return Err(PathError::malformed(line, "unmatched '\"'")),
        State::Plain => words.push(Word::new(word)),
        State::Between | State::Closed => {}
    }
    Ok(words)
}

/// Replaces every pattern word by the absolute paths it expands to from
/// `current`. A pattern with no match is kept as typed, so the command gets to
/// report it.
pub fn expand_words<V>(
    tree: &Tree<V>,
    current: NodeId,
    words: &[Word],
) -> Result<Vec<String>, PathError> {
    let mut out = Vec::with_capacity(words.len());
    for word in words {
        match word.kind {
            WordKind::Quoted => out.push(word.unquoted().to_string()),
            WordKind::Plain => out.push(word.text.clone()),
            WordKind::Invalid => {
                check_brackets(&word.text)?;
                return Err(PathError::malformed(&word.text, "invalid argument"));
            }
            WordKind::Pattern => {
                let paths = expand(tree, current, &word.text)?;
                if paths.is_empty() {
                    debug!("{:?} matched nothing, kept as is", word.text);
                    out.push(word.text.clone());
                } else {
                    let delimiter = tree.delimiter();
                    out.extend(paths.iter().map(|p| to_absolute(p, delimiter)));
                }
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use similar_asserts::assert_eq;

    use super::*;

    fn texts(line: &str) -> Vec<String> {
        split_words(line)
            .unwrap()
            .into_iter()
            .map(|w| w.text)
            .collect()
    }

    #[test]
    fn splitting() {
        assert_eq!(texts("  ls -l  A/A1 "), ["ls", "-l", "A/A1"]);
        assert_eq!(texts("cd \"with space\" B"), ["cd", "\"with space\"", "B"]);
        assert_eq!(texts("\"\""), ["\"\""]);
        assert!(texts("").is_empty());
    }

    #[test]
    fn bad_quoting() {
        for line in ["ls a\"b\"", "ls \"ab\"c", "ls \"open"] {
            assert!(
                matches!(split_words(line), Err(PathError::MalformedPattern { .. })),
                "{line}"
            );
        }
    }

    #[test]
    fn kinds() {
        assert_eq!(WordKind::classify("\"A*\""), WordKind::Quoted);
        assert_eq!(WordKind::classify("A/A1"), WordKind::Plain);
        assert_eq!(WordKind::classify("A/A\\*"), WordKind::Plain);
        assert_eq!(WordKind::classify("A/A?"), WordKind::Pattern);
        assert_eq!(WordKind::classify("A[12"), WordKind::Invalid);
        assert_eq!(WordKind::classify("\""), WordKind::Plain);
    }

    #[test]
    fn expansion() {
        let tree: Tree = Tree::from_paths(["/A/A1/A23", "/A/A2", "/B/B1"], '/');
        let words = split_words("ls A/* \"A/*\" B C*").unwrap();
        let args = expand_words(&tree, tree.root(), &words).unwrap();
        assert_eq!(args, ["ls", "/A/A1", "/A/A2", "A/*", "B", "C*"]);

        let invalid = split_words("ls A]").unwrap();
        assert!(expand_words(&tree, tree.root(), &invalid).is_err());
    }
}

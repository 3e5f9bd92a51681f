use std::fmt::Display;

use thiserror::Error;

/// Errors from resolving or expanding a path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("empty path")]
    EmptyPath,

    #[error("{path}: no such node")]
    NoSuchNode { path: String, segment: String },

    /// Rejected before any tree walk: bad quoting, bad brackets, or a pattern
    /// that does not compile.
    #[error("invalid argument {word:?}: {reason}")]
    MalformedPattern { word: String, reason: String },
}

impl PathError {
    pub(crate) fn malformed(word: &str, reason: impl Display) -> Self {
        PathError::MalformedPattern {
            word: word.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn no_such_node(path: &str, segment: &str) -> Self {
        PathError::NoSuchNode {
            path: path.to_string(),
            segment: segment.to_string(),
        }
    }
}

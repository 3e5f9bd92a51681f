//! Path handling on top of [`Tree`](crate::tree::Tree).
//!
//! *   [`follow`] resolves a literal path to a single node.
//! *   [`expand`] expands a wildcard path to every matching path.
//!
//! Both treat `.` and `..` the same way, and both split on the tree's delimiter
//! with `\` escaping the next character.

mod error;
pub mod glob;
pub mod resolve;
pub mod segment;

pub use error::PathError;
pub use glob::{expand, GlobPattern};
pub use resolve::follow;

/// Turns a root-relative expansion result into a path [`follow`] accepts from anywhere.
pub fn to_absolute(path: &str, delimiter: char) -> String {
    if path.starts_with(delimiter) {
        path.to_string()
    } else {
        format!("{delimiter}{path}")
    }
}

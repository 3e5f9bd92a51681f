//! # treenav
//!
//! treenav is a library for labeled trees that are navigated like a file
//! system. Nodes are addressed by delimiter-separated paths, walked with
//! pluggable visitors, and selected with shell-style wildcard patterns.
//!
//! *   [`tree`] holds the tree itself and its traversal machinery.
//! *   [`path`] resolves literal paths and expands wildcard paths.
//! *   [`shell`] is the small command interpreter behind the `treenav` binary.

pub mod path;
pub mod shell;
pub mod tree;

pub use path::{expand, follow, PathError};
pub use tree::{Node, NodeId, Tree, TreeError};

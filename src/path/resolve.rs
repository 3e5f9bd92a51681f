use log::trace;

use super::{
    segment::{unescape, Segment, Segments},
    PathError,
};
use crate::tree::{NodeId, Tree};

/// Follows a literal path and returns the node it ends on.
///
/// Leading whitespace is skipped. A path starting with the delimiter starts at
/// the root; anything else starts at `current` (or the root when there is no
/// current node). `.` stays put, `..` moves to the parent and is a no-op at the
/// root, every other segment must be the exact name of a child. Wildcards are
/// not special here.
pub fn follow<V>(tree: &Tree<V>, path: &str, current: Option<NodeId>) -> Result<NodeId, PathError> {
    let path = path.trim_start();
    if path.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let delimiter = tree.delimiter();
    let mut node = if path.starts_with(delimiter) {
        tree.root()
    } else {
        current.unwrap_or(tree.root())
    };

    for raw in Segments::new(path, delimiter) {
        node = match Segment::classify(raw) {
            Segment::Empty | Segment::Current => node,
            Segment::Parent => tree.parent(node).unwrap_or(node),
            Segment::Literal(name) => tree
                .child(node, &name)
                .ok_or_else(|| PathError::no_such_node(path, &name))?,
            // wildcards are plain characters when following
            Segment::Pattern(raw) => {
                let name = unescape(raw);
                tree.child(node, &name)
                    .ok_or_else(|| PathError::no_such_node(path, &name))?
            }
        };
    }

    trace!("followed {path:?} to node {node}");
    Ok(node)
}

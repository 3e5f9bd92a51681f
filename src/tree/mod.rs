//! Defines the labeled tree that every navigation operation works on.
//!
//! A [`Tree`] is an arena of [`Node`]s addressed by [`NodeId`]. Each node owns an
//! ordered, name-keyed map of its children and keeps a plain (non-owning) id of
//! its parent, so the structure is acyclic by construction:
//!
//! *   children are only ever created through [`Tree::insert_path`] or
//!     [`Tree::add_child`], which attach the new node to exactly one parent;
//! *   a node's parent is recorded once, at creation, and never reassigned;
//! *   sibling names are unique because they are the keys of the child map.
//!
//! Dropping the tree drops the arena, so there is no recursive teardown no matter
//! how deep the tree is.
//!
//! The submodules provide the walking machinery:
//! *   [`visit`]: the generic depth-first and breadth-first drivers and the
//!     visitor traits they call.
//! *   [`visitors`]: the stock visitors (level and index stamping, counting,
//!     printing and searching).
//! *   [`iterato`]: plain iterators (ancestors, breadth-first).

use std::{
    collections::BTreeMap,
    fmt::{self, Display},
    ops::{Index, IndexMut},
};

use itertools::Itertools;
use log::warn;
use thiserror::Error;

pub mod iterato;
pub mod visit;
pub mod visitors;

use iterato::{AncestorsIter, BfsIter};

/// The delimiter used when none is given.
pub const DEFAULT_DELIMITER: char = '/';

/// A type-safe identifier for a node within a [`Tree`].
/// Wraps a `usize` index into the node arena.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root of every tree.
    pub const ROOT: NodeId = NodeId(0);
}

impl From<NodeId> for usize {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single entry of the namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node<V> {
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: BTreeMap<String, NodeId>,
    pub(crate) level: usize,
    pub(crate) index: usize,
    pub(crate) data: V,
}

impl<V> Node<V> {
    fn new(name: String, parent: Option<NodeId>, level: usize, data: V) -> Self {
        Node {
            name,
            parent,
            children: BTreeMap::new(),
            level,
            index: 0,
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Structural depth, root = 0.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Position in breadth-first order. Only meaningful after [`visitors::set_indices`].
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Children in ascending name order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = (&str, NodeId)> + '_ {
        self.children.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.children.get(name).copied()
    }

    pub fn data(&self) -> &V {
        &self.data
    }
}

/// Errors that can occur while building a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("empty path")]
    EmptyPath,
    #[error("empty node name")]
    EmptyName,
    #[error("root name mismatch: tree root is {root:?} but {path:?} starts at {found:?}")]
    RootNameConflict {
        root: String,
        found: String,
        path: String,
    },
    #[error("invalid node id: {0}")]
    NoSuchNode(NodeId),
}

/// A labeled tree. `V` is the payload stored in every node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tree<V = ()> {
    pub(crate) nodes: Vec<Node<V>>,
    pub(crate) delimiter: char,
}

impl<V> Index<NodeId> for Tree<V> {
    type Output = Node<V>;
    fn index(&self, index: NodeId) -> &Self::Output {
        &self.nodes[index.0]
    }
}

impl<V> IndexMut<NodeId> for Tree<V> {
    fn index_mut(&mut self, index: NodeId) -> &mut Self::Output {
        &mut self.nodes[index.0]
    }
}

impl<V: Default> Default for Tree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Default> Tree<V> {
    /// A tree holding only an unnamed root.
    pub fn new() -> Self {
        Self::with_delimiter(DEFAULT_DELIMITER)
    }

    pub fn with_delimiter(delimiter: char) -> Self {
        Tree {
            nodes: vec![Node::new(String::new(), None, 0, V::default())],
            delimiter,
        }
    }

    /// A tree whose root name is already assigned.
    pub fn with_root(name: impl Into<String>) -> Self {
        let mut tree = Self::new();
        tree.nodes[0].name = name.into();
        tree
    }

    /// Builds a tree from a list of paths split on `delimiter`, then runs the
    /// level and breadth-index passes. Rejected paths are logged and skipped.
    pub fn from_paths<I, S>(paths: I, delimiter: char) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::with_delimiter(delimiter);
        tree.insert_paths(paths);
        visitors::set_levels(&mut tree);
        visitors::set_indices(&mut tree);
        tree
    }

    /// Inserts every path using the node delimiter. Returns the rejected insertions.
    pub fn insert_paths<I, S>(&mut self, paths: I) -> Vec<TreeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let delimiter = self.delimiter;
        self.insert_paths_with(paths, delimiter)
    }

    /// Inserts every path, splitting on `delimiter`. Blank lines are ignored.
    pub fn insert_paths_with<I, S>(&mut self, paths: I, delimiter: char) -> Vec<TreeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths
            .into_iter()
            .filter(|p| !p.as_ref().trim().is_empty())
            .filter_map(|p| {
                let path = p.as_ref();
                self.insert_path_with(path, delimiter)
                    .inspect_err(|e| warn!("skipping {path:?}: {e}"))
                    .err()
            })
            .collect()
    }

    /// Inserts a path using the node delimiter. See [`Tree::insert_path_with`].
    pub fn insert_path(&mut self, path: &str) -> Result<NodeId, TreeError> {
        let delimiter = self.delimiter;
        self.insert_path_with(path, delimiter)
    }

    /// Creates every missing node along `path`, returning the last one.
    ///
    /// The first segment names the root. An unnamed root takes that name (a
    /// leading delimiter names it after the node delimiter). If the root already
    /// has a name, a non-empty first segment must equal it, otherwise the
    /// insertion is rejected and nothing changes. Existing nodes are reused.
    pub fn insert_path_with(&mut self, path: &str, delimiter: char) -> Result<NodeId, TreeError> {
        if path.is_empty() {
            return Err(TreeError::EmptyPath);
        }

        let mut segments = path.split(delimiter);
        let first = segments.next().unwrap_or_default();

        if self.nodes[0].name.is_empty() {
            self.nodes[0].name = if first.is_empty() {
                self.delimiter.to_string()
            } else {
                first.to_string()
            };
        } else if !first.is_empty() && self.nodes[0].name != first {
            return Err(TreeError::RootNameConflict {
                root: self.nodes[0].name.clone(),
                found: first.to_string(),
                path: path.to_string(),
            });
        }

        let mut node = NodeId::ROOT;
        for segment in segments.take_while(|s| !s.is_empty()) {
            node = self.get_or_insert_child(node, segment, V::default);
        }
        Ok(node)
    }

    /// Adds `name` below `parent`. An existing child with that name is returned as is.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        data: V,
    ) -> Result<NodeId, TreeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TreeError::EmptyName);
        }
        if self.node(parent).is_none() {
            return Err(TreeError::NoSuchNode(parent));
        }
        Ok(self.get_or_insert_child(parent, &name, || data))
    }

    fn get_or_insert_child(
        &mut self,
        parent: NodeId,
        name: &str,
        data: impl FnOnce() -> V,
    ) -> NodeId {
        if let Some(child) = self.nodes[parent.0].child(name) {
            return child;
        }
        let id = NodeId(self.nodes.len());
        let level = self.nodes[parent.0].level + 1;
        self.nodes
            .push(Node::new(name.to_string(), Some(parent), level, data()));
        self.nodes[parent.0].children.insert(name.to_string(), id);
        id
    }

    /// The built-in tree used when no tree file is given:
    ///
    /// ```text
    /// /
    /// ├── L
    /// │   ├── LL
    /// │   └── LR
    /// └── R
    ///     ├── RL
    ///     └── RR
    /// ```
    pub fn demo() -> Self {
        Self::from_paths(["/L/LL", "/L/LR", "/R/RL", "/R/RR"], DEFAULT_DELIMITER)
    }
}

impl<V> Tree<V> {
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds its root, so this only reports whether the root has no children.
    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<V>> {
        self.nodes.get(id.0)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self[id].parent
    }

    pub fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self[id].child(name)
    }

    pub fn children(&self, id: NodeId) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self[id].children.values().copied()
    }

    pub fn iter_node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Iterates from `start` up to the root (inclusive).
    pub fn ancestors(&self, start: NodeId) -> AncestorsIter<'_, V> {
        AncestorsIter::new(self, start)
    }

    pub fn iter_bfs(&self, start: NodeId) -> BfsIter<'_, V> {
        BfsIter::new(self, start)
    }

    /// The working-directory string of a node: the root name followed by the
    /// delimiter-joined names down to `id`, without doubling a delimiter root.
    pub fn path_of(&self, id: NodeId) -> String {
        let mut names: Vec<&str> = self.ancestors(id).map(|a| self[a].name.as_str()).collect();
        names.reverse();

        let delim = self.delimiter.to_string();
        match names.split_first() {
            None => String::new(),
            Some((root, [])) => root.to_string(),
            Some((root, rest)) => {
                let tail = rest.iter().join(&delim);
                if *root == delim {
                    format!("{delim}{tail}")
                } else {
                    format!("{root}{delim}{tail}")
                }
            }
        }
    }

    /// The first node, in key order, exactly `depth` levels below `start`.
    pub fn find_leftmost(&self, start: NodeId, depth: usize) -> Option<NodeId> {
        if depth == 0 {
            return Some(start);
        }
        self.children(start)
            .find_map(|c| self.find_leftmost(c, depth - 1))
    }

    /// The last node, in key order, exactly `depth` levels below `start`.
    pub fn find_rightmost(&self, start: NodeId, depth: usize) -> Option<NodeId> {
        if depth == 0 {
            return Some(start);
        }
        self.children(start)
            .rev()
            .find_map(|c| self.find_rightmost(c, depth - 1))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn scenario() -> Tree {
        Tree::from_paths(["/A/A1/A23", "/A/A2", "/B/B1"], '/')
    }

    #[test]
    fn insert_builds_missing_nodes() {
        let tree = scenario();
        assert_eq!(tree.len(), 7);
        assert_eq!(tree[tree.root()].name(), "/");

        let a = tree.child(tree.root(), "A").unwrap();
        let a1 = tree.child(a, "A1").unwrap();
        let a23 = tree.child(a1, "A23").unwrap();
        assert_eq!(tree[a23].level(), 3);
        assert_eq!(tree.parent(a23), Some(a1));
        assert_eq!(tree.parent(tree.root()), None);
    }

    #[test]
    fn insert_is_idempotent() {
        let mut tree: Tree = Tree::new();
        let first = tree.insert_path("/x/y").unwrap();
        let len = tree.len();
        let second = tree.insert_path("/x/y").unwrap();
        assert_eq!(first, second);
        assert_eq!(tree.len(), len);
    }

    #[test]
    fn empty_path_is_rejected() {
        let mut tree: Tree = Tree::new();
        assert_eq!(tree.insert_path(""), Err(TreeError::EmptyPath));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[tree.root()].name(), "");
    }

    #[test]
    fn first_segment_names_the_root() {
        let mut tree: Tree = Tree::new();
        tree.insert_path("top/a/b").unwrap();
        assert_eq!(tree[tree.root()].name(), "top");

        let err = tree.insert_path("other/c").unwrap_err();
        assert_eq!(
            err,
            TreeError::RootNameConflict {
                root: "top".into(),
                found: "other".into(),
                path: "other/c".into(),
            }
        );
        assert_eq!(tree.len(), 3);

        // a rooted path is always accepted
        tree.insert_path("/a/d").unwrap();
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn bulk_insert_skips_conflicts() {
        let mut tree: Tree = Tree::new();
        let errors = tree.insert_paths(["A/A1", "B/B1", "", "A/A2"]);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], TreeError::RootNameConflict { .. }));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn custom_path_delimiter() {
        let mut tree: Tree = Tree::new();
        tree.insert_path_with(".a.b", '.').unwrap();
        let a = tree.child(tree.root(), "a").unwrap();
        assert!(tree.child(a, "b").is_some());
        assert_eq!(tree.path_of(tree.child(a, "b").unwrap()), "/a/b");
    }

    #[test]
    fn add_child_never_overwrites() {
        let mut tree: Tree<u32> = Tree::with_root("r");
        let a = tree.add_child(tree.root(), "a", 1).unwrap();
        let again = tree.add_child(tree.root(), "a", 2).unwrap();
        assert_eq!(a, again);
        assert_eq!(*tree[a].data(), 1);
        assert_eq!(tree.add_child(a, "", 3), Err(TreeError::EmptyName));
        assert_eq!(
            tree.add_child(NodeId(42), "x", 3),
            Err(TreeError::NoSuchNode(NodeId(42)))
        );
    }

    #[test]
    fn children_are_key_ordered() {
        let mut tree: Tree = Tree::new();
        tree.insert_paths(["/c", "/a", "/b"]);
        let names: Vec<_> = tree[tree.root()].children().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn path_of_renders_working_directory() {
        let tree = scenario();
        let a23 = crate::path::follow(&tree, "/A/A1/A23", None).unwrap();
        assert_eq!(tree.path_of(a23), "/A/A1/A23");
        assert_eq!(tree.path_of(tree.root()), "/");

        let mut named: Tree = Tree::new();
        let leaf = named.insert_path("top/x").unwrap();
        assert_eq!(named.path_of(leaf), "top/x");
    }

    #[test]
    fn leftmost_and_rightmost() {
        let tree = scenario();
        let left = tree.find_leftmost(tree.root(), 2).unwrap();
        let right = tree.find_rightmost(tree.root(), 2).unwrap();
        assert_eq!(tree[left].name(), "A1");
        assert_eq!(tree[right].name(), "B1");
        assert_eq!(tree[tree.find_leftmost(tree.root(), 3).unwrap()].name(), "A23");
        assert_eq!(tree.find_rightmost(tree.root(), 4), None);
    }

    #[test]
    fn demo_tree() {
        let tree: Tree = Tree::demo();
        assert_eq!(tree.len(), 7);
        let rr = tree.find_rightmost(tree.root(), 2).unwrap();
        assert_eq!(tree.path_of(rr), "/R/RR");
        assert_eq!(tree[rr].index(), 6);
    }
}

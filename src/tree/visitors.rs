//! Stock visitors and the convenience walks built on them.
//!
//! Each visitor is a small, independent implementation of [`NodeVisitor`] or
//! [`NodeVisitorMut`]:
//!
//! * [`LevelStamp`]: writes every node's depth, run depth-first from the root.
//! * [`IndexStamp`]: writes every node's breadth-first index.
//! * [`NodeCounter`]: counts nodes within a half-open depth band.
//! * [`PrintNode`]: renders an indented listing to any [`io::Write`].
//! * [`FindNode`]: collects nodes whose name matches, in breadth-first order.

use std::io::{self, Write};

use regex::Regex;

use super::{
    visit::{breadth_first, breadth_first_mut, depth_first, depth_first_mut},
    visit::{NodeVisitor, NodeVisitorMut, WalkState},
    Node, NodeId, Tree,
};
use crate::path::{segment::compile_glob, PathError};

/// Stamps each node with its depth.
#[derive(Debug, Default, Clone, Copy)]
pub struct LevelStamp;

impl<V> NodeVisitorMut<V> for LevelStamp {
    fn visit(&mut self, _: NodeId, node: &mut Node<V>, walk: &WalkState) -> bool {
        node.level = walk.depth();
        true
    }
}

/// Stamps each node with its visit index. Run breadth-first.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndexStamp;

impl<V> NodeVisitorMut<V> for IndexStamp {
    fn visit(&mut self, _: NodeId, node: &mut Node<V>, walk: &WalkState) -> bool {
        node.index = walk.index();
        true
    }
}

/// Counts nodes with `min <= depth < max`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeCounter {
    min: usize,
    max: Option<usize>,
    count: usize,
}

impl NodeCounter {
    pub fn new(min: usize, max: Option<usize>) -> Self {
        NodeCounter { min, max, count: 0 }
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl<V> NodeVisitor<V> for NodeCounter {
    fn visit(&mut self, _: NodeId, _: &Node<V>, walk: &WalkState) -> bool {
        let depth = walk.depth();
        if self.min <= depth && self.max.is_none_or(|max| depth < max) {
            self.count += 1;
        }
        true
    }
}

/// Markers placed around the names of non-leaf nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub open: String,
    pub close: String,
}

impl Default for Decoration {
    /// Bold blue.
    fn default() -> Self {
        Decoration {
            open: "\x1b[1;34m".into(),
            close: "\x1b[0m".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintConfig {
    /// Prefix every line with `level: index: `.
    pub long: bool,
    /// Repeated once per depth; `None` prints everything flush left.
    pub indent: Option<char>,
    /// Depth window (relative to the start of the walk), `min_depth <= depth < max_depth`.
    pub min_depth: usize,
    pub max_depth: Option<usize>,
    pub decoration: Option<Decoration>,
}

impl Default for PrintConfig {
    fn default() -> Self {
        PrintConfig {
            long: false,
            indent: Some('\t'),
            min_depth: 0,
            max_depth: None,
            decoration: Some(Decoration::default()),
        }
    }
}

impl PrintConfig {
    pub fn plain(mut self) -> Self {
        self.decoration = None;
        self
    }

    fn in_window(&self, depth: usize) -> bool {
        self.min_depth <= depth && self.max_depth.is_none_or(|max| depth < max)
    }
}

/// Writes one line per visited node.
#[derive(Debug)]
pub struct PrintNode<W> {
    config: PrintConfig,
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> PrintNode<W> {
    pub fn new(out: W, config: PrintConfig) -> Self {
        PrintNode {
            config,
            out,
            error: None,
        }
    }

    /// Returns the writer, or the first error hit while printing.
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.out),
        }
    }

    fn write_node<V>(&mut self, node: &Node<V>, depth: usize) -> io::Result<()> {
        let mut line = String::new();
        match self.config.indent {
            // org mode: every heading needs at least one star and a space
            Some('*') => {
                line.extend(std::iter::repeat_n('*', depth + 1));
                line.push(' ');
            }
            Some(c) => line.extend(std::iter::repeat_n(c, depth)),
            None => {}
        }
        if self.config.long {
            line.push_str(&format!("{}: {}: ", node.level, node.index));
        }
        match &self.config.decoration {
            Some(Decoration { open, close }) if !node.is_leaf() => {
                line.push_str(&format!("{open}{}{close}", node.name))
            }
            _ => line.push_str(&node.name),
        }
        writeln!(self.out, "{line}")
    }
}

impl<V, W: Write> NodeVisitor<V> for PrintNode<W> {
    fn visit(&mut self, _: NodeId, node: &Node<V>, walk: &WalkState) -> bool {
        if self.error.is_some() {
            return false;
        }
        let depth = walk.depth();
        if !self.config.in_window(depth) {
            // above the window we keep looking for nodes inside it
            return depth < self.config.min_depth;
        }
        if let Err(e) = self.write_node(node, depth) {
            self.error = Some(e);
            return false;
        }
        true
    }
}

/// How [`FindNode`] compares names.
#[derive(Debug, Clone)]
pub enum NameMatch {
    Exact(String),
    /// Must match the whole name.
    Pattern(Regex),
}

impl NameMatch {
    /// A full-name matcher for a shell glob (`*`, `?`, `[...]`).
    pub fn glob(pattern: &str) -> Result<Self, PathError> {
        compile_glob(pattern).map(NameMatch::Pattern)
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            NameMatch::Exact(s) => s == name,
            NameMatch::Pattern(re) => re.is_match(name),
        }
    }
}

/// Collects matching nodes. Meant for breadth-first walks.
#[derive(Debug, Clone)]
pub struct FindNode {
    matcher: NameMatch,
    level: Option<usize>,
    found: Vec<NodeId>,
}

impl FindNode {
    /// `level` filters on the nodes' stored level; `None` searches every level.
    pub fn new(matcher: NameMatch, level: Option<usize>) -> Self {
        FindNode {
            matcher,
            level,
            found: Vec::new(),
        }
    }

    pub fn nodes(self) -> Vec<NodeId> {
        self.found
    }
}

impl<V> NodeVisitor<V> for FindNode {
    fn visit(&mut self, id: NodeId, node: &Node<V>, _: &WalkState) -> bool {
        if self.level.is_none_or(|l| l == node.level) && self.matcher.matches(&node.name) {
            self.found.push(id);
        }
        true
    }
}

// --- Convenience walks ---

/// Re-stamps every node's level from the root.
pub fn set_levels<V>(tree: &mut Tree<V>) {
    let root = tree.root();
    depth_first_mut(tree, root, &mut LevelStamp, None);
}

/// Stamps every node with its breadth-first index from the root.
pub fn set_indices<V>(tree: &mut Tree<V>) {
    let root = tree.root();
    breadth_first_mut(tree, root, &mut IndexStamp);
}

/// Number of nodes below `start` (inclusive) with `min <= depth < max`, depth relative to `start`.
pub fn count_nodes<V>(tree: &Tree<V>, start: NodeId, min: usize, max: Option<usize>) -> usize {
    let mut counter = NodeCounter::new(min, max);
    depth_first(tree, start, &mut counter, None);
    counter.count()
}

/// Prints the subtree at `start`.
pub fn print_tree<V, W: Write>(
    tree: &Tree<V>,
    start: NodeId,
    out: W,
    config: PrintConfig,
) -> io::Result<W> {
    let mut printer = PrintNode::new(out, config);
    depth_first(tree, start, &mut printer, None);
    printer.finish()
}

/// Breadth-first search below `start` (inclusive).
pub fn find<V>(tree: &Tree<V>, start: NodeId, matcher: NameMatch, level: Option<usize>) -> Vec<NodeId> {
    let mut finder = FindNode::new(matcher, level);
    breadth_first(tree, start, &mut finder);
    finder.nodes()
}

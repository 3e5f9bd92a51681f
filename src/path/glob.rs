//! Shell-style expansion of wildcard paths.
//!
//! A pattern is not matched against the tree level by level: paths like
//! `./../../foo/bar*` contain segments no node is named after. Instead the
//! expander follows the pattern from the starting node, and whenever a segment
//! holds wildcards it tries every matching child in turn, backtracking after
//! each one.

use std::ops::{Deref, DerefMut};

use indexmap::IndexSet;
use itertools::Itertools;
use log::{debug, trace};
use regex::Regex;

use super::{
    segment::{check_brackets, compile_glob, escape_name, Segment, Segments},
    PathError,
};
use crate::tree::{NodeId, Tree};

#[derive(Debug, Clone)]
enum Step {
    Current,
    Parent,
    Child(String),
    Match(Regex),
}

/// A validated, compiled wildcard path.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    absolute: bool,
    steps: Vec<Step>,
}

impl GlobPattern {
    /// Splits `pattern` on `delimiter` and compiles every wildcard segment.
    /// Fails before anything is walked if the pattern is malformed.
    pub fn parse(pattern: &str, delimiter: char) -> Result<Self, PathError> {
        let pattern = pattern.trim_start();
        if pattern.is_empty() {
            return Err(PathError::EmptyPath);
        }
        check_brackets(pattern)?;

        let steps = Segments::new(pattern, delimiter)
            .filter_map(|raw| match Segment::classify(raw) {
                Segment::Empty => None,
                Segment::Current => Some(Ok(Step::Current)),
                Segment::Parent => Some(Ok(Step::Parent)),
                Segment::Literal(name) => Some(Ok(Step::Child(name.into_owned()))),
                Segment::Pattern(glob) => Some(compile_glob(glob).map(Step::Match)),
            })
            .collect::<Result<_, _>>()?;

        Ok(GlobPattern {
            source: pattern.to_string(),
            absolute: pattern.starts_with(delimiter),
            steps,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// Every path from `start` that matches, in the order the tree is walked
    /// (children by ascending name). Paths are relative to the root and
    /// exclude its name; the root itself is rendered as the delimiter.
    pub fn expand<V>(&self, tree: &Tree<V>, start: NodeId) -> IndexSet<String> {
        let (node, mut stack) = if self.absolute {
            (tree.root(), Vec::new())
        } else {
            let mut stack: Vec<_> = tree.ancestors(start).collect();
            stack.pop(); // the root is never part of a rendered path
            stack.reverse();
            (start, stack)
        };

        let mut expander = Expander {
            tree,
            steps: &self.steps,
            found: IndexSet::new(),
        };
        expander.walk(node, 0, &mut stack);
        debug!("{:?} expanded to {} path(s)", self.source, expander.found.len());
        expander.found
    }
}

/// Expands `pattern` from `start`. See [`GlobPattern::expand`].
pub fn expand<V>(tree: &Tree<V>, start: NodeId, pattern: &str) -> Result<IndexSet<String>, PathError> {
    Ok(GlobPattern::parse(pattern, tree.delimiter())?.expand(tree, start))
}

/// A change to the path-so-far that is undone when the frame is dropped, so a
/// branch always hands a clean stack back to its siblings.
struct StackFrame<'s> {
    stack: &'s mut Vec<NodeId>,
    undo: Option<Undo>,
}

enum Undo {
    Pop,
    Push(NodeId),
}

impl<'s> StackFrame<'s> {
    fn push(stack: &'s mut Vec<NodeId>, id: NodeId) -> Self {
        stack.push(id);
        StackFrame {
            stack,
            undo: Some(Undo::Pop),
        }
    }

    fn pop(stack: &'s mut Vec<NodeId>) -> Self {
        let undo = stack.pop().map(Undo::Push);
        StackFrame { stack, undo }
    }
}

impl Deref for StackFrame<'_> {
    type Target = Vec<NodeId>;
    fn deref(&self) -> &Self::Target {
        self.stack
    }
}

impl DerefMut for StackFrame<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.stack
    }
}

impl Drop for StackFrame<'_> {
    fn drop(&mut self) {
        match self.undo.take() {
            Some(Undo::Pop) => {
                self.stack.pop();
            }
            Some(Undo::Push(id)) => self.stack.push(id),
            None => {}
        }
    }
}

struct Expander<'t, V> {
    tree: &'t Tree<V>,
    steps: &'t [Step],
    found: IndexSet<String>,
}

impl<V> Expander<'_, V> {
    /// `stack` holds the nodes from just below the root down to `node`.
    fn walk(&mut self, node: NodeId, step: usize, stack: &mut Vec<NodeId>) {
        let (tree, steps) = (self.tree, self.steps);

        let Some(current) = steps.get(step) else {
            self.record(stack);
            return;
        };

        match current {
            Step::Current => self.walk(node, step + 1, stack),
            Step::Parent => match tree.parent(node) {
                Some(parent) => self.walk(parent, step + 1, &mut StackFrame::pop(stack)),
                None => self.walk(node, step + 1, stack),
            },
            Step::Child(name) => match tree.child(node, name) {
                Some(child) => self.walk(child, step + 1, &mut StackFrame::push(stack, child)),
                None => trace!("no child {name:?} below node {node}"),
            },
            Step::Match(re) => {
                for (name, child) in tree[node].children() {
                    if re.is_match(name) {
                        self.walk(child, step + 1, &mut StackFrame::push(stack, child));
                    }
                }
            }
        }
    }

    fn record(&mut self, stack: &[NodeId]) {
        let delimiter = self.tree.delimiter();
        let path = if stack.is_empty() {
            delimiter.to_string()
        } else {
            stack
                .iter()
                .map(|id| escape_name(self.tree[*id].name(), delimiter))
                .join(&delimiter.to_string())
        };
        trace!("matched {path:?}");
        self.found.insert(path);
    }
}

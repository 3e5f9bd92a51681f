//! Generic depth-first and breadth-first walks.
//!
//! A walk calls a visitor once per node. The visitor decides, node by node,
//! whether the walk descends into the children; depth-first walks also call an
//! exit hook once the node's subtree is done (or skipped).
//!
//! The running depth and visit counter live in a [`WalkState`] owned by the
//! driver. Visitors get it by shared reference, so the counters a visitor reads
//! always describe the walk that is calling it.

use std::{collections::VecDeque, ops::Deref};

use log::debug;

use super::{Node, NodeId, Tree};

/// Counters maintained by a walk driver.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkState {
    depth: usize,
    index: usize,
}

impl WalkState {
    /// Depth of the node being visited, relative to the walk's start node.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of nodes visited before this one.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Operation applied to every node a walk reaches.
pub trait NodeVisitor<V> {
    /// Returns whether the walk should descend into the children of `node`.
    fn visit(&mut self, id: NodeId, node: &Node<V>, walk: &WalkState) -> bool;

    /// Called by depth-first walks after the children of `node` (or after
    /// `visit` declined to descend).
    fn exit(&mut self, _id: NodeId, _node: &Node<V>, _walk: &WalkState) -> bool {
        true
    }
}

/// Same as [`NodeVisitor`], for passes that write into the nodes.
pub trait NodeVisitorMut<V> {
    fn visit(&mut self, id: NodeId, node: &mut Node<V>, walk: &WalkState) -> bool;

    fn exit(&mut self, _id: NodeId, _node: &mut Node<V>, _walk: &WalkState) -> bool {
        true
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Event {
    Visit,
    Exit,
}

enum Step {
    Enter(NodeId, usize),
    Exit(NodeId, usize),
}

/// Pre-order walk shared by [`depth_first`] and [`depth_first_mut`]. `T` is
/// either `&Tree` or `&mut Tree`; `on` returns whether to descend on
/// [`Event::Visit`].
fn drive_depth_first<V, T>(
    mut tree: T,
    start: NodeId,
    max_depth: Option<usize>,
    mut on: impl FnMut(&mut T, Event, NodeId, &WalkState) -> bool,
) where
    T: Deref<Target = Tree<V>>,
{
    let mut walk = WalkState::default();
    let mut steps = vec![Step::Enter(start, 0)];

    while let Some(step) = steps.pop() {
        match step {
            Step::Enter(id, depth) => {
                if max_depth.is_some_and(|max| depth >= max) {
                    continue;
                }
                walk.depth = depth;
                let descend = on(&mut tree, Event::Visit, id, &walk);
                walk.index += 1;

                steps.push(Step::Exit(id, depth));
                if descend {
                    steps.extend(
                        tree.children(id)
                            .rev()
                            .map(|child| Step::Enter(child, depth + 1)),
                    );
                }
            }
            Step::Exit(id, depth) => {
                walk.depth = depth;
                if !on(&mut tree, Event::Exit, id, &walk) {
                    debug!("exit hook reported failure on node {id}");
                }
            }
        }
    }
}

/// Level-order walk shared by [`breadth_first`] and [`breadth_first_mut`].
fn drive_breadth_first<V, T>(
    mut tree: T,
    start: NodeId,
    mut on: impl FnMut(&mut T, NodeId, &WalkState) -> bool,
) where
    T: Deref<Target = Tree<V>>,
{
    let mut walk = WalkState::default();
    let mut queue = VecDeque::from([(start, 0)]);

    while let Some((id, depth)) = queue.pop_front() {
        walk.depth = depth;
        let descend = on(&mut tree, id, &walk);
        walk.index += 1;
        if descend {
            queue.extend(tree.children(id).map(|child| (child, depth + 1)));
        }
    }
}

/// Depth-first walk from `start`, bounded by `max_depth` (relative to `start`).
///
/// Every node whose depth is below the bound is visited; if the visitor asks to
/// descend, its children follow in key order. The exit hook fires for every
/// visited node, whether or not the walk descended. Nodes at or past the bound
/// get neither call.
pub fn depth_first<V>(
    tree: &Tree<V>,
    start: NodeId,
    visitor: &mut impl NodeVisitor<V>,
    max_depth: Option<usize>,
) {
    drive_depth_first(tree, start, max_depth, |t, event, id, walk| match event {
        Event::Visit => visitor.visit(id, &t[id], walk),
        Event::Exit => visitor.exit(id, &t[id], walk),
    });
}

/// Breadth-first walk from `start`. Children of a node are queued, in key order,
/// only if the visitor asked to descend. There is no exit hook.
pub fn breadth_first<V>(tree: &Tree<V>, start: NodeId, visitor: &mut impl NodeVisitor<V>) {
    drive_breadth_first(tree, start, |t, id, walk| visitor.visit(id, &t[id], walk));
}

/// [`depth_first`] for visitors that modify the nodes.
pub fn depth_first_mut<V>(
    tree: &mut Tree<V>,
    start: NodeId,
    visitor: &mut impl NodeVisitorMut<V>,
    max_depth: Option<usize>,
) {
    drive_depth_first(tree, start, max_depth, |t, event, id, walk| match event {
        Event::Visit => visitor.visit(id, &mut t[id], walk),
        Event::Exit => visitor.exit(id, &mut t[id], walk),
    });
}

/// [`breadth_first`] for visitors that modify the nodes.
pub fn breadth_first_mut<V>(
    tree: &mut Tree<V>,
    start: NodeId,
    visitor: &mut impl NodeVisitorMut<V>,
) {
    drive_breadth_first(tree, start, |t, id, walk| {
        visitor.visit(id, &mut t[id], walk)
    });
}

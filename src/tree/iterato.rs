//! Plain iterators over a [`Tree`], for callers that need no pruning or exit hooks.

use std::collections::VecDeque;

use super::{NodeId, Tree};

// --- Ancestors Iterator ---

/// An iterator that traverses upwards from a starting node to the root.
#[derive(Clone)]
pub struct AncestorsIter<'a, V> {
    tree: &'a Tree<V>,
    /// The next node ID to yield. `None` once the root has been yielded.
    current: Option<NodeId>,
}

impl<'a, V> AncestorsIter<'a, V> {
    pub fn new(tree: &'a Tree<V>, start: NodeId) -> Self {
        AncestorsIter {
            tree,
            current: Some(start),
        }
    }
}

impl<V> Iterator for AncestorsIter<'_, V> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current?;
        self.current = self.tree[node].parent;
        Some(node)
    }
}

// --- BFS Iterator ---

/// A breadth-first iterator; children are queued in key order.
#[derive(Clone)]
pub struct BfsIter<'a, V> {
    tree: &'a Tree<V>,
    queue: VecDeque<NodeId>,
}

impl<'a, V> BfsIter<'a, V> {
    pub fn new(tree: &'a Tree<V>, start: NodeId) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(start);
        BfsIter { tree, queue }
    }
}

impl<V> Iterator for BfsIter<'_, V> {
    type Item = NodeId;
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(self.tree.children(node));
        Some(node)
    }
}

#[cfg(test)]
mod test {
    use crate::tree::Tree;

    #[test]
    fn orders() {
        let tree: Tree = Tree::from_paths(["/A/A1/A23", "/A/A2", "/B/B1"], '/');
        let names = |ids: Vec<_>| -> Vec<String> {
            ids.into_iter().map(|i| tree[i].name().to_string()).collect()
        };

        assert_eq!(
            names(tree.iter_bfs(tree.root()).collect()),
            ["/", "A", "B", "A1", "A2", "B1", "A23"]
        );

        let a23 = tree.find_leftmost(tree.root(), 3).unwrap();
        assert_eq!(names(tree.ancestors(a23).collect()), ["A23", "A1", "A", "/"]);
    }
}

use crate::avl_tree::node::NodeId;
use crate::avl_tree::tree::AvlTree;
use std::collections::VecDeque;

/// An iterator for `AvlTree<T, C>`.
///
/// This iterator traverses the keys of a tree or subtree in-order and yields immutable
/// references.
pub struct Iter<'a, T, C>
where
    T: 'a,
    C: 'a,
{
    tree: &'a AvlTree<T, C>,
    stack: Vec<NodeId>,
}

impl<'a, T, C> Iter<'a, T, C> {
    pub(crate) fn new(tree: &'a AvlTree<T, C>, start: Option<NodeId>) -> Self {
        let mut ret = Iter {
            tree,
            stack: Vec::new(),
        };
        ret.push_left_spine(start);
        ret
    }

    fn push_left_spine(&mut self, mut curr: Option<NodeId>) {
        while let Some(id) = curr {
            self.stack.push(id);
            curr = self.tree.raw(id).left;
        }
    }
}

impl<'a, T, C> Iterator for Iter<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.raw(id);
        self.push_left_spine(node.right);
        Some(&node.key)
    }
}

/// A breadth-first iterator for `AvlTree<T, C>`.
///
/// Yields `(depth, key)` pairs level by level, left to right within a level, using a FIFO queue.
pub struct LevelOrder<'a, T, C>
where
    T: 'a,
    C: 'a,
{
    tree: &'a AvlTree<T, C>,
    queue: VecDeque<(usize, NodeId)>,
}

impl<'a, T, C> LevelOrder<'a, T, C> {
    pub(crate) fn new(tree: &'a AvlTree<T, C>, start: Option<(usize, NodeId)>) -> Self {
        LevelOrder {
            tree,
            queue: start.into_iter().collect(),
        }
    }
}

impl<'a, T, C> Iterator for LevelOrder<'a, T, C> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, id) = self.queue.pop_front()?;
        let node = self.tree.raw(id);
        if let Some(left) = node.left {
            self.queue.push_back((depth + 1, left));
        }
        if let Some(right) = node.right {
            self.queue.push_back((depth + 1, right));
        }
        Some((depth, &node.key))
    }
}

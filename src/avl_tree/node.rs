use crate::arena::Entry;
use crate::avl_tree::tree::AvlTree;
use crate::avl_tree::traversal::{Iter, LevelOrder};
use crate::avl_tree::{Compare, Error, Result};
use std::cmp::{self, Ordering};
use std::fmt::{self, Display, Write};

/// A handle to a node of an `AvlTree`.
///
/// Handles stay valid while the node is alive, including when deletion relocates the node to
/// another position in the tree. A handle to a deleted node is stale and resolves to nothing.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NodeId(pub(crate) Entry);

/// A struct representing an internal node of an avl tree.
pub(crate) struct Node<T> {
    pub key: T,
    pub height: usize,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub parent: Option<NodeId>,
}

impl<T> Node<T> {
    pub fn new(key: T, parent: Option<NodeId>) -> Self {
        Node {
            key,
            height: 0,
            left: None,
            right: None,
            parent,
        }
    }
}

/// A borrowed view of a single node, doubling as a handle to the subtree rooted at it.
///
/// # Examples
/// ```
/// use avl_collections::avl_tree::AvlTree;
///
/// let mut tree = AvlTree::new();
/// tree.extend(vec![20, 10, 30]);
///
/// let root = tree.root().unwrap();
/// assert_eq!(root.key(), &20);
/// assert_eq!(root.left().map(|node| *node.key()), Some(10));
/// assert!(root.left().unwrap().is_left_child());
/// assert_eq!(root.find(&30).unwrap().depth(), 1);
/// ```
pub struct NodeRef<'a, T, C> {
    pub(crate) tree: &'a AvlTree<T, C>,
    pub(crate) id: NodeId,
}

impl<'a, T, C> Clone for NodeRef<'a, T, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T, C> Copy for NodeRef<'a, T, C> {}

impl<'a, T, C> PartialEq for NodeRef<'a, T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.tree, other.tree)
    }
}

impl<'a, T, C> fmt::Debug for NodeRef<'a, T, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("key", self.key())
            .finish()
    }
}

impl<'a, T, C> NodeRef<'a, T, C> {
    fn node(&self) -> &'a Node<T> {
        self.tree.raw(self.id)
    }

    fn at(&self, id: NodeId) -> Self {
        NodeRef {
            tree: self.tree,
            id,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn key(&self) -> &'a T {
        &self.node().key
    }

    pub fn left(&self) -> Option<Self> {
        self.node().left.map(|id| self.at(id))
    }

    pub fn right(&self) -> Option<Self> {
        self.node().right.map(|id| self.at(id))
    }

    pub fn parent(&self) -> Option<Self> {
        self.node().parent.map(|id| self.at(id))
    }

    pub fn has_left(&self) -> bool {
        self.node().left.is_some()
    }

    pub fn has_right(&self) -> bool {
        self.node().right.is_some()
    }

    /// Returns `true` if the node has neither a left nor a right child.
    pub fn is_leaf(&self) -> bool {
        !self.has_left() && !self.has_right()
    }

    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    pub fn has_parent(&self) -> bool {
        self.node().parent.is_some()
    }

    pub fn is_left_child(&self) -> bool {
        self.parent()
            .map_or(false, |parent| parent.node().left == Some(self.id))
    }

    pub fn is_right_child(&self) -> bool {
        self.parent()
            .map_or(false, |parent| parent.node().right == Some(self.id))
    }

    /// Returns the node with the minimum key in this subtree.
    pub fn find_min(&self) -> Self {
        let mut curr = *self;
        while let Some(left) = curr.left() {
            curr = left;
        }
        curr
    }

    /// Returns the node with the maximum key in this subtree.
    pub fn find_max(&self) -> Self {
        let mut curr = *self;
        while let Some(right) = curr.right() {
            curr = right;
        }
        curr
    }

    /// Returns the node that replaces this one when it is deleted: the minimum of the right
    /// subtree, or the maximum of the left subtree if there is no right child.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoSuccessor` if the node has no children.
    pub fn find_successor(&self) -> Result<Self> {
        match (self.left(), self.right()) {
            (_, Some(right)) => Ok(right.find_min()),
            (Some(left), None) => Ok(left.find_max()),
            (None, None) => Err(Error::NoSuccessor),
        }
    }

    /// Returns the root of the tree this node belongs to.
    pub fn root(&self) -> Self {
        let mut curr = *self;
        while let Some(parent) = curr.parent() {
            curr = parent;
        }
        curr
    }

    /// Returns the height of this subtree. A leaf has height zero.
    pub fn height(&self) -> usize {
        self.node().height
    }

    /// Returns `height(left) - height(right)`, where a missing child has height `-1`.
    pub fn balance_factor(&self) -> i32 {
        self.tree.balance_factor_of(self.id)
    }

    /// Returns the number of edges between this node and the root.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut curr = *self;
        while let Some(parent) = curr.parent() {
            depth += 1;
            curr = parent;
        }
        depth
    }

    /// Returns the number of keys in this subtree.
    pub fn size(&self) -> usize {
        let mut size = 0;
        let mut stack = vec![self.id];
        while let Some(id) = stack.pop() {
            let node = self.tree.raw(id);
            size += 1;
            stack.extend(node.left);
            stack.extend(node.right);
        }
        size
    }

    /// Returns an iterator over the keys of this subtree in ascending order.
    pub fn iter(&self) -> Iter<'a, T, C> {
        Iter::new(self.tree, Some(self.id))
    }

    /// Returns the keys of this subtree in postorder: left subtree, right subtree, node.
    pub fn postorder_keys(&self) -> Vec<&'a T> {
        // Reversed (node, right, left) preorder is postorder.
        let mut keys = Vec::new();
        let mut stack = vec![self.id];
        while let Some(id) = stack.pop() {
            let node = self.tree.raw(id);
            keys.push(&node.key);
            stack.extend(node.left);
            stack.extend(node.right);
        }
        keys.reverse();
        keys
    }

    /// Returns the postorder keys of this subtree concatenated without separators.
    pub fn postorder(&self) -> String
    where
        T: Display,
    {
        let mut ret = String::new();
        for key in self.postorder_keys() {
            // Writing into a `String` cannot fail.
            let _ = write!(ret, "{}", key);
        }
        ret
    }

    /// Returns a breadth-first iterator over this subtree yielding each node's depth in the whole
    /// tree together with its key.
    pub fn level_order(&self) -> LevelOrder<'a, T, C> {
        LevelOrder::new(self.tree, Some((self.depth(), self.id)))
    }
}

impl<'a, T, C> NodeRef<'a, T, C>
where
    C: Compare<T>,
{
    /// Searches this subtree for `key`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if no node in the subtree holds `key`.
    pub fn find(&self, key: &T) -> Result<Self> {
        let mut curr = *self;
        loop {
            let next = match self.tree.cmp.compare(key, curr.key()) {
                Ordering::Equal => return Ok(curr),
                Ordering::Less => curr.left(),
                Ordering::Greater => curr.right(),
            };
            curr = next.ok_or(Error::NotFound)?;
        }
    }
}

pub(crate) fn max_height(left: Option<usize>, right: Option<usize>) -> usize {
    match (left, right) {
        (None, None) => 0,
        (Some(h), None) | (None, Some(h)) => h + 1,
        (Some(l), Some(r)) => cmp::max(l, r) + 1,
    }
}

#[cfg(test)]
mod tests {
    use crate::avl_tree::{AvlTree, Error};

    fn tree() -> AvlTree<u32> {
        let mut tree = AvlTree::new();
        tree.extend(vec![20, 10, 30, 5]);
        tree
    }

    #[test]
    fn test_predicates() {
        let tree = tree();
        let root = tree.root().unwrap();
        assert!(root.is_root());
        assert!(!root.has_parent());
        assert!(root.has_left() && root.has_right());
        assert!(!root.is_leaf());

        let ten = root.find(&10).unwrap();
        assert!(ten.is_left_child());
        assert!(!ten.is_right_child());
        assert!(!ten.is_leaf());

        let five = root.find(&5).unwrap();
        assert!(five.is_leaf());
        assert_eq!(five.parent(), Some(ten));

        let thirty = root.find(&30).unwrap();
        assert!(thirty.is_right_child());
        assert!(thirty.is_leaf());
    }

    #[test]
    fn test_navigation() {
        let tree = tree();
        let root = tree.root().unwrap();
        assert_eq!(root.find_min().key(), &5);
        assert_eq!(root.find_max().key(), &30);
        assert_eq!(root.find_successor().unwrap().key(), &30);

        let ten = root.find(&10).unwrap();
        assert_eq!(ten.find_successor().unwrap().key(), &5);
        assert_eq!(ten.root(), root);

        let five = root.find(&5).unwrap();
        assert_eq!(five.find_successor().unwrap_err(), Error::NoSuccessor);
        assert_eq!(five.root(), root);
    }

    #[test]
    fn test_find_from_subtree() {
        let tree = tree();
        let ten = tree.search(&10).unwrap();
        assert_eq!(ten.find(&5).unwrap().key(), &5);
        assert_eq!(ten.find(&30).unwrap_err(), Error::NotFound);
    }

    #[test]
    fn test_introspection() {
        let tree = tree();
        let root = tree.root().unwrap();
        assert_eq!(root.height(), 2);
        assert_eq!(root.balance_factor(), 1);
        assert_eq!(root.size(), 4);
        assert_eq!(root.depth(), 0);

        let ten = root.find(&10).unwrap();
        assert_eq!(ten.height(), 1);
        assert_eq!(ten.balance_factor(), 1);
        assert_eq!(ten.size(), 2);
        assert_eq!(ten.find(&5).unwrap().depth(), 2);
    }

    #[test]
    fn test_subtree_traversals() {
        let tree = tree();
        let ten = tree.search(&10).unwrap();
        assert_eq!(ten.postorder(), "510");
        assert_eq!(ten.iter().collect::<Vec<&u32>>(), vec![&5, &10]);
        assert_eq!(
            ten.level_order().collect::<Vec<(usize, &u32)>>(),
            vec![(1, &10), (2, &5)],
        );
    }
}

use crate::arena::TypedArena;
use crate::avl_tree::node::{self, Node, NodeId, NodeRef};
use crate::avl_tree::traversal::{Iter, LevelOrder};
use crate::avl_tree::{Compare, Config, Error, Natural, Result};
use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::iter::FromIterator;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Root {
    Empty,
    Occupied(NodeId),
}

impl Root {
    fn id(self) -> Option<NodeId> {
        match self {
            Root::Empty => None,
            Root::Occupied(id) => Some(id),
        }
    }
}

impl From<Option<NodeId>> for Root {
    fn from(id: Option<NodeId>) -> Self {
        id.map_or(Root::Empty, Root::Occupied)
    }
}

/// An ordered set of keys implemented using an avl tree.
///
/// An avl tree is a self-balancing binary search tree that maintains the invariant that the
/// heights of two child subtrees of any node differ by at most one. Nodes live in an arena and
/// keep a link to their parent, so any node can be inspected as the root of its own subtree
/// through a [`NodeRef`].
///
/// Deleting a node with children relocates its successor node into the vacated position. The
/// successor keeps its `NodeId`, while the `NodeId` of the deleted node becomes stale.
///
/// # Examples
/// ```
/// use avl_collections::avl_tree::{AvlTree, Error};
///
/// let mut tree = AvlTree::new();
/// tree.insert(10).unwrap();
/// tree.insert(20).unwrap();
/// tree.insert(30).unwrap();
///
/// let root = tree.root().unwrap();
/// assert_eq!(root.key(), &20);
/// assert_eq!(tree.insert(20), Err(Error::DuplicateKey));
///
/// tree.delete(&20).unwrap();
/// assert_eq!(tree.len(), 2);
/// assert_eq!(tree.delete(&99), Err(Error::NotFound));
/// ```
pub struct AvlTree<T, C = Natural> {
    arena: TypedArena<Node<T>>,
    root: Root,
    len: usize,
    config: Config,
    pub(crate) cmp: C,
}

impl<T> AvlTree<T, Natural>
where
    T: Ord,
{
    /// Constructs a new, empty `AvlTree<T>` ordered by `T`'s `Ord` implementation.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Constructs a new, empty `AvlTree<T>` with specific settings.
    pub fn with_config(config: Config) -> Self {
        Self::with_config_and_comparator(config, Natural)
    }
}

impl<T, C> AvlTree<T, C> {
    /// Constructs a new, empty tree ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_config_and_comparator(Config::default(), cmp)
    }

    /// Constructs a new, empty tree with specific settings, ordered by `cmp`.
    pub fn with_config_and_comparator(config: Config, cmp: C) -> Self {
        AvlTree {
            arena: TypedArena::new(config.chunk_size),
            root: Root::Empty,
            len: 0,
            config,
            cmp,
        }
    }

    pub(crate) fn raw(&self, id: NodeId) -> &Node<T> {
        &self.arena[id.0]
    }

    fn raw_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.arena[id.0]
    }

    fn height_of(&self, id: Option<NodeId>) -> Option<usize> {
        id.map(|id| self.raw(id).height)
    }

    pub(crate) fn balance_factor_of(&self, id: NodeId) -> i32 {
        let node = self.raw(id);
        let height = |child: Option<NodeId>| self.height_of(child).map_or(-1, |h| h as i32);
        height(node.left) - height(node.right)
    }

    /// Recomputes the cached height of a node from its children. Returns `true` if it changed.
    fn update(&mut self, id: NodeId) -> bool {
        let (left, right) = {
            let node = self.raw(id);
            (node.left, node.right)
        };
        let height = node::max_height(self.height_of(left), self.height_of(right));
        let node = self.raw_mut(id);
        let changed = node.height != height;
        node.height = height;
        changed
    }

    fn set_parent(&mut self, child: Option<NodeId>, parent: Option<NodeId>) {
        if let Some(child) = child {
            self.raw_mut(child).parent = parent;
        }
    }

    /// Points whichever slot of `parent` holds `old` at `new`. Without a parent, `new` becomes the
    /// root.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = Root::from(new),
            Some(parent) => {
                let node = self.raw_mut(parent);
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    node.right = new;
                }
            },
        }
    }

    fn validate(&self, id: NodeId) -> Result<()> {
        if self.arena.contains(&id.0) {
            Ok(())
        } else {
            Err(Error::InvalidHandle)
        }
    }

    fn rotate_left_unchecked(&mut self, id: NodeId) -> Result<NodeId> {
        let right = self.raw(id).right.ok_or(Error::MissingChild)?;
        let parent = self.raw(id).parent;
        let right_left = self.raw(right).left;
        trace!("rotating {:?} left", id);

        self.raw_mut(id).right = right_left;
        self.set_parent(right_left, Some(id));
        self.raw_mut(right).left = Some(id);
        self.raw_mut(id).parent = Some(right);
        self.replace_child(parent, id, Some(right));
        self.raw_mut(right).parent = parent;

        self.update(id);
        self.update(right);
        Ok(right)
    }

    fn rotate_right_unchecked(&mut self, id: NodeId) -> Result<NodeId> {
        let left = self.raw(id).left.ok_or(Error::MissingChild)?;
        let parent = self.raw(id).parent;
        let left_right = self.raw(left).right;
        trace!("rotating {:?} right", id);

        self.raw_mut(id).left = left_right;
        self.set_parent(left_right, Some(id));
        self.raw_mut(left).right = Some(id);
        self.raw_mut(id).parent = Some(left);
        self.replace_child(parent, id, Some(left));
        self.raw_mut(left).parent = parent;

        self.update(id);
        self.update(left);
        Ok(left)
    }

    fn balance_unchecked(&mut self, id: NodeId) -> Result<NodeId> {
        let balance_factor = self.balance_factor_of(id);
        if balance_factor < 0 {
            let right = self.raw(id).right.ok_or(Error::MissingChild)?;
            if self.balance_factor_of(right) > 0 {
                trace!("right-left case at {:?}", id);
                self.rotate_right_unchecked(right)?;
            } else {
                trace!("right-right case at {:?}", id);
            }
            self.rotate_left_unchecked(id)
        } else if balance_factor > 0 {
            let left = self.raw(id).left.ok_or(Error::MissingChild)?;
            if self.balance_factor_of(left) < 0 {
                trace!("left-right case at {:?}", id);
                self.rotate_left_unchecked(left)?;
            } else {
                trace!("left-left case at {:?}", id);
            }
            self.rotate_right_unchecked(id)
        } else {
            Ok(id)
        }
    }

    /// Refreshes cached heights from `start` up to the root, stopping once a height is unchanged.
    fn refresh_heights(&mut self, mut curr: Option<NodeId>) {
        while let Some(id) = curr {
            if !self.update(id) {
                break;
            }
            curr = self.raw(id).parent;
        }
    }

    // Walks up from the parent of a freshly attached leaf. The first unbalanced node is fixed by a
    // single or double rotation. In a balanced tree that restores the subtree's height from before
    // the insertion, so the refresh above it stops after one step.
    fn rebalance_after_insert(&mut self, start: NodeId) -> Result<()> {
        let mut curr = Some(start);
        while let Some(id) = curr {
            let changed = self.update(id);
            if self.balance_factor_of(id).abs() >= 2 {
                let top = self.balance_unchecked(id)?;
                let parent = self.raw(top).parent;
                self.refresh_heights(parent);
                return Ok(());
            }
            if !changed {
                return Ok(());
            }
            curr = self.raw(id).parent;
        }
        Ok(())
    }

    fn rebalance_after_delete(&mut self, start: Option<NodeId>) -> Result<()> {
        let mut curr = start;
        while let Some(id) = curr {
            self.update(id);
            let mut top = id;
            if self.config.rebalance_on_delete && self.balance_factor_of(id).abs() >= 2 {
                top = self.balance_unchecked(id)?;
            }
            curr = self.raw(top).parent;
        }
        Ok(())
    }

    /// Returns the settings the tree was constructed with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root == Root::Empty
    }

    /// Removes every key from the tree. All outstanding `NodeId`s become stale.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = Root::Empty;
        self.len = 0;
    }

    /// Returns a handle to the root node, or `None` if the tree is empty.
    pub fn root(&self) -> Option<NodeRef<T, C>> {
        self.root_id().map(|id| NodeRef { tree: self, id })
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.root.id()
    }

    /// Resolves a `NodeId`. Returns `None` if the node has been deleted.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<T, C>> {
        if self.arena.contains(&id.0) {
            Some(NodeRef { tree: self, id })
        } else {
            None
        }
    }

    /// Populates an empty tree with its first key and returns the new root.
    ///
    /// # Errors
    ///
    /// Returns `Error::RootAlreadyExists` if the tree already holds a key.
    pub fn add_root(&mut self, key: T) -> Result<NodeId> {
        if let Root::Occupied(_) = self.root {
            return Err(Error::RootAlreadyExists);
        }
        let id = NodeId(self.arena.allocate(Node::new(key, None)));
        self.root = Root::Occupied(id);
        self.len = 1;
        debug!("added root {:?}", id);
        Ok(id)
    }

    /// Rotates the subtree rooted at `id` to the left, promoting its right child, and returns the
    /// new subtree root. The in-order sequence of keys is unchanged, but the tree may be left
    /// unbalanced.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidHandle` for a stale handle and `Error::MissingChild` if the node has
    /// no right child.
    pub fn rotate_left(&mut self, id: NodeId) -> Result<NodeId> {
        self.validate(id)?;
        let ret = self.rotate_left_unchecked(id)?;
        let parent = self.raw(ret).parent;
        self.refresh_heights(parent);
        Ok(ret)
    }

    /// Rotates the subtree rooted at `id` to the right, promoting its left child, and returns the
    /// new subtree root.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidHandle` for a stale handle and `Error::MissingChild` if the node has
    /// no left child.
    pub fn rotate_right(&mut self, id: NodeId) -> Result<NodeId> {
        self.validate(id)?;
        let ret = self.rotate_right_unchecked(id)?;
        let parent = self.raw(ret).parent;
        self.refresh_heights(parent);
        Ok(ret)
    }

    /// Rotates the subtree rooted at `id` towards its lighter side and returns the new subtree
    /// root. A right-heavy node whose right child leans left gets a right-left double rotation,
    /// and symmetrically for left-heavy nodes. A node with balance factor zero is left alone.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidHandle` for a stale handle.
    pub fn balance(&mut self, id: NodeId) -> Result<NodeId> {
        self.validate(id)?;
        let ret = self.balance_unchecked(id)?;
        let parent = self.raw(ret).parent;
        self.refresh_heights(parent);
        Ok(ret)
    }

    /// Returns the height of the tree. Both an empty tree and a single key have height zero.
    pub fn height(&self) -> usize {
        self.root().map_or(0, |root| root.height())
    }

    /// Counts the keys of the tree by walking it.
    pub fn size(&self) -> usize {
        self.root().map_or(0, |root| root.size())
    }

    /// Returns the minimum key of the tree. Returns `None` if the tree is empty.
    pub fn min(&self) -> Option<&T> {
        self.root().map(|root| root.find_min().key())
    }

    /// Returns the maximum key of the tree. Returns `None` if the tree is empty.
    pub fn max(&self) -> Option<&T> {
        self.root().map(|root| root.find_max().key())
    }

    /// Returns an iterator over the tree. The iterator will yield keys using in-order traversal.
    pub fn iter(&self) -> Iter<T, C> {
        Iter::new(self, self.root_id())
    }

    /// Returns the keys of the tree in postorder.
    pub fn postorder_keys(&self) -> Vec<&T> {
        self.root().map_or_else(Vec::new, |root| root.postorder_keys())
    }

    /// Returns the postorder keys of the tree concatenated without separators.
    pub fn postorder(&self) -> String
    where
        T: Display,
    {
        self.root().map_or_else(String::new, |root| root.postorder())
    }

    /// Returns a breadth-first iterator over `(depth, key)` pairs.
    pub fn level_order(&self) -> LevelOrder<T, C> {
        LevelOrder::new(self, self.root_id().map(|id| (0, id)))
    }

    /// Visits every key breadth-first, passing its depth along.
    pub fn for_each_level<F>(&self, mut visit: F)
    where
        F: FnMut(usize, &T),
    {
        for (depth, key) in self.level_order() {
            visit(depth, key);
        }
    }
}

impl<T, C> AvlTree<T, C>
where
    C: Compare<T>,
{
    /// Returns the `NodeId` of the node holding `key`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the key is not in the tree.
    pub fn find(&self, key: &T) -> Result<NodeId> {
        let root = self.root().ok_or(Error::NotFound)?;
        root.find(key).map(|node| node.id())
    }

    /// Returns a handle to the node holding `key`, or `None` if the key is not in the tree.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1).unwrap();
    /// assert_eq!(tree.search(&1).map(|node| *node.key()), Some(1));
    /// assert!(tree.search(&99).is_none());
    /// ```
    pub fn search(&self, key: &T) -> Option<NodeRef<T, C>> {
        self.root().and_then(|root| root.find(key).ok())
    }

    /// Checks if a key exists in the tree.
    pub fn contains(&self, key: &T) -> bool {
        self.find(key).is_ok()
    }

    /// Inserts a key and rebalances the tree. Returns the root afterwards.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateKey` if the key is already in the tree. The tree is unchanged.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::{AvlTree, Error};
    ///
    /// let mut tree = AvlTree::new();
    /// let root = tree.insert(1).unwrap();
    /// assert_eq!(tree.node(root).map(|node| *node.key()), Some(1));
    /// assert_eq!(tree.insert(1), Err(Error::DuplicateKey));
    /// ```
    pub fn insert(&mut self, key: T) -> Result<NodeId> {
        let mut curr = match self.root {
            Root::Empty => return self.add_root(key),
            Root::Occupied(root) => root,
        };

        let (parent, ordering) = loop {
            let ordering = self.cmp.compare(&key, &self.raw(curr).key);
            let next = match ordering {
                Ordering::Less => self.raw(curr).left,
                Ordering::Greater => self.raw(curr).right,
                Ordering::Equal => return Err(Error::DuplicateKey),
            };
            match next {
                Some(next) => curr = next,
                None => break (curr, ordering),
            }
        };

        let id = NodeId(self.arena.allocate(Node::new(key, Some(parent))));
        if ordering == Ordering::Less {
            self.raw_mut(parent).left = Some(id);
        } else {
            self.raw_mut(parent).right = Some(id);
        }
        self.len += 1;
        debug!("inserted {:?} under {:?}", id, parent);

        self.rebalance_after_insert(parent)?;
        self.root_id().ok_or(Error::InvalidHandle)
    }

    /// Deletes a key from the tree. Returns the root afterwards, or `None` if the tree became
    /// empty.
    ///
    /// A node with children is replaced by its successor node (see
    /// [`NodeRef::find_successor`]), which moves into the deleted node's position and keeps its
    /// `NodeId`. Unless `Config::rebalance_on_delete` is disabled, the ancestors of the changed
    /// position are rebalanced afterwards.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the key is not in the tree. The tree is unchanged.
    pub fn delete(&mut self, key: &T) -> Result<Option<NodeId>> {
        let target = self.find(key)?;
        let (parent, left, right) = {
            let node = self.raw(target);
            (node.parent, node.left, node.right)
        };

        let rebalance_start = if left.is_none() && right.is_none() {
            self.replace_child(parent, target, None);
            parent
        } else {
            let successor = NodeRef { tree: &*self, id: target }.find_successor()?.id();
            let (successor_parent, successor_child) = {
                let node = self.raw(successor);
                (node.parent, node.left.or(node.right))
            };

            // Splice the successor out of its old position, keeping its only child.
            let (new_left, new_right, start) = if successor_parent == Some(target) {
                let new_left = if left == Some(successor) { successor_child } else { left };
                let new_right = if right == Some(successor) { successor_child } else { right };
                (new_left, new_right, successor)
            } else {
                self.replace_child(successor_parent, successor, successor_child);
                self.set_parent(successor_child, successor_parent);
                (left, right, successor_parent.ok_or(Error::InvalidHandle)?)
            };

            {
                let node = self.raw_mut(successor);
                node.left = new_left;
                node.right = new_right;
                node.parent = parent;
            }
            self.set_parent(new_left, Some(successor));
            self.set_parent(new_right, Some(successor));
            self.replace_child(parent, target, Some(successor));
            Some(start)
        };

        self.arena.free(&target.0);
        self.len -= 1;
        debug!("deleted {:?}", target);

        self.rebalance_after_delete(rebalance_start)?;
        Ok(self.root_id())
    }

    /// Returns a key in the tree that is less than or equal to a particular key. Returns `None` if
    /// such a key does not exist.
    pub fn floor(&self, key: &T) -> Option<&T> {
        let mut curr = self.root_id();
        let mut ret = None;
        while let Some(id) = curr {
            let node = self.raw(id);
            match self.cmp.compare(key, &node.key) {
                Ordering::Equal => return Some(&node.key),
                Ordering::Less => curr = node.left,
                Ordering::Greater => {
                    ret = Some(&node.key);
                    curr = node.right;
                },
            }
        }
        ret
    }

    /// Returns a key in the tree that is greater than or equal to a particular key. Returns `None`
    /// if such a key does not exist.
    pub fn ceil(&self, key: &T) -> Option<&T> {
        let mut curr = self.root_id();
        let mut ret = None;
        while let Some(id) = curr {
            let node = self.raw(id);
            match self.cmp.compare(key, &node.key) {
                Ordering::Equal => return Some(&node.key),
                Ordering::Greater => curr = node.right,
                Ordering::Less => {
                    ret = Some(&node.key);
                    curr = node.left;
                },
            }
        }
        ret
    }
}

impl<T, C> fmt::Debug for AvlTree<T, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T, C> IntoIterator for &'a AvlTree<T, C>
where
    T: 'a,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C> Extend<T> for AvlTree<T, C>
where
    C: Compare<T>,
{
    /// Inserts every key, skipping keys that are already present.
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for key in iter {
            if self.insert(key).is_err() {
                trace!("skipped duplicate key");
            }
        }
    }
}

impl<T, C> FromIterator<T> for AvlTree<T, C>
where
    C: Compare<T> + Default,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut ret = Self::with_comparator(C::default());
        ret.extend(iter);
        ret
    }
}

impl<T> Default for AvlTree<T, Natural>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

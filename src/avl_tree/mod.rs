//! Self-balancing binary search tree where the heights of the two child subtrees of any node
//! differ by at most one.
//!
//! Nodes are stored in a [`TypedArena`](crate::arena::TypedArena) and linked by [`NodeId`]
//! handles. Every node keeps a non-owning link to its parent, so a [`NodeRef`] to any node is also
//! a handle to the subtree rooted at it and, through [`NodeRef::root`], to the whole tree.

mod compare;
mod config;
mod node;
mod traversal;
mod tree;

pub use self::compare::{Compare, Natural};
pub use self::config::Config;
pub use self::node::{NodeId, NodeRef};
pub use self::traversal::{Iter, LevelOrder};
pub use self::tree::AvlTree;

use std::error;
use std::fmt;
use std::result;

/// Convenience `Error` enum for `avl_tree`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// The key is already present in the tree.
    DuplicateKey,
    /// The key is not present in the tree.
    NotFound,
    /// A successor was requested for a node without children.
    NoSuccessor,
    /// A root was added to a tree that is not empty.
    RootAlreadyExists,
    /// A rotation was requested on a node that lacks the child it would promote.
    MissingChild,
    /// The handle refers to a node that was deleted or never belonged to this tree.
    InvalidHandle,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let message = match self {
            Error::DuplicateKey => "key is already in the tree",
            Error::NotFound => "key is not in the tree",
            Error::NoSuccessor => "node has no children and therefore no successor",
            Error::RootAlreadyExists => "a root already exists",
            Error::MissingChild => "node has no child to rotate into its position",
            Error::InvalidHandle => "handle does not refer to a live node",
        };
        write!(f, "{}", message)
    }
}

/// Convenience `Result` type for `avl_tree`.
pub type Result<T> = result::Result<T, Error>;

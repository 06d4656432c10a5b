//! An arena-backed AVL tree whose nodes double as handles to their subtrees.
//!
//! # Examples
//! ```
//! use avl_collections::avl_tree::AvlTree;
//!
//! let mut tree = AvlTree::new();
//! for key in vec![30, 10, 20] {
//!     tree.insert(key).unwrap();
//! }
//!
//! let root = tree.root().unwrap();
//! assert_eq!(root.key(), &20);
//! assert_eq!(tree.postorder(), "103020");
//! assert_eq!(
//!     tree.level_order().collect::<Vec<(usize, &u32)>>(),
//!     vec![(0, &20), (1, &10), (1, &30)],
//! );
//! ```

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod arena;
pub mod avl_tree;

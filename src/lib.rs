//! An AVL tree whose nodes live in an arena and carry parent links.
//!
//! The tree keeps keys in order (duplicates allowed), supports lookup, insertion
//! and removal in `O(log n)`, and restores its balance after every change by rotation.
//! Parent links give [`Cursor`]s that step forwards and backwards in amortized `O(1)`.
//!
//!```
//! use avl_arena::AvlTree;
//!
//! let mut tree = AvlTree::new();
//! for key in [23, -43, 0, 234, 78] {
//!     tree.insert(key);
//! }
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![-43, 0, 23, 78, 234]);
//!
//! assert!(tree.erase(&23));
//! assert!(tree.erase(&78));
//! assert!(!tree.erase(&34));
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![-43, 0, 234]);
//!```
//!
//! The tree is a plain single-owner structure with no internal synchronization.

pub mod avl;
pub mod error;
pub mod traversal;

pub use avl::{AvlTree, Cursor, Iter, NodeId};
pub use error::{Error, Result};

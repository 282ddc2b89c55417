//! Cursors and iterators over an [`AvlTree`].
//!
//! A cursor is either at a node or past the end. Stepping follows parent links,
//! so a full traversal touches every edge twice and costs `O(n)` in total,
//! while a single step is `O(log n)` in the worst case.
//!
//! A cursor borrows the tree, so the tree cannot be modified while a cursor is alive.
//! To keep a position across modifications, keep its [`NodeId`] and call
//! [`AvlTree::cursor_at`] afterwards.

use super::{descend, AvlTree, NodeId, Side};
use crate::{Error, Result};

/// A position in an [`AvlTree`]: a node, or past the end.
///
///```
/// use avl_arena::{AvlTree, Error};
///
/// let tree: AvlTree<i32> = (1..=3).collect();
/// let mut cursor = tree.begin();
/// assert_eq!(cursor.step_backward(), Err(Error::BeforeBegin));
/// cursor.step_forward().unwrap();
/// assert_eq!(cursor.get(), Ok(&2));
///
/// let mut cursor = tree.end();
/// assert_eq!(cursor.get(), Err(Error::PastTheEnd));
/// cursor.step_backward().unwrap();
/// assert_eq!(cursor.get(), Ok(&3));
///```
pub struct Cursor<'a, K> {
    tree: &'a AvlTree<K>,
    current: Option<NodeId>,
}

// the derived implementations would require `K: Clone`
impl<'a, K> Clone for Cursor<'a, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K> Copy for Cursor<'a, K> {}

impl<'a, K> PartialEq for Cursor<'a, K> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.current == other.current
    }
}

impl<'a, K> Eq for Cursor<'a, K> {}

impl<'a, K> std::fmt::Debug for Cursor<'a, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor").field("current", &self.current).finish()
    }
}

impl<'a, K> Cursor<'a, K> {
    /// Returns true if the cursor is past the end.
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// The node the cursor is at, or `None` past the end.
    pub fn node(&self) -> Option<NodeId> {
        self.current
    }

    /// The key at the cursor. Fails past the end.
    pub fn get(&self) -> Result<&'a K> {
        self.key().ok_or(Error::PastTheEnd)
    }

    /// The key at the cursor, or `None` past the end.
    pub fn key(&self) -> Option<&'a K> {
        let tree = self.tree;
        self.current.map(|id| &tree.node(id).key)
    }

    /// Moves to the next key in order, or past the end after the last one.
    /// Fails if already past the end.
    pub fn step_forward(&mut self) -> Result<()> {
        let id = self.current.ok_or(Error::PastTheEnd)?;
        self.current = neighbor(self.tree, id, Side::Right);
        Ok(())
    }

    /// Moves to the previous key in order. From past the end, moves to the last key,
    /// or stays put if the tree is empty. Fails at the first key, leaving the cursor there.
    pub fn step_backward(&mut self) -> Result<()> {
        match self.current {
            None => {
                let tree = self.tree;
                self.current = tree.root.map(|root| descend(tree, root, Side::Right));
                Ok(())
            }
            Some(id) => {
                let prev = neighbor(self.tree, id, Side::Left).ok_or(Error::BeforeBegin)?;
                self.current = Some(prev);
                Ok(())
            }
        }
    }
}

/// The next node in order on `side`: `Side::Right` for the successor,
/// `Side::Left` for the predecessor.
fn neighbor<K>(tree: &AvlTree<K>, id: NodeId, side: Side) -> Option<NodeId> {
    if let Some(child) = tree.node(id).child(side) {
        return Some(descend(tree, child, side.flip()));
    }
    let mut current = id;
    while let Some(parent) = tree.node(current).parent {
        if !is_child_on(tree, current, parent, side) {
            return Some(parent);
        }
        current = parent;
    }
    None
}

fn is_child_on<K>(tree: &AvlTree<K>, child: NodeId, parent: NodeId, side: Side) -> bool {
    tree.node(parent).child(side) == Some(child)
}

impl<K> AvlTree<K> {
    /// A cursor at the smallest key, or past the end if the tree is empty.
    pub fn begin(&self) -> Cursor<'_, K> {
        Cursor {
            tree: self,
            current: self.root.map(|root| descend(self, root, Side::Left)),
        }
    }

    /// A cursor past the end.
    pub fn end(&self) -> Cursor<'_, K> {
        Cursor {
            tree: self,
            current: None,
        }
    }

    /// A cursor at the node behind `id`. Fails if the node has been erased,
    /// or if `id` came from another tree.
    pub fn cursor_at(&self, id: NodeId) -> Result<Cursor<'_, K>> {
        self.resolve(id)?;
        Ok(Cursor {
            tree: self,
            current: Some(id),
        })
    }

    /// Iterates over the keys in order.
    pub fn iter(&self) -> Iter<'_, K> {
        let back = match self.root {
            None => self.end(),
            Some(root) => Cursor {
                tree: self,
                current: Some(descend(self, root, Side::Right)),
            },
        };
        Iter {
            front: self.begin(),
            back,
            remaining: self.len(),
        }
    }
}

/// An in-order iterator over the keys of an [`AvlTree`], usable from both ends.
pub struct Iter<'a, K> {
    front: Cursor<'a, K>,
    /// At the last key not yet yielded from the back.
    back: Cursor<'a, K>,
    remaining: usize,
}

impl<'a, K> Clone for Iter<'a, K> {
    fn clone(&self) -> Self {
        Iter {
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        if self.remaining == 0 {
            return None;
        }
        let key = self.front.key()?;
        self.remaining -= 1;
        // can't fail: the cursor is at a key
        let _ = self.front.step_forward();
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K> DoubleEndedIterator for Iter<'a, K> {
    fn next_back(&mut self) -> Option<&'a K> {
        if self.remaining == 0 {
            return None;
        }
        let key = self.back.key()?;
        self.remaining -= 1;
        // at the first key this fails and leaves the cursor in place,
        // but then `remaining` is already 0
        let _ = self.back.step_backward();
        Some(key)
    }
}

impl<'a, K> ExactSizeIterator for Iter<'a, K> {}

impl<'a, K> std::iter::FusedIterator for Iter<'a, K> {}

impl<'a, K> IntoIterator for &'a AvlTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//! Implementation of AVL trees.
//! Balanced by keeping track of node heights, this is a worst-case balancing
//! algorithm that has a small memory overhead per node.
//!
//! Nodes live in an arena owned by the tree and refer to each other by [`NodeId`].
//! Every node knows its parent, which lets rebalancing walk upwards from the
//! point of a change, and lets cursors step in either direction without a stack.

mod balance;
mod cursor;
mod node;

pub use cursor::{Cursor, Iter};
pub use node::NodeId;
pub(crate) use node::{Side, Slot};

use node::{Entry, Node, T};
use std::cmp::Ordering;
use std::sync::atomic::{self, AtomicU32};

const NO_NODE_ERROR: &str = "invariant violated: linked node handle must be live";

/// Source of the tags that tie each [`NodeId`] to the tree that issued it.
static NEXT_TAG: AtomicU32 = AtomicU32::new(0);

fn next_tag() -> u32 {
    NEXT_TAG.fetch_add(1, atomic::Ordering::Relaxed)
}

/// An AVL tree storing keys in order. Equal keys are allowed and kept side by side.
///
///```
/// use avl_arena::AvlTree;
///
/// let mut tree: AvlTree<i32> = [23, -43, 0, 234, 78].into_iter().collect();
/// assert!(tree.erase(&23));
/// assert!(!tree.erase(&34));
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![-43, 0, 78, 234]);
/// # tree.assert_correctness();
///```
pub struct AvlTree<K> {
    entries: Vec<Entry<K>>,
    /// Indices of vacant entries, reused before the arena grows.
    free: Vec<u32>,
    pub(crate) root: Option<NodeId>,
    len: usize,
    restructures: u64,
    /// Stamped on every handle this tree issues.
    tag: u32,
}

impl<K> AvlTree<K> {
    /// Creates an empty [`AvlTree`].
    pub fn new() -> Self {
        AvlTree {
            entries: vec![],
            free: vec![],
            root: None,
            len: 0,
            restructures: 0,
            tag: next_tag(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The number of levels in the tree: 0 when empty, 1 for a single node.
    pub fn height(&self) -> usize {
        self.height_of(self.root) as usize
    }

    /// How many times rebalancing had to rotate, counting a double rotation once.
    pub fn restructure_count(&self) -> u64 {
        self.restructures
    }

    /// Removes every key. Handles to the removed nodes become stale.
    pub fn clear(&mut self) {
        for (index, entry) in self.entries.iter_mut().enumerate() {
            if entry.node.take().is_some() {
                entry.generation = entry.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.root = None;
        self.len = 0;
    }

    /// Returns the key of the node behind `id`, if that node is still in the tree.
    /// Fails with [`Error::ForeignHandle`](crate::Error::ForeignHandle) if another
    /// tree issued `id`.
    pub fn key(&self, id: NodeId) -> crate::Result<&K> {
        self.resolve(id).map(|node| &node.key)
    }

    /// The smallest key.
    pub fn first(&self) -> Option<&K> {
        let root = self.root?;
        Some(&self.node(descend(self, root, Side::Left)).key)
    }

    /// The largest key.
    pub fn last(&self) -> Option<&K> {
        let root = self.root?;
        Some(&self.node(descend(self, root, Side::Right)).key)
    }

    pub(crate) fn get_node(&self, id: NodeId) -> Option<&Node<K>> {
        if id.tree != self.tag {
            return None;
        }
        let entry = self.entries.get(id.index as usize)?;
        if entry.generation != id.generation {
            return None;
        }
        entry.node.as_ref()
    }

    /// Like `get_node`, but tells a handle from another tree apart from a stale one.
    pub(crate) fn resolve(&self, id: NodeId) -> crate::Result<&Node<K>> {
        if id.tree != self.tag {
            return Err(crate::Error::ForeignHandle(id));
        }
        self.get_node(id).ok_or(crate::Error::StaleHandle(id))
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<K> {
        self.get_node(id).expect(NO_NODE_ERROR)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<K> {
        debug_assert_eq!(id.tree, self.tag);
        self.entries
            .get_mut(id.index as usize)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.node.as_mut())
            .expect(NO_NODE_ERROR)
    }

    fn alloc(&mut self, node: Node<K>) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                let entry = &mut self.entries[index as usize];
                entry.node = Some(node);
                NodeId {
                    tree: self.tag,
                    index,
                    generation: entry.generation,
                }
            }
            None => {
                let index = u32::try_from(self.entries.len()).expect("arena index space exhausted");
                self.entries.push(Entry {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    tree: self.tag,
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Takes the node out of the arena. The caller must have unlinked it already.
    fn release(&mut self, id: NodeId) -> Node<K> {
        let entry = &mut self.entries[id.index as usize];
        debug_assert_eq!(entry.generation, id.generation);
        let node = entry.node.take().expect(NO_NODE_ERROR);
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(id.index);
        node
    }

    pub(crate) fn slot_get(&self, slot: Slot) -> Option<NodeId> {
        match slot {
            Slot::Root => self.root,
            Slot::Child(parent, side) => self.node(parent).child(side),
        }
    }

    /// Overwrites the link held by `slot`. Does not touch the parent link of `id`.
    pub(crate) fn slot_set(&mut self, slot: Slot, id: Option<NodeId>) {
        match slot {
            Slot::Root => self.root = id,
            Slot::Child(parent, side) => *self.node_mut(parent).child_mut(side) = id,
        }
    }

    /// The slot currently holding `id`.
    pub(crate) fn slot_of(&self, id: NodeId) -> Slot {
        match self.node(id).parent {
            None => Slot::Root,
            Some(parent) => {
                let side = if self.node(parent).left == Some(id) {
                    Side::Left
                } else {
                    debug_assert_eq!(self.node(parent).right, Some(id));
                    Side::Right
                };
                Slot::Child(parent, side)
            }
        }
    }

    /// Calls `rebalance_at` on `start` and on every ancestor up to the root,
    /// closest first. No ancestor is skipped, even after a rotation.
    fn rebalance_upwards(&mut self, start: Option<NodeId>) {
        let mut current = start;
        while let Some(id) = current {
            let slot = self.slot_of(id);
            let top = self.rebalance_at(slot);
            current = self.node(top).parent;
        }
    }

    /// Links a freshly allocated node into an empty slot and rebalances above it.
    fn attach(&mut self, slot: Slot, id: NodeId) -> NodeId {
        debug_assert!(self.slot_get(slot).is_none());
        self.slot_set(slot, Some(id));
        self.len += 1;
        self.rebalance_upwards(slot.parent());
        id
    }

    /// Unlinks `id`, which must have no child on `keep.flip()`, by moving its `keep`
    /// child into its slot. Returns the former parent of `id`.
    fn splice_out(&mut self, id: NodeId, keep: Side) -> Option<NodeId> {
        debug_assert!(self.node(id).child(keep.flip()).is_none());
        let slot = self.slot_of(id);
        let child = self.node(id).child(keep);
        self.slot_set(slot, child);
        if let Some(child) = child {
            self.node_mut(child).parent = slot.parent();
        }
        slot.parent()
    }
}

/// Follows `side` links from `from` until there are none left.
pub(crate) fn descend<K>(tree: &AvlTree<K>, from: NodeId, side: Side) -> NodeId {
    let mut current = from;
    while let Some(next) = tree.node(current).child(side) {
        current = next;
    }
    current
}

impl<K: Ord> AvlTree<K> {
    /// Returns a handle to a node holding `key`.
    /// With duplicates, it is the first one met walking down from the root.
    pub fn find_node(&self, key: &K) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.node(id);
            current = match key.cmp(&node.key) {
                Ordering::Equal => return Some(id),
                Ordering::Greater => node.right,
                Ordering::Less => node.left,
            };
        }
        None
    }

    /// Returns the stored key equal to `key`, if there is one.
    pub fn find(&self, key: &K) -> Option<&K> {
        self.find_node(key).map(|id| &self.node(id).key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.find_node(key).is_some()
    }

    /// Inserts a key. Keys equal to an existing key are placed to its left.
    /// Returns a handle to the new node.
    pub fn insert(&mut self, key: K) -> NodeId {
        let slot = self.insertion_slot(&key);
        let id = self.alloc(Node::new(key, slot.parent()));
        self.attach(slot, id)
    }

    /// Like [`AvlTree::insert`], but reports allocation failure instead of aborting.
    /// On failure the tree is unchanged.
    pub fn try_insert(&mut self, key: K) -> crate::Result<NodeId> {
        if self.free.is_empty() {
            self.entries.try_reserve(1)?;
        }
        Ok(self.insert(key))
    }

    fn insertion_slot(&self, key: &K) -> Slot {
        let mut slot = Slot::Root;
        while let Some(id) = self.slot_get(slot) {
            let side = if *key > self.node(id).key {
                Side::Right
            } else {
                Side::Left
            };
            slot = Slot::Child(id, side);
        }
        slot
    }

    /// Removes one key equal to `key`. Returns whether anything was removed.
    pub fn erase(&mut self, key: &K) -> bool {
        self.remove(key).is_some()
    }

    /// Removes one key equal to `key` and returns it.
    ///
    /// A node with a left subtree takes its in-order predecessor's key, and the
    /// predecessor's node is the one unlinked; otherwise the in-order successor
    /// plays that role. Handles to the unlinked node become stale; every other
    /// handle stays valid.
    pub fn remove(&mut self, key: &K) -> Option<K> {
        let target = match self.find_node(key) {
            Some(id) => id,
            None => {
                tracing::debug!("erase: key not found");
                return None;
            }
        };

        let (left, right) = {
            let node = self.node(target);
            (node.left, node.right)
        };
        let (detached, former_parent) = if let Some(left) = left {
            let predecessor = descend(self, left, Side::Right);
            (predecessor, self.splice_out(predecessor, Side::Left))
        } else if let Some(right) = right {
            let successor = descend(self, right, Side::Left);
            (successor, self.splice_out(successor, Side::Right))
        } else {
            (target, self.splice_out(target, Side::Left))
        };

        let mut removed = self.release(detached).into_key();
        if detached != target {
            std::mem::swap(&mut self.node_mut(target).key, &mut removed);
        }
        self.len -= 1;
        self.rebalance_upwards(former_parent);
        Some(removed)
    }

    /// Asserts that parent links, cached heights, balance factors and key order
    /// are all correct. Otherwise, panics.
    pub fn assert_correctness(&self) {
        let count = self.assert_subtree(self.root, None);
        assert_eq!(count, self.len, "length does not match the number of reachable nodes");
        let live = self.entries.iter().filter(|entry| entry.node.is_some()).count();
        assert_eq!(live, self.len, "arena holds unreachable nodes");

        let mut iter = self.iter();
        if let Some(mut prev) = iter.next() {
            for key in iter {
                assert!(prev <= key, "keys out of order");
                prev = key;
            }
        }
    }

    /// Returns the number of nodes in the subtree.
    fn assert_subtree(&self, id: Option<NodeId>, parent: Option<NodeId>) -> usize {
        let id = match id {
            Some(id) => id,
            None => return 0,
        };
        let node = self.node(id);
        assert_eq!(node.parent, parent, "broken parent link");
        let count = 1
            + self.assert_subtree(node.left, Some(id))
            + self.assert_subtree(node.right, Some(id));

        let expected: T = std::cmp::max(self.height_of(node.left), self.height_of(node.right));
        assert_eq!(node.height, expected, "stale cached height");
        let bf = self.balance_factor(id);
        assert!((-1..=1).contains(&bf), "illegal balance factor: {}", bf);
        count
    }
}

// The copy gets its own tag, so handles into `self` are foreign to it.
impl<K: Clone> Clone for AvlTree<K> {
    fn clone(&self) -> Self {
        let tag = next_tag();
        let retag = |link: Option<NodeId>| link.map(|id| id.retag(tag));
        let entries = self
            .entries
            .iter()
            .map(|entry| Entry {
                generation: entry.generation,
                node: entry.node.as_ref().map(|node| Node {
                    key: node.key.clone(),
                    height: node.height,
                    left: retag(node.left),
                    right: retag(node.right),
                    parent: retag(node.parent),
                }),
            })
            .collect();
        AvlTree {
            entries,
            free: self.free.clone(),
            root: retag(self.root),
            len: self.len,
            restructures: self.restructures,
            tag,
        }
    }
}

impl<K> Default for AvlTree<K> {
    fn default() -> Self {
        AvlTree::new()
    }
}

impl<K: Ord> std::iter::FromIterator<K> for AvlTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord> Extend<K> for AvlTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: std::fmt::Debug> std::fmt::Debug for AvlTree<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

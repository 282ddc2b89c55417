//! Height bookkeeping and rotations.
//!
//! Heights use the "virtual height" convention: an absent subtree has height 0
//! and a present one has its stored height plus one. A leaf stores 0.

use super::node::{Side, Slot, T, TD};
use super::{AvlTree, NodeId};

impl<K> AvlTree<K> {
    pub(crate) fn height_of(&self, id: Option<NodeId>) -> T {
        match id {
            None => 0,
            Some(id) => self.node(id).height + 1,
        }
    }

    /// Returns `height_of(right) - height_of(left)`
    pub(crate) fn balance_factor(&self, id: NodeId) -> TD {
        let node = self.node(id);
        self.height_of(node.right) as TD - self.height_of(node.left) as TD
    }

    /// Only looks at the children, does not recurse.
    pub(crate) fn recompute_height(&mut self, id: NodeId) {
        let node = self.node(id);
        let height = std::cmp::max(self.height_of(node.left), self.height_of(node.right));
        self.node_mut(id).height = height;
    }

    /// Rotates the subtree in `slot` towards `side`: the child on the other side
    /// becomes the top of the subtree, and the old top becomes its `side` child.
    /// Returns the new top.
    fn rotate(&mut self, slot: Slot, side: Side) -> NodeId {
        let top = self.slot_get(slot).expect("rotating an empty slot");
        let pivot = self
            .node(top)
            .child(side.flip())
            .expect("rotating without a child to rotate up");
        let moved = self.node(pivot).child(side);

        *self.node_mut(top).child_mut(side.flip()) = moved;
        if let Some(moved) = moved {
            self.node_mut(moved).parent = Some(top);
        }
        *self.node_mut(pivot).child_mut(side) = Some(top);
        self.node_mut(top).parent = Some(pivot);
        self.node_mut(pivot).parent = slot.parent();
        self.slot_set(slot, Some(pivot));

        self.recompute_height(top);
        self.recompute_height(pivot);
        pivot
    }

    pub(crate) fn rotate_left(&mut self, slot: Slot) -> NodeId {
        self.rotate(slot, Side::Left)
    }

    pub(crate) fn rotate_right(&mut self, slot: Slot) -> NodeId {
        self.rotate(slot, Side::Right)
    }

    /// Right rotation of the right child, then left rotation of the node.
    pub(crate) fn rotate_right_left(&mut self, slot: Slot) -> NodeId {
        let top = self.slot_get(slot).expect("rotating an empty slot");
        self.rotate_right(Slot::Child(top, Side::Right));
        self.rotate_left(slot)
    }

    /// Left rotation of the left child, then right rotation of the node.
    pub(crate) fn rotate_left_right(&mut self, slot: Slot) -> NodeId {
        let top = self.slot_get(slot).expect("rotating an empty slot");
        self.rotate_left(Slot::Child(top, Side::Left));
        self.rotate_right(slot)
    }

    /// Restores the balance of the node in `slot`, assuming both of its subtrees
    /// are balanced and have correct heights. Performs exactly one of: a single
    /// rotation, a double rotation, or a height update.
    /// Returns the node now at the top of the subtree.
    pub(crate) fn rebalance_at(&mut self, slot: Slot) -> NodeId {
        let id = self.slot_get(slot).expect("rebalancing an empty slot");
        let bf = self.balance_factor(id);
        match bf {
            2 => {
                // right is deeper
                let right = self.node(id).right.expect("right-heavy node has a right child");
                self.restructures += 1;
                if self.balance_factor(right) >= 0 {
                    // right right case
                    tracing::trace!(node = ?id, bf, "rotate left");
                    self.rotate_left(slot)
                } else {
                    // right left case
                    tracing::trace!(node = ?id, bf, "rotate right-left");
                    self.rotate_right_left(slot)
                }
            }

            -1..=1 => {
                self.recompute_height(id);
                id
            }

            -2 => {
                // left is deeper
                let left = self.node(id).left.expect("left-heavy node has a left child");
                self.restructures += 1;
                if self.balance_factor(left) <= 0 {
                    // left left case
                    tracing::trace!(node = ?id, bf, "rotate right");
                    self.rotate_right(slot)
                } else {
                    // left right case
                    tracing::trace!(node = ?id, bf, "rotate left-right");
                    self.rotate_left_right(slot)
                }
            }

            bf => panic!("illegal balance factor: {}", bf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avl::node::Node;

    /// Builds a path of nodes hanging off each other on `side`, without rebalancing.
    /// Heights are set as if it were a valid tree.
    fn chain(keys: &[i32], side: Side) -> AvlTree<i32> {
        let mut tree = AvlTree::new();
        let mut slot = Slot::Root;
        for &key in keys {
            let id = tree.alloc(Node::new(key, slot.parent()));
            tree.slot_set(slot, Some(id));
            slot = Slot::Child(id, side);
        }
        // fix heights bottom up
        let mut current = slot.parent();
        while let Some(id) = current {
            tree.recompute_height(id);
            current = tree.node(id).parent;
        }
        tree
    }

    fn keys_at_top(tree: &AvlTree<i32>) -> (i32, Option<i32>, Option<i32>) {
        let root = tree.node(tree.root.unwrap());
        (
            root.key,
            root.left.map(|id| tree.node(id).key),
            root.right.map(|id| tree.node(id).key),
        )
    }

    #[test]
    fn heights_of_a_chain() {
        let tree = chain(&[1, 2, 3], Side::Right);
        let root = tree.root.unwrap();
        assert_eq!(tree.height_of(None), 0);
        assert_eq!(tree.height_of(Some(root)), 3);
        assert_eq!(tree.balance_factor(root), 2);
    }

    #[test]
    fn single_rotations() {
        let mut tree = chain(&[1, 2, 3], Side::Right);
        let top = tree.rebalance_at(Slot::Root);
        assert_eq!(tree.node(top).key, 2);
        assert_eq!(keys_at_top(&tree), (2, Some(1), Some(3)));
        assert_eq!(tree.restructure_count(), 1);

        let mut tree = chain(&[3, 2, 1], Side::Left);
        tree.rebalance_at(Slot::Root);
        assert_eq!(keys_at_top(&tree), (2, Some(1), Some(3)));
        assert_eq!(tree.height_of(tree.root), 2);
    }

    #[test]
    fn double_rotations() {
        // 1 -> right 3 -> left 2
        let mut tree = chain(&[1, 3], Side::Right);
        let three = tree.node(tree.root.unwrap()).right.unwrap();
        let two = tree.alloc(Node::new(2, Some(three)));
        tree.node_mut(three).left = Some(two);
        tree.recompute_height(three);
        tree.recompute_height(tree.root.unwrap());

        tree.rebalance_at(Slot::Root);
        assert_eq!(keys_at_top(&tree), (2, Some(1), Some(3)));
        assert_eq!(tree.restructure_count(), 1);

        let root = tree.root.unwrap();
        assert_eq!(tree.node(root).parent, None);
        for child in [tree.node(root).left.unwrap(), tree.node(root).right.unwrap()] {
            assert_eq!(tree.node(child).parent, Some(root));
            assert_eq!(tree.node(child).height, 0);
        }
    }

    #[test]
    fn balanced_node_only_updates_height() {
        let mut tree = chain(&[2, 1], Side::Left);
        let root = tree.root.unwrap();
        tree.node_mut(root).height = 7;
        assert_eq!(tree.rebalance_at(Slot::Root), root);
        assert_eq!(tree.node(root).height, 1);
        assert_eq!(tree.restructure_count(), 0);
    }

    #[test]
    fn rotation_below_the_root_relinks_the_parent() {
        // 10 -> left 5 -> left 3 -> left 1, rebalance the subtree at 5.
        let mut tree = chain(&[10, 5, 3, 1], Side::Left);
        let ten = tree.root.unwrap();
        let five = tree.node(ten).left.unwrap();
        let three = tree.node(five).left.unwrap();

        let top = tree.rebalance_at(Slot::Child(ten, Side::Left));
        assert_eq!(top, three);
        assert_eq!(tree.node(ten).left, Some(three));
        assert_eq!(tree.node(three).parent, Some(ten));
        assert_eq!(tree.node(three).right, Some(five));
        assert_eq!(tree.node(five).parent, Some(three));
    }
}

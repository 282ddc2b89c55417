//! Depth-first and breadth-first traversals.
//!
//! Each function appends every key of the tree exactly once to `out`, in its order.
//! They walk the tree structure directly and do not use cursors, so they are
//! handy as an independent reference when testing the iterators.
//!
//!```
//! use avl_arena::{traversal, AvlTree};
//!
//! let tree: AvlTree<i32> = (1..=3).collect();
//! let mut pre = vec![];
//! traversal::pre_order(&tree, &mut pre);
//! assert_eq!(pre, vec![&2, &1, &3]);
//!```

use std::collections::VecDeque;

use crate::avl::{AvlTree, NodeId};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Order {
    Pre,
    In,
    Post,
}

pub fn pre_order<'a, K>(tree: &'a AvlTree<K>, out: &mut Vec<&'a K>) {
    walk(tree, tree.root, Order::Pre, out);
}

pub fn in_order<'a, K>(tree: &'a AvlTree<K>, out: &mut Vec<&'a K>) {
    walk(tree, tree.root, Order::In, out);
}

pub fn post_order<'a, K>(tree: &'a AvlTree<K>, out: &mut Vec<&'a K>) {
    walk(tree, tree.root, Order::Post, out);
}

/// Level by level from the root, left to right within a level.
pub fn level_order<'a, K>(tree: &'a AvlTree<K>, out: &mut Vec<&'a K>) {
    let mut queue: VecDeque<NodeId> = tree.root.into_iter().collect();
    while let Some(id) = queue.pop_front() {
        let node = tree.node(id);
        out.push(&node.key);
        queue.extend(node.left);
        queue.extend(node.right);
    }
}

// recursion depth is the height of the tree
fn walk<'a, K>(
    tree: &'a AvlTree<K>,
    id: Option<NodeId>,
    order: Order,
    out: &mut Vec<&'a K>,
) {
    let node = match id {
        Some(id) => tree.node(id),
        None => return,
    };
    if order == Order::Pre {
        out.push(&node.key);
    }
    walk(tree, node.left, order, out);
    if order == Order::In {
        out.push(&node.key);
    }
    walk(tree, node.right, order, out);
    if order == Order::Post {
        out.push(&node.key);
    }
}

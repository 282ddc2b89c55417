#![allow(dead_code)]

use avl_arena::{traversal, AvlTree};
use proptest::prelude::*;
use rand::Rng;
use std::collections::BTreeMap;

/// Something to perform in one round of tests
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum RoundAction {
    Insert(i32),
    Erase(i32),
}

pub fn round_action_strategy(max_key: i32) -> impl Strategy<Value = RoundAction> {
    prop_oneof![
        (-max_key..=max_key).prop_map(RoundAction::Insert),
        (-max_key..=max_key).prop_map(RoundAction::Erase),
    ]
}

pub fn random_round_action<R: Rng>(rng: &mut R, max_key: i32) -> RoundAction {
    let key = rng.gen_range(-max_key..=max_key);
    if rng.gen() {
        RoundAction::Insert(key)
    } else {
        RoundAction::Erase(key)
    }
}

/// A multiset of keys, used as the model for the tree.
#[derive(Default, Debug)]
pub struct Model {
    counts: BTreeMap<i32, usize>,
}

impl Model {
    pub fn insert(&mut self, key: i32) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    pub fn erase(&mut self, key: i32) -> bool {
        match self.counts.get_mut(&key) {
            None => false,
            Some(count) => {
                *count -= 1;
                if *count == 0 {
                    self.counts.remove(&key);
                }
                true
            }
        }
    }

    pub fn sorted(&self) -> Vec<i32> {
        self.counts
            .iter()
            .flat_map(|(&key, &count)| std::iter::repeat(key).take(count))
            .collect()
    }
}

/// The keys in order, according to the traversal functions.
pub fn in_order_keys<K: Clone>(tree: &AvlTree<K>) -> Vec<K> {
    let mut out = vec![];
    traversal::in_order(tree, &mut out);
    out.into_iter().cloned().collect()
}

/// Walks a cursor from `begin` to `end` and back, and checks that both walks
/// agree with the in-order traversal.
pub fn assert_cursor_agrees<K: Clone + PartialEq + std::fmt::Debug>(tree: &AvlTree<K>) {
    let expected = in_order_keys(tree);

    let mut cursor = tree.begin();
    let mut forward = vec![];
    while !cursor.is_end() {
        forward.push(cursor.get().unwrap().clone());
        cursor.step_forward().unwrap();
    }
    assert_eq!(cursor, tree.end());
    assert_eq!(forward, expected);
    if tree.is_empty() {
        assert_eq!(tree.begin(), tree.end());
        return;
    }

    let mut backward = vec![];
    while cursor.step_backward().is_ok() {
        backward.push(cursor.get().unwrap().clone());
    }
    assert_eq!(cursor, tree.begin());
    backward.reverse();
    assert_eq!(backward, expected);
}

/// Runs the actions on a tree and on a model, checking them against each other
/// and checking the tree's invariants after every round.
pub fn check_consistency_proptest(
    initial: &[i32],
    actions: &[RoundAction],
) -> Result<(), TestCaseError> {
    let mut tree: AvlTree<i32> = initial.iter().cloned().collect();
    let mut model = Model::default();
    initial.iter().for_each(|&key| model.insert(key));

    for &action in actions {
        match action {
            RoundAction::Insert(key) => {
                let before = tree.restructure_count();
                let id = tree.insert(key);
                prop_assert_eq!(tree.key(id), Ok(&key));
                prop_assert!(tree.restructure_count() - before <= 1);
                model.insert(key);
            }
            RoundAction::Erase(key) => {
                prop_assert_eq!(tree.erase(&key), model.erase(key));
            }
        }
        tree.assert_correctness();
        prop_assert_eq!(tree.len(), model.sorted().len());
    }

    prop_assert_eq!(in_order_keys(&tree), model.sorted());
    prop_assert_eq!(tree.iter().cloned().collect::<Vec<_>>(), model.sorted());
    Ok(())
}

/// Removes each key in turn from a fresh tree holding `0..size`.
pub fn check_erase(size: i32) {
    let arr: Vec<_> = (0..size).collect();
    for i in 0..arr.len() {
        let mut tree: AvlTree<i32> = arr.iter().cloned().collect();
        assert_eq!(tree.remove(&arr[i]), Some(arr[i]));
        tree.assert_correctness();
        assert_eq!(
            tree.iter().cloned().collect::<Vec<_>>(),
            arr[..i]
                .iter()
                .chain(arr[i + 1..].iter())
                .cloned()
                .collect::<Vec<_>>()
        );
    }
}

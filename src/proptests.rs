use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;
use std::fmt;

/// Recompute every height from scratch and check the cached values, the
/// search order, the balance bound and the bookkeeping counters.
fn validate_tree<T: Ord + Copy + fmt::Debug, C>(t: &AvlTree<T, C>) {
    fn walk<T: Ord + Copy + fmt::Debug>(
        node: Option<NodeRef<'_, T>>,
        lower: Option<T>,
        upper: Option<T>,
        nodes: &mut usize,
        total: &mut usize,
    ) -> usize {
        let Some(node) = node else {
            return 0;
        };
        let key = *node.key();
        if let Some(lower) = lower {
            assert!(key > lower, "{key:?} must sort after {lower:?}");
        }
        if let Some(upper) = upper {
            assert!(key < upper, "{key:?} must sort before {upper:?}");
        }
        assert!(node.count() >= 1, "live node with zero count");
        *nodes += 1;
        *total += node.count();

        let lh = walk(node.left(), lower, Some(key), nodes, total);
        let rh = walk(node.right(), Some(key), upper, nodes, total);
        let balance = lh as i32 - rh as i32;
        assert_eq!(node.balance_factor(), balance, "stale balance at {key:?}");
        assert!(balance.abs() <= 1, "unbalanced at {key:?}: {balance}");
        let height = 1 + lh.max(rh);
        assert_eq!(node.height(), height, "stale height at {key:?}");
        height
    }

    let mut nodes = 0;
    let mut total = 0;
    let height = walk(t.root(), None, None, &mut nodes, &mut total);
    assert_eq!(height, t.height());
    assert_eq!(nodes, t.len(), "reachable nodes must match len");
    assert_eq!(total, t.total(), "summed counts must match total");
    assert_eq!(t.is_empty(), nodes == 0);

    // Height bound for AVL trees: h < 1.4405 * log2(n + 2) - 0.3277.
    let bound = 1.4405 * ((nodes + 2) as f64).log2() - 0.3277;
    assert!(height as f64 <= bound, "height {height} over AVL bound for {nodes} nodes");
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    Insert(#[proptest(strategy = "0u8..64")] u8),
    Remove(#[proptest(strategy = "0u8..64")] u8),
    RemoveAll(#[proptest(strategy = "0u8..64")] u8),
    Contains(#[proptest(strategy = "0u8..64")] u8),
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(any::<Op>(), 0..=1000)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in ops_strategy()) {
        let mut t: AvlTree<u8> = AvlTree::new();
        let mut m: BTreeMap<u8, usize> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key) => {
                    let count = m.entry(key).or_insert(0);
                    *count += 1;
                    prop_assert_eq!(t.insert(key), *count);
                }
                Op::Remove(key) => {
                    let expected = match m.get_mut(&key) {
                        Some(count) => {
                            *count -= 1;
                            let remaining = *count;
                            if remaining == 0 {
                                m.remove(&key);
                            }
                            Some(remaining)
                        }
                        None => None,
                    };
                    prop_assert_eq!(t.remove(&key).ok(), expected);
                }
                Op::RemoveAll(key) => {
                    let was_empty = m.is_empty();
                    match (t.remove_all(&key), m.remove(&key)) {
                        (Ok(got), Some(count)) => {
                            prop_assert_eq!(got, count);
                        }
                        (Err(AvlError::EmptyTree), None) => {
                            prop_assert!(was_empty);
                        }
                        (Err(AvlError::KeyNotFound), None) => {
                            prop_assert!(!was_empty);
                        }
                        (got, want) => {
                            prop_assert!(false, "remove_all({}): {:?} vs {:?}", key, got, want);
                        }
                    }
                }
                Op::Contains(key) => {
                    prop_assert_eq!(t.contains(&key), m.contains_key(&key));
                    prop_assert_eq!(t.count(&key), m.get(&key).copied().unwrap_or(0));
                }
            }

            prop_assert_eq!(t.len(), m.len());
            validate_tree(&t);
        }

        let got: Vec<(u8, usize)> = t.iter().map(|(k, c)| (*k, c)).collect();
        let expected: Vec<(u8, usize)> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_traversals_agree(keys in prop::collection::vec(any::<i16>(), 0..=300)) {
        let t: AvlTree<i16> = keys.iter().copied().collect();
        validate_tree(&t);

        let in_order: Vec<i16> = t.traverse(TraversalOrder::InOrder).map(|n| *n.key()).collect();
        prop_assert!(in_order.windows(2).all(|w| w[0] < w[1]));

        let mut pre: Vec<i16> = t.traverse(TraversalOrder::PreOrder).map(|n| *n.key()).collect();
        let mut post: Vec<i16> = t.traverse(TraversalOrder::PostOrder).map(|n| *n.key()).collect();
        if let Some(root) = t.root() {
            prop_assert_eq!(pre[0], *root.key());
            prop_assert_eq!(post[post.len() - 1], *root.key());
        }
        pre.sort_unstable();
        post.sort_unstable();
        prop_assert_eq!(&pre, &in_order);
        prop_assert_eq!(&post, &in_order);
    }

    #[test]
    fn prop_duplicate_counting(key in any::<u32>(), k in 1usize..50, others in prop::collection::vec(any::<u32>(), 0..50)) {
        let mut t: AvlTree<u32> = AvlTree::new();
        for other in &others {
            if *other != key {
                t.insert(*other);
            }
        }
        for _ in 0..k {
            t.insert(key);
        }
        prop_assert_eq!(t.count(&key), k);
        prop_assert_eq!(t.traverse(TraversalOrder::InOrder).filter(|n| *n.key() == key).count(), 1);
        validate_tree(&t);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys: Vec<u32> = (1..=7).collect();

    for_each_permutation(&keys, |perm| {
        let mut t: AvlTree<u32> = AvlTree::new();
        for k in perm {
            t.insert(k);
            validate_tree(&t);
        }
        let got: Vec<u32> = t.iter().map(|(k, _)| *k).collect();
        assert_eq!(got, keys);
        assert!(t.height() <= 4);
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    let keys: Vec<u32> = (1..=7).collect();

    // Insert in a fixed order, then remove in all permutations.
    let base: AvlTree<u32> = [4, 2, 6, 1, 3, 5, 7, 3, 6].into_iter().collect();

    for_each_permutation(&keys, |perm| {
        let mut t = base.clone();
        for k in perm {
            t.remove_all(&k).unwrap();
            assert!(!t.contains(&k));
            validate_tree(&t);
        }
        assert_eq!(t.len(), 0);
        assert_eq!(t.total(), 0);
        assert!(t.root().is_none());
    });
}

//! Owned node store and the AVL restructuring primitives.
//!
//! Nodes own their children through `Option<Box<_>>` links and carry no parent
//! pointer. Every mutating routine works top-down, rewriting the link it was
//! handed on the way back up the call stack, and refreshes the cached height
//! and balance factor only along the path it touched.

use std::cmp::Ordering;

use tracing::trace;

use crate::compare::Comparator;
use crate::error::{AvlError, Result};

pub(crate) type Link<T> = Option<Box<Node<T>>>;

#[derive(Clone)]
pub(crate) struct Node<T> {
    pub(crate) key: T,
    /// Number of times `key` has been inserted and not yet removed. Always >= 1.
    pub(crate) count: usize,
    /// Nodes on the longest path down to a leaf, this node included.
    pub(crate) height: u32,
    /// `height(left) - height(right)`. Within `-1..=1` between operations.
    pub(crate) balance: i8,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
}

/// Number of rotations performed over the life of a tree.
///
/// A double rotation counts as one rotation in each direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RotationStats {
    pub left: u64,
    pub right: u64,
}

impl RotationStats {
    #[inline]
    pub fn total(&self) -> u64 {
        self.left + self.right
    }
}

/// Outcome of a recursive insertion.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Insertion {
    /// Duplicate count of the key after the insertion.
    pub(crate) count: usize,
    /// Whether a new node was spliced in (the only case that needs rebalancing).
    pub(crate) created: bool,
}

/// Outcome of a recursive removal.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Removal {
    pub(crate) previous: usize,
    pub(crate) remaining: usize,
}

impl Removal {
    #[inline]
    pub(crate) fn unlinked(&self) -> bool {
        self.remaining == 0
    }
}

impl<T> Node<T> {
    fn leaf(key: T) -> Box<Self> {
        Box::new(Self {
            key,
            count: 1,
            height: 1,
            balance: 0,
            left: None,
            right: None,
        })
    }

    #[inline]
    pub(crate) fn link_height(link: &Link<T>) -> u32 {
        link.as_ref().map_or(0, |n| n.height)
    }

    /// Recompute the cached height and balance factor from the children.
    #[inline]
    fn update(&mut self) {
        let lh = Self::link_height(&self.left);
        let rh = Self::link_height(&self.right);
        self.height = 1 + lh.max(rh);
        self.balance = (i64::from(lh) - i64::from(rh)) as i8;
    }
}

// =============================================================================
// Rotations
// =============================================================================

/// Promote `root.left` to the subtree root.
///
/// A right-heavy left child is first rotated left, which turns the
/// left-right case into the plain left-left case.
fn rotate_right<T>(root: &mut Box<Node<T>>, stats: &mut RotationStats) {
    let Some(mut pivot) = root.left.take() else {
        return;
    };
    if pivot.balance < 0 {
        rotate_left(&mut pivot, stats);
    }

    root.left = pivot.right.take();
    root.update();
    std::mem::swap(root, &mut pivot);
    // `root` is now the promoted child; `pivot` holds the old subtree root.
    root.right = Some(pivot);
    root.update();

    stats.right += 1;
    trace!(height = root.height, balance = root.balance, "rotated right");
}

/// Mirror of [`rotate_right`]: promote `root.right`.
fn rotate_left<T>(root: &mut Box<Node<T>>, stats: &mut RotationStats) {
    let Some(mut pivot) = root.right.take() else {
        return;
    };
    if pivot.balance > 0 {
        rotate_right(&mut pivot, stats);
    }

    root.right = pivot.left.take();
    root.update();
    std::mem::swap(root, &mut pivot);
    root.left = Some(pivot);
    root.update();

    stats.left += 1;
    trace!(height = root.height, balance = root.balance, "rotated left");
}

/// Refresh `node`'s cached values and rotate if it is out of balance.
///
/// Children must already be balanced with correct cached heights.
pub(crate) fn rebalance<T>(node: &mut Box<Node<T>>, stats: &mut RotationStats) {
    node.update();
    if node.balance > 1 {
        rotate_right(node, stats);
    } else if node.balance < -1 {
        rotate_left(node, stats);
    }
}

// =============================================================================
// Insertion
// =============================================================================

pub(crate) fn insert<T, C: Comparator<T>>(
    link: &mut Link<T>,
    key: T,
    cmp: &C,
    stats: &mut RotationStats,
) -> Insertion {
    let Some(node) = link else {
        *link = Some(Node::leaf(key));
        return Insertion {
            count: 1,
            created: true,
        };
    };

    let outcome = match cmp.compare(&key, &node.key) {
        Ordering::Equal => {
            node.count += 1;
            // Duplicates never change the shape of the tree.
            return Insertion {
                count: node.count,
                created: false,
            };
        }
        Ordering::Less => insert(&mut node.left, key, cmp, stats),
        Ordering::Greater => insert(&mut node.right, key, cmp, stats),
    };

    if outcome.created {
        rebalance(node, stats);
    }
    outcome
}

// =============================================================================
// Removal
// =============================================================================

/// Remove one occurrence of `key` (or every occurrence when `all` is set)
/// from the subtree at `link`.
///
/// The node is unlinked once its count drops to zero; only then does the
/// path back to the root get rebalanced.
pub(crate) fn remove<T, C: Comparator<T>>(
    link: &mut Link<T>,
    key: &T,
    all: bool,
    cmp: &C,
    stats: &mut RotationStats,
) -> Result<Removal> {
    let Some(mut node) = link.take() else {
        return Err(AvlError::KeyNotFound);
    };

    let result = match cmp.compare(key, &node.key) {
        Ordering::Less => remove(&mut node.left, key, all, cmp, stats),
        Ordering::Greater => remove(&mut node.right, key, all, cmp, stats),
        Ordering::Equal if !all && node.count > 1 => {
            node.count -= 1;
            Ok(Removal {
                previous: node.count + 1,
                remaining: node.count,
            })
        }
        Ordering::Equal => {
            let previous = node.count;
            *link = unlink(node, stats);
            return Ok(Removal {
                previous,
                remaining: 0,
            });
        }
    };

    if matches!(result, Ok(r) if r.unlinked()) {
        rebalance(&mut node, stats);
    }
    *link = Some(node);
    result
}

/// Splice `node` out of the tree and return the subtree that replaces it.
///
/// With two children the in-order successor is detached from the right
/// subtree and adopts both of `node`'s subtrees.
fn unlink<T>(node: Box<Node<T>>, stats: &mut RotationStats) -> Link<T> {
    let Node { left, right, .. } = *node;
    match (left, right) {
        (None, None) => None,
        (Some(child), None) | (None, Some(child)) => Some(child),
        (Some(left), Some(right)) => {
            let (mut successor, rest) = detach_min(right, stats);
            successor.left = Some(left);
            successor.right = rest;
            rebalance(&mut successor, stats);
            Some(successor)
        }
    }
}

/// Detach the left-most node of a subtree, returning it and what remains.
fn detach_min<T>(mut node: Box<Node<T>>, stats: &mut RotationStats) -> (Box<Node<T>>, Link<T>) {
    match node.left.take() {
        None => {
            let rest = node.right.take();
            (node, rest)
        }
        Some(left) => {
            let (min, rest) = detach_min(left, stats);
            node.left = rest;
            rebalance(&mut node, stats);
            (min, Some(node))
        }
    }
}

//! # counted-avl
//!
//! An AVL-balanced ordered multiset. Each distinct key occupies one node that
//! counts how many times it has been inserted, and the tree height stays
//! logarithmic in the number of distinct keys.
//!
//! ## Example
//!
//! ```rust
//! use counted_avl::{AvlTree, TraversalOrder};
//!
//! let mut tree = AvlTree::new();
//! for key in [5, 3, 8, 1, 4, 7, 9, 3] {
//!     tree.insert(key);
//! }
//!
//! assert!(tree.contains(&4));
//! assert_eq!(tree.count(&3), 2);
//! assert_eq!(tree.height(), 3);
//!
//! let keys: Vec<i32> = tree
//!     .traverse(TraversalOrder::InOrder)
//!     .map(|node| *node.key())
//!     .collect();
//! assert_eq!(keys, [1, 3, 4, 5, 7, 8, 9]);
//!
//! // Removal takes out one occurrence at a time.
//! assert_eq!(tree.remove(&3).unwrap(), 1);
//! assert_eq!(tree.remove(&3).unwrap(), 0);
//! assert!(!tree.contains(&3));
//! ```

#![deny(unsafe_code)]

mod compare;
mod error;
pub mod graphviz;
mod node;
mod traverse;

pub use compare::{Comparator, NaturalOrder};
pub use error::{AvlError, Result};
pub use node::RotationStats;
pub use traverse::{Iter, NodeRef, Traversal, TraversalOrder};

use std::cmp::Ordering;
use std::fmt;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use node::{Link, Node};

/// A self-balancing binary search tree with duplicate counting.
///
/// Inserting an existing key bumps that node's count instead of adding a node.
/// [`remove`](AvlTree::remove) takes out one occurrence and deletes the node
/// once its count reaches zero; [`remove_all`](AvlTree::remove_all) deletes
/// the node outright.
///
/// Keys are ordered by the comparator `C`, [`NaturalOrder`] by default.
pub struct AvlTree<T, C = NaturalOrder> {
    root: Link<T>,
    /// Distinct keys (nodes).
    len: usize,
    /// Sum of all duplicate counts.
    total: usize,
    cmp: C,
    rotations: RotationStats,
}

impl<T: Ord> AvlTree<T> {
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T, C> AvlTree<T, C> {
    /// Create an empty tree ordered by `cmp`, which must be a strict total order.
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            root: None,
            len: 0,
            total: 0,
            cmp,
            rotations: RotationStats::default(),
        }
    }

    /// Number of distinct keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of stored occurrences, duplicates included.
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree: 0 when empty, 1 for a lone root.
    #[inline]
    pub fn height(&self) -> usize {
        Node::link_height(&self.root) as usize
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
        self.total = 0;
    }

    /// Rotations performed since the tree was created.
    #[inline]
    pub fn rotations(&self) -> RotationStats {
        self.rotations
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    pub fn root(&self) -> Option<NodeRef<'_, T>> {
        self.root.as_deref().map(NodeRef::new)
    }

    /// Walk every node in `order`, yielding its key, balance factor and count.
    pub fn traverse(&self, order: TraversalOrder) -> Traversal<'_, T> {
        Traversal::new(self.root.as_deref(), order)
    }

    /// In-order `(key, count)` pairs.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.root.as_deref())
    }

    /// Smallest key.
    pub fn first(&self) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(&node.key)
    }

    /// Largest key.
    pub fn last(&self) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(&node.key)
    }
}

impl<T, C: Comparator<T>> AvlTree<T, C> {
    fn find(&self, key: &T) -> Option<&Node<T>> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match self.cmp.compare(key, &node.key) {
                Ordering::Equal => return Some(node),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        None
    }

    pub fn contains(&self, key: &T) -> bool {
        self.find(key).is_some()
    }

    /// How many times `key` is stored; 0 if absent.
    pub fn count(&self, key: &T) -> usize {
        self.find(key).map_or(0, |n| n.count)
    }

    /// Insert one occurrence of `key`, returning its count afterwards.
    pub fn insert(&mut self, key: T) -> usize {
        let outcome = node::insert(&mut self.root, key, &self.cmp, &mut self.rotations);
        self.total += 1;
        if outcome.created {
            self.len += 1;
            debug!(len = self.len, height = self.height(), "inserted new key");
        }
        outcome.count
    }

    /// Remove one occurrence of `key`, returning how many remain.
    ///
    /// The node is deleted when the last occurrence goes.
    pub fn remove(&mut self, key: &T) -> Result<usize> {
        self.remove_with(key, false).map(|r| r.remaining)
    }

    /// Delete `key`'s node regardless of its count, returning the count it held.
    pub fn remove_all(&mut self, key: &T) -> Result<usize> {
        self.remove_with(key, true).map(|r| r.previous)
    }

    fn remove_with(&mut self, key: &T, all: bool) -> Result<node::Removal> {
        if self.root.is_none() {
            return Err(AvlError::EmptyTree);
        }

        let removal = node::remove(&mut self.root, key, all, &self.cmp, &mut self.rotations)?;
        let dropped = removal.previous - removal.remaining;
        self.total -= dropped;
        if removal.unlinked() {
            self.len -= 1;
            debug!(len = self.len, dropped, height = self.height(), "removed key");
        }
        Ok(removal)
    }
}

impl<T: fmt::Display, C> AvlTree<T, C> {
    /// Print one `<key> (<balance>/<count>)` line per node in `order`.
    pub fn write_traversal<W: Write>(&self, order: TraversalOrder, mut out: W) -> Result<()> {
        for node in self.traverse(order) {
            writeln!(out, "{node}")?;
        }
        out.flush()?;
        Ok(())
    }

    /// Write a GraphViz description of the tree to `path`.
    ///
    /// See [`graphviz::export_diagram`].
    pub fn export_diagram(&self, path: impl AsRef<Path>) -> Result<()> {
        graphviz::export_diagram(self, path)
    }
}

impl<T: Ord> Default for AvlTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, C: Clone> Clone for AvlTree<T, C> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            len: self.len,
            total: self.total,
            cmp: self.cmp.clone(),
            rotations: self.rotations,
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for AvlTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T, C: Comparator<T>> Extend<T> for AvlTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T: Ord> FromIterator<T> for AvlTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, T, C> IntoIterator for &'a AvlTree<T, C> {
    type Item = (&'a T, usize);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


#[cfg(test)]
mod proptests;

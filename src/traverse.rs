//! Read-only views over the tree and the three depth-first traversal orders.

use std::fmt;
use std::iter::FusedIterator;
use std::str::FromStr;

use crate::error::AvlError;
use crate::node::Node;

/// Depth-first visiting order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TraversalOrder {
    /// Node, then left subtree, then right subtree.
    PreOrder,
    /// Left subtree, then node, then right subtree. Yields keys in sorted order.
    #[default]
    InOrder,
    /// Left subtree, then right subtree, then node.
    PostOrder,
}

impl TraversalOrder {
    pub const ALL: [TraversalOrder; 3] = [
        TraversalOrder::PreOrder,
        TraversalOrder::InOrder,
        TraversalOrder::PostOrder,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TraversalOrder::PreOrder => "preorder",
            TraversalOrder::InOrder => "inorder",
            TraversalOrder::PostOrder => "postorder",
        }
    }
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraversalOrder {
    type Err = AvlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pre" | "preorder" | "pre-order" => Ok(TraversalOrder::PreOrder),
            "in" | "inorder" | "in-order" => Ok(TraversalOrder::InOrder),
            "post" | "postorder" | "post-order" => Ok(TraversalOrder::PostOrder),
            _ => Err(AvlError::UnknownTraversalOrder(s.to_owned())),
        }
    }
}

/// Borrowed view of a single tree node.
pub struct NodeRef<'a, T> {
    node: &'a Node<T>,
}

impl<'a, T> NodeRef<'a, T> {
    #[inline]
    pub(crate) fn new(node: &'a Node<T>) -> Self {
        Self { node }
    }

    #[inline]
    pub fn key(&self) -> &'a T {
        &self.node.key
    }

    /// `height(left) - height(right)`; positive means left-heavy.
    #[inline]
    pub fn balance_factor(&self) -> i32 {
        i32::from(self.node.balance)
    }

    /// How many times the key is currently stored.
    #[inline]
    pub fn count(&self) -> usize {
        self.node.count
    }

    /// Height of the subtree rooted here (a leaf has height 1).
    #[inline]
    pub fn height(&self) -> usize {
        self.node.height as usize
    }

    pub fn left(&self) -> Option<NodeRef<'a, T>> {
        self.node.left.as_deref().map(NodeRef::new)
    }

    pub fn right(&self) -> Option<NodeRef<'a, T>> {
        self.node.right.as_deref().map(NodeRef::new)
    }

    pub fn is_leaf(&self) -> bool {
        self.node.left.is_none() && self.node.right.is_none()
    }
}

impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for NodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", self.key())
            .field("balance_factor", &self.balance_factor())
            .field("count", &self.count())
            .finish()
    }
}

/// Listing line: `<key> (<balance_factor>/<count>)`.
impl<T: fmt::Display> fmt::Display for NodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/{})", self.key(), self.balance_factor(), self.count())
    }
}

enum Frame<'a, T> {
    /// Subtree whose children have not been scheduled yet.
    Expand(&'a Node<T>),
    /// Node ready to be yielded.
    Visit(&'a Node<T>),
}

/// Lazy depth-first traversal.
///
/// Uses an explicit stack, so arbitrarily deep trees never grow the call
/// stack. Each call to [`AvlTree::traverse`](crate::AvlTree::traverse)
/// starts a fresh walk.
pub struct Traversal<'a, T> {
    order: TraversalOrder,
    stack: Vec<Frame<'a, T>>,
}

impl<'a, T> Traversal<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>, order: TraversalOrder) -> Self {
        let mut stack = Vec::with_capacity(root.map_or(0, |n| 2 * n.height as usize));
        if let Some(root) = root {
            stack.push(Frame::Expand(root));
        }
        Self { order, stack }
    }

    pub fn order(&self) -> TraversalOrder {
        self.order
    }
}

impl<'a, T> Iterator for Traversal<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            let node = match frame {
                Frame::Visit(node) => return Some(NodeRef::new(node)),
                Frame::Expand(node) => node,
            };

            let left = node.left.as_deref().map(Frame::Expand);
            let right = node.right.as_deref().map(Frame::Expand);
            // Frames are popped in reverse push order.
            match self.order {
                TraversalOrder::PreOrder => {
                    self.stack.extend(right);
                    self.stack.extend(left);
                    return Some(NodeRef::new(node));
                }
                TraversalOrder::InOrder => {
                    self.stack.extend(right);
                    self.stack.push(Frame::Visit(node));
                    self.stack.extend(left);
                }
                TraversalOrder::PostOrder => {
                    self.stack.push(Frame::Visit(node));
                    self.stack.extend(right);
                    self.stack.extend(left);
                }
            }
        }
        None
    }
}

impl<T> FusedIterator for Traversal<'_, T> {}

/// In-order iterator over `(key, count)` pairs.
pub struct Iter<'a, T> {
    inner: Traversal<'a, T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>) -> Self {
        Self {
            inner: Traversal::new(root, TraversalOrder::InOrder),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a T, usize);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|n| (n.key(), n.count()))
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

//! GraphViz (`dot`) export of the tree shape for debugging.
//!
//! Each node is declared as `node<key>` with a `"<key> (<balance>/<count>)"`
//! label, so keys must render as valid dot identifiers (numbers or plain
//! words) for the output to load in GraphViz.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::traverse::TraversalOrder;
use crate::AvlTree;

/// Write the dot description of `tree` to `out`.
///
/// Node declarations come first in key order, followed by one edge per
/// parent/child link in pre-order (left edge before right edge).
pub fn write_dot<T: Display, C, W: Write>(tree: &AvlTree<T, C>, mut out: W) -> std::io::Result<()> {
    out.write_all(b"digraph { \n")?;
    for node in tree.traverse(TraversalOrder::InOrder) {
        writeln!(out, "node{}[label=\"{}\"]", node.key(), node)?;
    }
    for node in tree.traverse(TraversalOrder::PreOrder) {
        for child in [node.left(), node.right()].into_iter().flatten() {
            writeln!(out, "node{}->node{}", node.key(), child.key())?;
        }
    }
    out.write_all(b"}")?;
    out.flush()
}

/// Render the dot description into a string.
pub fn to_dot<T: Display, C>(tree: &AvlTree<T, C>) -> String {
    let mut buf = Vec::new();
    // Writes into a Vec cannot fail.
    let _ = write_dot(tree, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Create (or truncate) `path` and write the dot description into it.
///
/// The tree is never modified; on failure the file may be left partially
/// written.
pub fn export_diagram<T: Display, C>(tree: &AvlTree<T, C>, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_dot(tree, BufWriter::new(file))?;
    debug!(path = %path.display(), nodes = tree.len(), "exported tree diagram");
    Ok(())
}

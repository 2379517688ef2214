//! Dotted pre-order tree printing, used by the `-ast` and `-st` CLI
//! flags (§6). One node per line, indented by depth with `.` characters,
//! e.g.
//!
//! ```text
//! let
//! .=
//! ..<ID:x>
//! ..<INT:5>
//! .gamma
//! ..<ID:Print>
//! ..<ID:x>
//! ```

use std::fmt::Write as _;

use crate::common::span::Spanned;

/// Implemented by any tree-node type that can be rendered in dotted
/// pre-order form: the RPAL parse tree (`AstNode`) and the standardized
/// tree (`StdNode`) both implement this.
pub trait Printable {
    /// The text for this node alone, not including its children.
    fn label(&self) -> String;
    /// This node's immediate children, in left-to-right order.
    fn children(&self) -> Vec<&Spanned<Self>>
    where
        Self: Sized;
}

/// Renders `root` (and everything beneath it) as dotted pre-order text.
pub fn render<T: Printable>(root: &Spanned<T>) -> String {
    let mut out = String::new();
    write_node(&mut out, root, 0);
    out
}

fn write_node<T: Printable>(out: &mut String, node: &Spanned<T>, depth: usize) {
    for _ in 0..depth {
        out.push('.');
    }
    let _ = writeln!(out, "{}", node.item.label());
    for child in node.item.children() {
        write_node(out, child, depth + 1);
    }
}

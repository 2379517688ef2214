//! The standardized tree (§3 "Standard tree nodes"): strictly binary
//! (except `Tau`, which stays n-ary so the flattener can record its
//! arity), built only from `gamma`, `lambda`, `->`, `tau`, `aug`,
//! identifiers, literals, and the `Y*` fixed-point marker. Every
//! operator of the source language (arithmetic, comparison, logical,
//! `@`) has already been rewritten into applications of a built-in name,
//! so this tree carries no operator-specific node kinds at all.

use num_bigint::BigInt;

use crate::common::span::Spanned;
use crate::utils::pretty::Printable;

/// The bound-variable descriptor a `lambda` node carries: a single
/// name, a tuple of names (destructured at application time), or `()`
/// (a lambda that ignores its argument).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundVar {
    Ident(String),
    Tuple(Vec<String>),
    Unit,
}

impl BoundVar {
    pub fn label(&self) -> String {
        match self {
            BoundVar::Ident(name) => name.clone(),
            BoundVar::Tuple(names) => format!("({})", names.join(", ")),
            BoundVar::Unit => "()".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StdNode {
    Gamma(Box<Spanned<StdNode>>, Box<Spanned<StdNode>>),
    Lambda { bound: BoundVar, body: Box<Spanned<StdNode>> },
    Conditional(Box<Spanned<StdNode>>, Box<Spanned<StdNode>>, Box<Spanned<StdNode>>),
    Tau(Vec<Spanned<StdNode>>),
    Aug(Box<Spanned<StdNode>>, Box<Spanned<StdNode>>),
    Identifier(String),
    Integer(BigInt),
    Str(String),
    True,
    False,
    Nil,
    Dummy,
    /// The explicit fixed-point combinator marker used to realize `rec`.
    YStar,
}

impl Printable for StdNode {
    fn label(&self) -> String {
        match self {
            StdNode::Gamma(_, _) => "gamma".to_string(),
            StdNode::Lambda { bound, .. } => format!("lambda({})", bound.label()),
            StdNode::Conditional(_, _, _) => "->".to_string(),
            StdNode::Tau(_) => "tau".to_string(),
            StdNode::Aug(_, _) => "aug".to_string(),
            StdNode::Identifier(name) => format!("<ID:{}>", name),
            StdNode::Integer(n) => format!("<INT:{}>", n),
            StdNode::Str(s) => format!("<STR:'{}'>", s),
            StdNode::True => "true".to_string(),
            StdNode::False => "false".to_string(),
            StdNode::Nil => "nil".to_string(),
            StdNode::Dummy => "dummy".to_string(),
            StdNode::YStar => "Y*".to_string(),
        }
    }

    fn children(&self) -> Vec<&Spanned<StdNode>> {
        match self {
            StdNode::Gamma(l, r) => vec![l, r],
            StdNode::Lambda { body, .. } => vec![body],
            StdNode::Conditional(c, t, e) => vec![c, t, e],
            StdNode::Tau(items) => items.iter().collect(),
            StdNode::Aug(l, r) => vec![l, r],
            StdNode::Identifier(_)
            | StdNode::Integer(_)
            | StdNode::Str(_)
            | StdNode::True
            | StdNode::False
            | StdNode::Nil
            | StdNode::Dummy
            | StdNode::YStar => vec![],
        }
    }
}

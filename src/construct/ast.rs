//! The RPAL parse tree (§3 "Parse tree nodes"), produced by the parser
//! and consumed by the standardizer. Nodes are immutable once built; the
//! tree is n-ary (a `Lambda`, for instance, may carry several bound
//! variables before its body).

use num_bigint::BigInt;

use crate::common::span::Spanned;
use crate::utils::pretty::Printable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompOp {
    Gr,
    Ge,
    Ls,
    Le,
    Eq,
    Ne,
}

impl CompOp {
    pub fn label(self) -> &'static str {
        match self {
            CompOp::Gr => "gr",
            CompOp::Ge => "ge",
            CompOp::Ls => "ls",
            CompOp::Le => "le",
            CompOp::Eq => "eq",
            CompOp::Ne => "ne",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl ArithOp {
    pub fn label(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Pow => "**",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    Let { defs: Box<Spanned<AstNode>>, body: Box<Spanned<AstNode>> },
    Lambda { params: Vec<Spanned<AstNode>>, body: Box<Spanned<AstNode>> },
    Where { body: Box<Spanned<AstNode>>, defs: Box<Spanned<AstNode>> },
    Tau(Vec<Spanned<AstNode>>),
    Aug { left: Box<Spanned<AstNode>>, right: Box<Spanned<AstNode>> },
    Conditional {
        cond: Box<Spanned<AstNode>>,
        then_branch: Box<Spanned<AstNode>>,
        else_branch: Box<Spanned<AstNode>>,
    },
    Or { left: Box<Spanned<AstNode>>, right: Box<Spanned<AstNode>> },
    LogicalAnd { left: Box<Spanned<AstNode>>, right: Box<Spanned<AstNode>> },
    Not(Box<Spanned<AstNode>>),
    Compare { op: CompOp, left: Box<Spanned<AstNode>>, right: Box<Spanned<AstNode>> },
    Arith { op: ArithOp, left: Box<Spanned<AstNode>>, right: Box<Spanned<AstNode>> },
    Neg(Box<Spanned<AstNode>>),
    At { left: Box<Spanned<AstNode>>, ident: Box<Spanned<AstNode>>, right: Box<Spanned<AstNode>> },
    Gamma { func: Box<Spanned<AstNode>>, arg: Box<Spanned<AstNode>> },
    Identifier(String),
    Integer(BigInt),
    Str(String),
    True,
    False,
    Nil,
    Dummy,
    FunctionForm { name: String, params: Vec<Spanned<AstNode>>, body: Box<Spanned<AstNode>> },
    Within { left: Box<Spanned<AstNode>>, right: Box<Spanned<AstNode>> },
    /// Simultaneous definitions: `D1 and D2 and ... and Dn`.
    And(Vec<Spanned<AstNode>>),
    Rec(Box<Spanned<AstNode>>),
    Equal { pattern: Box<Spanned<AstNode>>, value: Box<Spanned<AstNode>> },
    /// A parenthesized list of bound identifiers, e.g. `(x, y)` in `fn (x, y) . E`.
    Comma(Vec<Spanned<AstNode>>),
    EmptyParen,
}

impl Printable for AstNode {
    fn label(&self) -> String {
        match self {
            AstNode::Let { .. } => "let".to_string(),
            AstNode::Lambda { .. } => "lambda".to_string(),
            AstNode::Where { .. } => "where".to_string(),
            AstNode::Tau(_) => "tau".to_string(),
            AstNode::Aug { .. } => "aug".to_string(),
            AstNode::Conditional { .. } => "->".to_string(),
            AstNode::Or { .. } => "or".to_string(),
            AstNode::LogicalAnd { .. } => "&".to_string(),
            AstNode::Not(_) => "not".to_string(),
            AstNode::Compare { op, .. } => op.label().to_string(),
            AstNode::Arith { op, .. } => op.label().to_string(),
            AstNode::Neg(_) => "neg".to_string(),
            AstNode::At { .. } => "@".to_string(),
            AstNode::Gamma { .. } => "gamma".to_string(),
            AstNode::Identifier(name) => format!("<ID:{}>", name),
            AstNode::Integer(n) => format!("<INT:{}>", n),
            AstNode::Str(s) => format!("<STR:'{}'>", s),
            AstNode::True => "true".to_string(),
            AstNode::False => "false".to_string(),
            AstNode::Nil => "nil".to_string(),
            AstNode::Dummy => "dummy".to_string(),
            AstNode::FunctionForm { name, .. } => format!("function_form <ID:{}>", name),
            AstNode::Within { .. } => "within".to_string(),
            AstNode::And(_) => "and".to_string(),
            AstNode::Rec(_) => "rec".to_string(),
            AstNode::Equal { .. } => "=".to_string(),
            AstNode::Comma(_) => ",".to_string(),
            AstNode::EmptyParen => "()".to_string(),
        }
    }

    fn children(&self) -> Vec<&Spanned<AstNode>> {
        match self {
            AstNode::Let { defs, body } => vec![defs, body],
            AstNode::Lambda { params, body } => {
                let mut c: Vec<&Spanned<AstNode>> = params.iter().collect();
                c.push(body);
                c
            }
            AstNode::Where { body, defs } => vec![body, defs],
            AstNode::Tau(items) => items.iter().collect(),
            AstNode::Aug { left, right } => vec![left, right],
            AstNode::Conditional { cond, then_branch, else_branch } => {
                vec![cond, then_branch, else_branch]
            }
            AstNode::Or { left, right } => vec![left, right],
            AstNode::LogicalAnd { left, right } => vec![left, right],
            AstNode::Not(inner) => vec![inner],
            AstNode::Compare { left, right, .. } => vec![left, right],
            AstNode::Arith { left, right, .. } => vec![left, right],
            AstNode::Neg(inner) => vec![inner],
            AstNode::At { left, ident, right } => vec![left, ident, right],
            AstNode::Gamma { func, arg } => vec![func, arg],
            AstNode::Identifier(_)
            | AstNode::Integer(_)
            | AstNode::Str(_)
            | AstNode::True
            | AstNode::False
            | AstNode::Nil
            | AstNode::Dummy
            | AstNode::EmptyParen => vec![],
            AstNode::FunctionForm { params, body, .. } => {
                let mut c: Vec<&Spanned<AstNode>> = params.iter().collect();
                c.push(body);
                c
            }
            AstNode::Within { left, right } => vec![left, right],
            AstNode::And(defs) => defs.iter().collect(),
            AstNode::Rec(inner) => vec![inner],
            AstNode::Equal { pattern, value } => vec![pattern, value],
            AstNode::Comma(items) => items.iter().collect(),
        }
    }
}
